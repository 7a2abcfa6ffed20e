//! Column orderings, search signatures and ordered indices.
//!
//! A relation keeps its tuples available under several lexicographic column
//! orderings. This crate provides the pieces needed to pick and maintain them:
//!
//! - [`SearchSignature`]: which columns of a lookup are bound.
//! - [`LexOrder`]: a permutation of columns defining one total order.
//! - [`OrderCatalog`]: the orderings a relation needs, and which ordering
//!   serves which signature.
//! - [`Index`]: an ordered map over tuples, keyed by one [`LexOrder`].
//!
//! # Example
//!
//! ```
//! use relstore_index::{Index, OrderCatalog, SearchSignature};
//!
//! // Lookups bind column 1 only, or both columns.
//! let catalog = OrderCatalog::from_signatures(2, [SearchSignature::from_columns([1])]).unwrap();
//! assert_eq!(catalog.all_orders().len(), 1);
//!
//! let order = catalog.all_orders()[0].clone();
//! assert_eq!(order.columns(), &[1, 0]);
//!
//! let mut index: Index<usize> = Index::new(order);
//! index.insert(&[10, 20], 0);
//! index.insert(&[11, 20], 1);
//! index.insert(&[12, 30], 2);
//!
//! let bound = SearchSignature::from_columns([1]);
//! let hits: Vec<usize> = index.range(&[0, 20], bound).collect();
//! assert_eq!(hits, vec![0, 1]);
//! ```

mod catalog;
mod index;
mod order;

pub use catalog::{CatalogError, OrderCatalog};
pub use index::Index;
pub use order::{LexOrder, MAX_ARITY, SearchSignature};

/// A single scalar element of a tuple.
pub type DomainValue = i32;
