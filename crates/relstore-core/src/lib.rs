//! In-memory relation storage for bottom-up Datalog evaluation.
//!
//! A [`Relation`] stores the tuples of one predicate in a block-allocated
//! [`TupleArena`] and keeps them ordered under every column ordering its
//! [`OrderCatalog`] asks for. Equivalence relations (the `eqrel`
//! representation) keep their pairs closed under reflexivity, symmetry and
//! transitivity on every insert.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use relstore_core::{OrderCatalog, Relation, SearchSignature};
//!
//! let by_src = SearchSignature::from_columns([0]);
//! let catalog = Arc::new(OrderCatalog::from_signatures(2, [by_src]).unwrap());
//!
//! let mut edge = Relation::new(2, Arc::clone(&catalog));
//! edge.insert(&[1, 2]);
//! edge.insert(&[2, 3]);
//! edge.insert(&[1, 2]); // duplicate, ignored
//! assert_eq!(edge.len(), 2);
//! assert!(edge.exists_matching(&[2, 0], by_src));
//!
//! let mut same = Relation::equivalence(catalog);
//! same.insert(&[1, 2]);
//! same.insert(&[2, 3]);
//! assert_eq!(same.len(), 9); // (1,3) and (3,1) are implied
//! assert!(same.exists(&[3, 1]));
//! ```

mod arena;
mod error;
mod policy;
mod relation;
mod shared;
pub mod tag;

pub use arena::{ArenaIter, BLOCK_SIZE, TupleArena, TupleHandle};
pub use error::StoreError;
pub use policy::InsertPolicy;
pub use relation::{Iter, Relation, RelationOptions};
pub use relstore_index::{DomainValue, Index, LexOrder, OrderCatalog, SearchSignature};
pub use shared::SharedRelation;

/// An owned tuple of domain values.
pub type Tuple = Vec<DomainValue>;
