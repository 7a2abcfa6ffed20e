//! The ordering catalog: which indices a relation needs.
//!
//! A catalog holds the lexicographic orders a relation maintains and maps each
//! search signature to the position of the order that serves it. Catalogs are
//! either given explicitly ([`OrderCatalog::from_orders`]) or derived from the
//! signatures a program looks up ([`OrderCatalog::from_signatures`]).

use petgraph::algo::maximum_matching;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::{LexOrder, MAX_ARITY, SearchSignature};

/// Errors raised while building a catalog from unchecked input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("arity {arity} exceeds the {MAX_ARITY}-column limit")]
    ArityTooLarge { arity: usize },

    #[error("order {order} is not a permutation of {arity} columns")]
    NotAPermutation { order: LexOrder, arity: usize },

    #[error("signature {signature} binds columns outside arity {arity}")]
    SignatureOutOfRange {
        signature: SearchSignature,
        arity: usize,
    },
}

/// Orderings required by one relation, plus the signature assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCatalog {
    arity: usize,
    orders: Vec<LexOrder>,
    assignment: FxHashMap<SearchSignature, usize>,
}

impl OrderCatalog {
    /// A catalog with no orderings. Relations built on it fall back to a
    /// single default index.
    pub fn empty(arity: usize) -> Self {
        Self {
            arity,
            orders: Vec::new(),
            assignment: FxHashMap::default(),
        }
    }

    /// Use `orders` as given. Signatures are served by the first order whose
    /// prefix binds exactly their columns.
    pub fn from_orders(arity: usize, orders: Vec<LexOrder>) -> Result<Self, CatalogError> {
        check_arity(arity)?;
        if let Some(order) = orders.iter().find(|order| !order.is_permutation_of(arity)) {
            return Err(CatalogError::NotAPermutation {
                order: order.clone(),
                arity,
            });
        }
        Ok(Self {
            arity,
            orders,
            assignment: FxHashMap::default(),
        })
    }

    /// Derive the smallest set of orders serving every signature in
    /// `signatures` plus the total signature.
    ///
    /// Signatures that form a chain under strict inclusion share one order, so
    /// the number of orders equals the size of a minimum chain cover of the
    /// signature lattice. The cover is found through a maximum matching on the
    /// bipartite "is strict subset of" graph.
    pub fn from_signatures(
        arity: usize,
        signatures: impl IntoIterator<Item = SearchSignature>,
    ) -> Result<Self, CatalogError> {
        check_arity(arity)?;
        let total = SearchSignature::total(arity);

        let mut searches = Vec::new();
        for signature in signatures {
            if !signature.fits(arity) {
                return Err(CatalogError::SignatureOutOfRange { signature, arity });
            }
            if !signature.is_empty() {
                searches.push(signature);
            }
        }
        searches.push(total);
        searches.sort_by_key(|sig| (sig.count(), sig.bits()));
        searches.dedup();

        let chains = min_chain_cover(&searches);

        let mut orders = Vec::with_capacity(chains.len());
        let mut assignment = FxHashMap::default();
        for chain in chains {
            let position = orders.len();
            let mut columns: Vec<usize> = Vec::with_capacity(arity);
            for &signature in &chain {
                for col in signature.bound_columns() {
                    if !columns.contains(&col) {
                        columns.push(col);
                    }
                }
                assignment.insert(signature, position);
            }
            let unbound: Vec<usize> = (0..arity).filter(|col| !columns.contains(col)).collect();
            columns.extend(unbound);
            orders.push(LexOrder::new(columns));
        }
        // the empty signature is served by any order
        if !orders.is_empty() {
            assignment.entry(SearchSignature::EMPTY).or_insert(0);
        }

        Ok(Self {
            arity,
            orders,
            assignment,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Every ordering in this catalog, by index position.
    pub fn all_orders(&self) -> &[LexOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Position of the order serving `signature`, if any.
    pub fn lex_order_number(&self, signature: SearchSignature) -> Option<usize> {
        self.assignment
            .get(&signature)
            .copied()
            .or_else(|| self.orders.iter().position(|order| order.serves(signature)))
    }

    /// Signatures with an explicit assignment, sorted.
    pub fn signatures(&self) -> Vec<SearchSignature> {
        let mut signatures: Vec<_> = self.assignment.keys().copied().collect();
        signatures.sort();
        signatures
    }
}

fn check_arity(arity: usize) -> Result<(), CatalogError> {
    if arity > MAX_ARITY {
        return Err(CatalogError::ArityTooLarge { arity });
    }
    Ok(())
}

/// Partition `signatures` into the fewest chains `s1 < s2 < ...`.
///
/// Each signature gets a left and a right node; an edge joins `left(a)` and
/// `right(b)` whenever `a` is a strict subset of `b`. A matched edge makes `b`
/// the successor of `a` in a chain, and chains start at right nodes left
/// unmatched.
fn min_chain_cover(signatures: &[SearchSignature]) -> Vec<Vec<SearchSignature>> {
    let n = signatures.len();
    let mut graph: UnGraph<(), ()> = UnGraph::with_capacity(2 * n, n * n);
    let left: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();
    let right: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();

    for (i, a) in signatures.iter().enumerate() {
        for (j, b) in signatures.iter().enumerate() {
            if a.is_strict_subset_of(*b) {
                graph.add_edge(left[i], right[j], ());
            }
        }
    }

    let matching = maximum_matching(&graph);
    let successor = |i: usize| -> Option<usize> {
        matching
            .mate(left[i])
            .map(|node| node.index() - n)
    };

    let mut chains = Vec::new();
    for start in 0..n {
        if matching.mate(right[start]).is_some() {
            continue;
        }
        let mut chain = vec![signatures[start]];
        let mut current = start;
        while let Some(next) = successor(current) {
            chain.push(signatures[next]);
            current = next;
        }
        chains.push(chain);
    }
    chains
}
