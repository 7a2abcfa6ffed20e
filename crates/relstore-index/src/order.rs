//! Search signatures and lexicographic column orders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainValue;

/// Widest relation a [`SearchSignature`] can describe.
pub const MAX_ARITY: usize = 64;

/// Bitmask of the columns bound in a lookup. Bit `i` stands for column `i`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SearchSignature(u64);

impl SearchSignature {
    /// The signature with no bound columns.
    pub const EMPTY: Self = Self(0);

    /// Wrap a raw bitmask.
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// The signature binding every column of an `arity`-wide relation.
    pub fn total(arity: usize) -> Self {
        assert!(arity <= MAX_ARITY, "arity {arity} exceeds {MAX_ARITY} columns");
        if arity == MAX_ARITY {
            Self(u64::MAX)
        } else {
            Self((1u64 << arity) - 1)
        }
    }

    /// Build a signature from the positions of its bound columns.
    pub fn from_columns(columns: impl IntoIterator<Item = usize>) -> Self {
        columns.into_iter().fold(Self::EMPTY, Self::with)
    }

    /// This signature with `column` also bound.
    pub fn with(self, column: usize) -> Self {
        assert!(column < MAX_ARITY, "column {column} out of signature range");
        Self(self.0 | (1u64 << column))
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn is_bound(self, column: usize) -> bool {
        column < MAX_ARITY && self.0 & (1u64 << column) != 0
    }

    /// Number of bound columns.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bound column positions, ascending.
    pub fn bound_columns(self) -> impl Iterator<Item = usize> {
        (0..MAX_ARITY).filter(move |&col| self.is_bound(col))
    }

    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_strict_subset_of(self, other: Self) -> bool {
        self != other && self.is_subset_of(other)
    }

    /// Whether every bound column is below `arity`.
    pub fn fits(self, arity: usize) -> bool {
        self.is_subset_of(Self::total(arity))
    }
}

impl fmt::Display for SearchSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, col) in self.bound_columns().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{col}")?;
        }
        write!(f, "}}")
    }
}

/// A sequence of column positions defining a lexicographic order.
///
/// Orders produced by an [`OrderCatalog`](crate::OrderCatalog) are full
/// permutations of the relation's columns. The empty order is the trivial
/// ordering used by nullary relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LexOrder(Vec<usize>);

impl LexOrder {
    pub fn new(columns: Vec<usize>) -> Self {
        Self(columns)
    }

    /// Columns in their natural order: `0, 1, ..., arity - 1`.
    pub fn identity(arity: usize) -> Self {
        Self((0..arity).collect())
    }

    /// The empty ordering; every tuple compares equal under it.
    pub fn trivial() -> Self {
        Self(Vec::new())
    }

    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this order mentions each of `0..arity` exactly once.
    pub fn is_permutation_of(&self, arity: usize) -> bool {
        if self.0.len() != arity {
            return false;
        }
        let mut seen = vec![false; arity];
        for &col in &self.0 {
            if col >= arity || seen[col] {
                return false;
            }
            seen[col] = true;
        }
        true
    }

    /// Reorder `tuple` into this order's key layout.
    pub fn project(&self, tuple: &[DomainValue]) -> Vec<DomainValue> {
        self.0.iter().map(|&col| tuple[col]).collect()
    }

    /// Signature made of the first `len` columns of this order.
    pub fn prefix_signature(&self, len: usize) -> SearchSignature {
        SearchSignature::from_columns(self.0[..len].iter().copied())
    }

    /// Whether a lookup binding `signature` can be answered by a prefix
    /// range scan over this order.
    pub fn serves(&self, signature: SearchSignature) -> bool {
        let bound = signature.count();
        bound <= self.0.len() && self.prefix_signature(bound) == signature
    }
}

impl From<Vec<usize>> for LexOrder {
    fn from(columns: Vec<usize>) -> Self {
        Self(columns)
    }
}

impl fmt::Display for LexOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
