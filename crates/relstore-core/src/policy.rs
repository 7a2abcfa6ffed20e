//! Insert policies: what a relation stores when asked to insert one tuple.

use relstore_index::DomainValue;
use tracing::trace;

use crate::Tuple;
use crate::tag::RelationRepresentation;

/// How a relation turns one inserted tuple into the tuples it stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InsertPolicy {
    /// Store the tuple itself.
    #[default]
    Plain,
    /// Binary relation kept closed under reflexivity, symmetry and
    /// transitivity.
    EquivalenceClosure,
}

impl InsertPolicy {
    pub fn for_representation(representation: RelationRepresentation) -> Self {
        match representation {
            RelationRepresentation::Eqrel => InsertPolicy::EquivalenceClosure,
            _ => InsertPolicy::Plain,
        }
    }

    /// Tuples implied by inserting `tuple` into a relation currently holding
    /// `stored`. The result may contain duplicates and tuples already stored.
    pub fn extend<'a>(
        self,
        tuple: &[DomainValue],
        stored: impl Iterator<Item = &'a [DomainValue]>,
    ) -> Vec<Tuple> {
        match self {
            InsertPolicy::Plain => vec![tuple.to_vec()],
            InsertPolicy::EquivalenceClosure => closure_pairs(tuple[0], tuple[1], stored),
        }
    }
}

/// Pairs implied by merging `a` and `b` into one equivalence class.
///
/// Every stored pair touching `a` or `b` belongs to the merged class, so its
/// endpoints are crossed with `a` and `b` in both directions.
fn closure_pairs<'a>(
    a: DomainValue,
    b: DomainValue,
    stored: impl Iterator<Item = &'a [DomainValue]>,
) -> Vec<Tuple> {
    let mut implied = vec![vec![a, a], vec![a, b], vec![b, a], vec![b, b]];
    let mut relevant = 0usize;
    for pair in stored {
        let (x, y) = (pair[0], pair[1]);
        if x == a || x == b || y == a || y == b {
            relevant += 1;
            implied.extend(
                [
                    [x, a],
                    [x, b],
                    [y, a],
                    [y, b],
                    [a, x],
                    [a, y],
                    [b, x],
                    [b, y],
                ]
                .map(Vec::from),
            );
        }
    }
    trace!(a, b, relevant, implied = implied.len(), "extended equivalence pair");
    implied
}
