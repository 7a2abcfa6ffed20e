//! Ordered index over stored tuples.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::Bound;

use crate::DomainValue;
use crate::order::{LexOrder, SearchSignature};

/// An ordered map from tuples, compared under one [`LexOrder`], to the
/// handle their owner uses to locate them.
///
/// The index never stores tuple storage itself, only the projected key and a
/// copyable handle, so the owner is free to keep tuples wherever it likes as
/// long as handles stay valid.
#[derive(Debug, Clone)]
pub struct Index<H> {
    order: LexOrder,
    entries: BTreeMap<Box<[DomainValue]>, H>,
}

impl<H: Copy> Index<H> {
    pub fn new(order: LexOrder) -> Self {
        Self {
            order,
            entries: BTreeMap::new(),
        }
    }

    pub fn order(&self) -> &LexOrder {
        &self.order
    }

    /// Register `tuple` under `handle`. Returns false if an equal key was
    /// already present; the existing handle is kept.
    pub fn insert(&mut self, tuple: &[DomainValue], handle: H) -> bool {
        match self.entries.entry(self.order.project(tuple).into_boxed_slice()) {
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Exact membership under this index's order.
    pub fn exists(&self, tuple: &[DomainValue]) -> bool {
        self.entries.contains_key(self.order.project(tuple).as_slice())
    }

    /// Handle stored for `tuple`, if present.
    pub fn get(&self, tuple: &[DomainValue]) -> Option<H> {
        self.entries.get(self.order.project(tuple).as_slice()).copied()
    }

    /// Drop every entry. The order is kept.
    pub fn purge(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles in index order.
    pub fn iter(&self) -> impl Iterator<Item = H> + '_ {
        self.entries.values().copied()
    }

    /// Handles of tuples agreeing with `pattern` on the columns bound in
    /// `signature`, in index order. Unbound positions of `pattern` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if this index's order does not serve `signature`.
    pub fn range(
        &self,
        pattern: &[DomainValue],
        signature: SearchSignature,
    ) -> impl Iterator<Item = H> + '_ {
        assert!(
            self.order.serves(signature),
            "index {} cannot serve signature {signature}",
            self.order
        );
        let bound = signature.count();
        let columns = self.order.columns();
        let key_at = |i: usize, fill: DomainValue| {
            if i < bound { pattern[columns[i]] } else { fill }
        };
        let lower: Vec<DomainValue> = (0..columns.len()).map(|i| key_at(i, DomainValue::MIN)).collect();
        let upper: Vec<DomainValue> = (0..columns.len()).map(|i| key_at(i, DomainValue::MAX)).collect();

        self.entries
            .range::<[DomainValue], _>((
                Bound::Included(lower.as_slice()),
                Bound::Included(upper.as_slice()),
            ))
            .map(|(_, &handle)| handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_exists() {
        let mut index: Index<u32> = Index::new(LexOrder::new(vec![1, 0]));
        assert!(index.insert(&[1, 2], 0));
        assert!(!index.insert(&[1, 2], 7));
        assert!(index.exists(&[1, 2]));
        assert!(!index.exists(&[2, 1]));
        assert_eq!(index.get(&[1, 2]), Some(0));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_iter_follows_order() {
        let mut index: Index<u32> = Index::new(LexOrder::new(vec![1, 0]));
        index.insert(&[1, 30], 0);
        index.insert(&[2, 10], 1);
        index.insert(&[3, 20], 2);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_range_prefix() {
        let mut index: Index<u32> = Index::new(LexOrder::new(vec![0, 1, 2]));
        index.insert(&[1, 1, 1], 0);
        index.insert(&[1, 2, 3], 1);
        index.insert(&[2, 1, 1], 2);
        index.insert(&[1, 2, DomainValue::MAX], 3);
        index.insert(&[1, 2, DomainValue::MIN], 4);

        let by_first = SearchSignature::from_columns([0]);
        assert_eq!(index.range(&[1, 0, 0], by_first).collect::<Vec<_>>(), vec![0, 4, 1, 3]);

        let by_two = SearchSignature::from_columns([0, 1]);
        assert_eq!(index.range(&[1, 2, 0], by_two).collect::<Vec<_>>(), vec![4, 1, 3]);

        assert_eq!(index.range(&[9, 9, 9], by_first).count(), 0);
        assert_eq!(index.range(&[0, 0, 0], SearchSignature::EMPTY).count(), 5);
    }

    #[test]
    #[should_panic(expected = "cannot serve")]
    fn test_range_wrong_signature() {
        let index: Index<u32> = Index::new(LexOrder::new(vec![0, 1]));
        let _ = index.range(&[0, 0], SearchSignature::from_columns([1])).count();
    }

    #[test]
    fn test_trivial_order_holds_one_key() {
        let mut index: Index<()> = Index::new(LexOrder::trivial());
        assert!(!index.exists(&[]));
        assert!(index.insert(&[], ()));
        assert!(!index.insert(&[], ()));
        assert!(index.exists(&[]));
        index.purge();
        assert!(index.is_empty());
    }
}
