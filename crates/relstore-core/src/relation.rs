//! Relation storage: an arena of tuples plus one ordered index per ordering.

use std::sync::Arc;

use relstore_index::{DomainValue, Index, LexOrder, OrderCatalog, SearchSignature};
use tracing::{debug, trace};

use crate::Tuple;
use crate::arena::{ArenaIter, BLOCK_SIZE, TupleArena, TupleHandle};
use crate::error::StoreError;
use crate::policy::InsertPolicy;
use crate::tag::RelationRepresentation;

/// Construction-time settings of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationOptions {
    pub policy: InsertPolicy,
    /// Domain values per arena block.
    pub block_size: usize,
}

impl RelationOptions {
    /// Default options with the insert policy `representation` calls for.
    pub fn for_representation(representation: RelationRepresentation) -> Self {
        Self {
            policy: InsertPolicy::for_representation(representation),
            ..Self::default()
        }
    }
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            policy: InsertPolicy::Plain,
            block_size: BLOCK_SIZE,
        }
    }
}

/// The extension of one relation.
///
/// Tuples live in a [`TupleArena`]; every index in the relation maps its own
/// column ordering to arena handles. Insertion checks the total-signature
/// index first, so no tuple is ever stored twice.
#[derive(Debug, Clone)]
pub struct Relation {
    arity: usize,
    policy: InsertPolicy,
    catalog: Arc<OrderCatalog>,
    indices: Vec<Index<TupleHandle>>,
    arena: TupleArena,
    /// Number of stored tuples.
    len: usize,
    /// Type names of the columns, as given by the evaluator.
    attribute_types: Vec<String>,
    /// Stratum this relation belongs to.
    level: usize,
}

impl Relation {
    /// A plain relation with default options.
    pub fn new(arity: usize, catalog: Arc<OrderCatalog>) -> Self {
        Self::with_options(arity, catalog, RelationOptions::default())
    }

    /// A binary relation kept closed as an equivalence.
    pub fn equivalence(catalog: Arc<OrderCatalog>) -> Self {
        let options = RelationOptions {
            policy: InsertPolicy::EquivalenceClosure,
            ..RelationOptions::default()
        };
        Self::with_options(2, catalog, options)
    }

    /// A relation storing `representation`, checking the arity requirements
    /// instead of panicking on them.
    pub fn for_representation(
        representation: RelationRepresentation,
        arity: usize,
        catalog: Arc<OrderCatalog>,
    ) -> Result<Self, StoreError> {
        Self::try_with_options(arity, catalog, RelationOptions::for_representation(representation))
    }

    /// [`with_options`](Self::with_options) reporting bad arities as errors.
    pub fn try_with_options(
        arity: usize,
        catalog: Arc<OrderCatalog>,
        options: RelationOptions,
    ) -> Result<Self, StoreError> {
        if catalog.arity() != arity {
            return Err(StoreError::ArityMismatch {
                expected: arity,
                actual: catalog.arity(),
            });
        }
        if options.policy == InsertPolicy::EquivalenceClosure && arity != 2 {
            return Err(StoreError::NotBinary { arity });
        }
        Ok(Self::with_options(arity, catalog, options))
    }

    /// # Panics
    ///
    /// Panics if `catalog` was built for another arity, or if an equivalence
    /// relation is requested with an arity other than 2.
    pub fn with_options(arity: usize, catalog: Arc<OrderCatalog>, options: RelationOptions) -> Self {
        assert_eq!(
            catalog.arity(),
            arity,
            "ordering catalog built for a different arity"
        );
        if options.policy == InsertPolicy::EquivalenceClosure {
            assert_eq!(arity, 2, "equivalence relations are binary");
        }

        let indices: Vec<Index<TupleHandle>> = if catalog.is_empty() {
            vec![Index::new(LexOrder::identity(arity))]
        } else {
            catalog.all_orders().iter().cloned().map(Index::new).collect()
        };
        debug!(
            arity,
            indices = indices.len(),
            policy = ?options.policy,
            block_size = options.block_size,
            "created relation"
        );

        Self {
            arity,
            policy: options.policy,
            catalog,
            indices,
            arena: TupleArena::with_block_size(arity, options.block_size),
            len: 0,
            attribute_types: Vec::new(),
            level: 0,
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn policy(&self) -> InsertPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &Arc<OrderCatalog> {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arena blocks currently allocated.
    pub fn block_count(&self) -> usize {
        self.arena.block_count()
    }

    pub fn attribute_types(&self) -> &[String] {
        &self.attribute_types
    }

    pub fn set_attribute_types(&mut self, types: Vec<String>) {
        self.attribute_types = types;
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    /// Insert a tuple under this relation's policy. Returns true if anything
    /// was stored.
    ///
    /// # Panics
    ///
    /// Panics if `tuple` does not have this relation's arity.
    pub fn insert(&mut self, tuple: &[DomainValue]) -> bool {
        assert_eq!(tuple.len(), self.arity, "tuple arity mismatch");
        self.apply_insert_policy(tuple)
    }

    /// [`insert`](Self::insert) for tuples whose width is not known to match.
    pub fn try_insert(&mut self, tuple: &[DomainValue]) -> Result<bool, StoreError> {
        if tuple.len() != self.arity {
            return Err(StoreError::ArityMismatch {
                expected: self.arity,
                actual: tuple.len(),
            });
        }
        Ok(self.apply_insert_policy(tuple))
    }

    /// Insert every tuple of `other`, one at a time. Returns the number of
    /// tuples this relation grew by.
    ///
    /// # Panics
    ///
    /// Panics, before touching either relation, if the arities differ.
    pub fn insert_all(&mut self, other: &Relation) -> usize {
        assert_eq!(
            self.arity, other.arity,
            "cannot merge relations of different arity"
        );
        let before = self.len;
        for tuple in other {
            self.apply_insert_policy(tuple);
        }
        self.len - before
    }

    /// The tuples this relation would have to store for `tuple` to be
    /// present, given its current contents.
    pub fn extend(&self, tuple: &[DomainValue]) -> Vec<Tuple> {
        self.policy.extend(tuple, self.iter())
    }

    fn apply_insert_policy(&mut self, tuple: &[DomainValue]) -> bool {
        match self.policy {
            InsertPolicy::Plain => self.insert_stored(tuple),
            InsertPolicy::EquivalenceClosure => {
                // stored pairs are already closed
                if self.exists(tuple) {
                    return false;
                }
                let (a, b) = (tuple[0], tuple[1]);
                let class_a = self.class_of(a);
                let class_b = if a == b { Vec::new() } else { self.class_of(b) };
                trace!(a, b, left = class_a.len(), right = class_b.len(), "joining classes");

                let mut changed = false;
                for &x in class_a.iter().chain(&class_b) {
                    changed |= self.insert_stored(&[x, x]);
                }
                for &x in &class_a {
                    for &y in &class_b {
                        changed |= self.insert_stored(&[x, y]);
                        changed |= self.insert_stored(&[y, x]);
                    }
                }
                changed
            }
        }
    }

    /// Members of `x`'s equivalence class, or just `x` if it is not stored.
    /// Reads the pairs `(x, _)` through an index on the first column when
    /// one serves, otherwise scans.
    fn class_of(&self, x: DomainValue) -> Vec<DomainValue> {
        let first = SearchSignature::from_columns([0]);
        let mut class: Vec<DomainValue> = self
            .matching(&[x, x], first)
            .into_iter()
            .map(|pair| pair[1])
            .collect();
        if class.is_empty() {
            class.push(x);
        }
        class
    }

    /// Deduplicated physical insert: arena append plus every index.
    fn insert_stored(&mut self, tuple: &[DomainValue]) -> bool {
        if self.exists(tuple) {
            return false;
        }
        if self.arity == 0 {
            self.indices[0].insert(tuple, TupleHandle::NULLARY);
            self.len = 1;
            return true;
        }

        let handle = self.arena.append(tuple);
        for index in &mut self.indices {
            let fresh = index.insert(tuple, handle);
            debug_assert!(fresh, "index {} diverged from the arena", index.order());
        }
        self.len += 1;
        true
    }

    /// Exact membership, answered by the total-signature index.
    pub fn exists(&self, tuple: &[DomainValue]) -> bool {
        assert_eq!(tuple.len(), self.arity, "tuple arity mismatch");
        if self.arity == 0 {
            return self.get_index_by_pos(0).exists(tuple);
        }
        self.get_index(self.total_signature()).exists(tuple)
    }

    /// Whether some stored tuple agrees with `pattern` on the columns bound
    /// in `signature`.
    pub fn exists_matching(&self, pattern: &[DomainValue], signature: SearchSignature) -> bool {
        self.check_pattern(pattern, signature);
        if signature.is_empty() {
            return !self.is_empty();
        }
        if signature == self.total_signature() {
            return self.exists(pattern);
        }
        match self.find_index(signature) {
            Some(index) => index.range(pattern, signature).next().is_some(),
            None => self.iter().any(|tuple| agrees(tuple, pattern, signature)),
        }
    }

    /// Stored tuples agreeing with `pattern` on the columns bound in
    /// `signature`. Ordered by the serving index when there is one, otherwise
    /// by insertion.
    pub fn matching(&self, pattern: &[DomainValue], signature: SearchSignature) -> Vec<&[DomainValue]> {
        self.check_pattern(pattern, signature);
        if self.arity == 0 {
            return self.iter().collect();
        }
        match self.find_index(signature) {
            Some(index) => index
                .range(pattern, signature)
                .map(|handle| self.arena.get(handle))
                .collect(),
            None => self
                .iter()
                .filter(|tuple| agrees(tuple, pattern, signature))
                .collect(),
        }
    }

    fn check_pattern(&self, pattern: &[DomainValue], signature: SearchSignature) {
        assert_eq!(pattern.len(), self.arity, "pattern arity mismatch");
        assert!(
            signature.fits(self.arity),
            "signature {signature} exceeds arity {}",
            self.arity
        );
    }

    /// Drop every tuple. Indices and metadata stay in place for reuse.
    pub fn purge(&mut self) {
        debug!(arity = self.arity, tuples = self.len, "purging relation");
        self.arena.purge();
        for index in &mut self.indices {
            index.purge();
        }
        self.len = 0;
    }

    /// The signature binding every column.
    pub fn total_signature(&self) -> SearchSignature {
        SearchSignature::total(self.arity)
    }

    pub fn indices(&self) -> &[Index<TupleHandle>] {
        &self.indices
    }

    /// Position of the index serving `signature`, if any.
    pub fn find_index_position(&self, signature: SearchSignature) -> Option<usize> {
        self.catalog
            .lex_order_number(signature)
            .filter(|&pos| pos < self.indices.len())
            .or_else(|| {
                self.indices
                    .iter()
                    .position(|index| index.order().serves(signature))
            })
    }

    pub fn find_index(&self, signature: SearchSignature) -> Option<&Index<TupleHandle>> {
        self.find_index_position(signature)
            .map(|pos| &self.indices[pos])
    }

    /// # Panics
    ///
    /// Panics if no index of this relation serves `signature`.
    pub fn get_index(&self, signature: SearchSignature) -> &Index<TupleHandle> {
        self.find_index(signature).unwrap_or_else(|| {
            panic!(
                "no index of this arity-{} relation serves signature {signature}",
                self.arity
            )
        })
    }

    /// # Panics
    ///
    /// Panics if `pos` is not an index position of this relation.
    pub fn get_index_by_pos(&self, pos: usize) -> &Index<TupleHandle> {
        self.indices.get(pos).unwrap_or_else(|| {
            panic!(
                "index position {pos} out of range ({} indices)",
                self.indices.len()
            )
        })
    }

    /// The tuple stored at `handle`.
    pub fn tuple(&self, handle: TupleHandle) -> &[DomainValue] {
        if self.arity == 0 {
            return &[];
        }
        self.arena.get(handle)
    }

    /// Stored tuples in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tuples: self.arena.iter(),
            nullary: self.arity == 0 && self.len == 1,
        }
    }
}

fn agrees(tuple: &[DomainValue], pattern: &[DomainValue], signature: SearchSignature) -> bool {
    signature.bound_columns().all(|col| tuple[col] == pattern[col])
}

/// Insertion-order walk over a relation's tuples.
///
/// Restart by calling [`Relation::iter`] again.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    tuples: ArenaIter<'a>,
    /// A nullary relation's single tuple is still to be yielded.
    nullary: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [DomainValue];

    fn next(&mut self) -> Option<Self::Item> {
        if self.nullary {
            self.nullary = false;
            return Some(&[]);
        }
        self.tuples.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.tuples.size_hint();
        let extra = usize::from(self.nullary);
        (lo + extra, hi.map(|hi| hi + extra))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Relation {
    type Item = &'a [DomainValue];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn catalog(arity: usize) -> Arc<OrderCatalog> {
        Arc::new(OrderCatalog::from_signatures(arity, []).unwrap())
    }

    fn contents(rel: &Relation) -> BTreeSet<Vec<DomainValue>> {
        rel.iter().map(<[DomainValue]>::to_vec).collect()
    }

    #[test]
    fn test_insert_and_exists() {
        let mut rel = Relation::new(2, catalog(2));
        assert!(rel.insert(&[1, 2]));
        assert!(!rel.insert(&[1, 2])); // duplicate
        assert!(rel.exists(&[1, 2]));
        assert!(!rel.exists(&[2, 1]));
        assert_eq!(rel.len(), 1);
    }

    #[test]
    fn test_every_index_sees_insert() {
        let signatures = [SearchSignature::from_columns([0]), SearchSignature::from_columns([1])];
        let cat = Arc::new(OrderCatalog::from_signatures(2, signatures).unwrap());
        let mut rel = Relation::new(2, cat);
        assert_eq!(rel.indices().len(), 2);

        rel.insert(&[1, 10]);
        rel.insert(&[2, 10]);
        for index in rel.indices() {
            assert_eq!(index.len(), 2);
        }
        let by_second = SearchSignature::from_columns([1]);
        assert_eq!(rel.matching(&[0, 10], by_second), vec![&[1, 10][..], &[2, 10][..]]);
    }

    #[test]
    fn test_empty_catalog_gets_default_index() {
        let mut rel = Relation::new(3, Arc::new(OrderCatalog::empty(3)));
        assert_eq!(rel.indices().len(), 1);
        assert_eq!(rel.indices()[0].order(), &LexOrder::identity(3));
        rel.insert(&[1, 2, 3]);
        rel.insert(&[1, 2, 4]);
        assert_eq!(rel.len(), 2);
        assert!(rel.exists(&[1, 2, 4]));
    }

    #[test]
    fn test_nullary() {
        let mut rel = Relation::new(0, catalog(0));
        assert!(rel.is_empty());
        assert_eq!(rel.iter().count(), 0);
        assert!(rel.insert(&[]));
        assert!(!rel.insert(&[]));
        assert_eq!(rel.len(), 1);
        assert!(rel.exists(&[]));
        assert_eq!(rel.iter().collect::<Vec<_>>(), vec![&[] as &[DomainValue]]);
        assert_eq!(rel.block_count(), 0);

        rel.purge();
        assert!(rel.is_empty());
        assert!(!rel.exists(&[]));
        assert_eq!(rel.iter().count(), 0);
    }

    #[test]
    fn test_iteration_is_insertion_order() {
        let mut rel = Relation::new(1, catalog(1));
        for v in [5, 3, 9, 1] {
            rel.insert(&[v]);
        }
        let first: Vec<_> = rel.iter().map(|t| t[0]).collect();
        let second: Vec<_> = (&rel).into_iter().map(|t| t[0]).collect();
        assert_eq!(first, vec![5, 3, 9, 1]);
        assert_eq!(first, second);
        assert_eq!(rel.iter().len(), 4);
    }

    #[test]
    fn test_block_boundary() {
        let arity = 3;
        let per_block = BLOCK_SIZE / arity;
        let mut rel = Relation::new(arity, catalog(arity));
        let n = per_block as i32 + 1;
        for i in 0..n {
            rel.insert(&[i, i + 1, i + 2]);
        }
        assert_eq!(rel.block_count(), 2);
        assert_eq!(rel.len(), per_block + 1);
        for i in 0..n {
            assert!(rel.exists(&[i, i + 1, i + 2]));
        }
        let firsts: Vec<_> = rel.iter().map(|t| t[0]).collect();
        assert_eq!(firsts, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_purge_and_reuse() {
        let mut rel = Relation::new(2, catalog(2));
        rel.insert(&[1, 2]);
        rel.insert(&[3, 4]);
        rel.purge();
        assert!(rel.is_empty());
        assert_eq!(rel.len(), 0);
        assert!(!rel.exists(&[1, 2]));
        assert_eq!(rel.block_count(), 0);

        assert!(rel.insert(&[3, 4]));
        assert_eq!(rel.iter().collect::<Vec<_>>(), vec![&[3, 4][..]]);
    }

    #[test]
    fn test_insert_all_is_union() {
        let mut a = Relation::new(2, catalog(2));
        let mut b = Relation::new(2, catalog(2));
        a.insert(&[1, 1]);
        a.insert(&[1, 2]);
        b.insert(&[1, 2]);
        b.insert(&[2, 2]);

        let mut expected = contents(&a);
        expected.extend(contents(&b));

        assert_eq!(a.insert_all(&b), 1);
        assert_eq!(contents(&a), expected);
        assert_eq!(b.len(), 2);
    }

    #[test]
    #[should_panic(expected = "different arity")]
    fn test_insert_all_arity_mismatch() {
        let mut a = Relation::new(2, catalog(2));
        let b = Relation::new(3, catalog(3));
        a.insert_all(&b);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_position_out_of_range() {
        let rel = Relation::new(2, catalog(2));
        let _ = rel.get_index_by_pos(1);
    }

    #[test]
    fn test_try_insert_checks_width() {
        let mut rel = Relation::new(2, catalog(2));
        assert_eq!(
            rel.try_insert(&[1]),
            Err(StoreError::ArityMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(rel.try_insert(&[1, 2]), Ok(true));
    }

    #[test]
    fn test_exists_matching() {
        let mut rel = Relation::new(3, catalog(3));
        rel.insert(&[1, 2, 3]);
        rel.insert(&[4, 2, 6]);

        // no index serves {1}; falls back to a scan
        let mid = SearchSignature::from_columns([1]);
        assert!(rel.exists_matching(&[0, 2, 0], mid));
        assert!(!rel.exists_matching(&[0, 5, 0], mid));

        let first = SearchSignature::from_columns([0]);
        assert!(rel.exists_matching(&[4, 0, 0], first));
        assert!(!rel.exists_matching(&[2, 0, 0], first));

        assert!(rel.exists_matching(&[0, 0, 0], SearchSignature::EMPTY));
        assert!(rel.exists_matching(&[4, 2, 6], rel.total_signature()));
        assert_eq!(rel.matching(&[0, 2, 0], mid).len(), 2);
    }

    #[test]
    fn test_metadata_passthrough() {
        let mut rel = Relation::new(2, catalog(2));
        rel.set_attribute_types(vec!["i:number".into(), "s:symbol".into()]);
        rel.set_level(3);
        assert_eq!(rel.attribute_types(), &["i:number", "s:symbol"]);
        assert_eq!(rel.level(), 3);
    }

    #[test]
    fn test_for_representation() {
        let rel = Relation::for_representation(RelationRepresentation::Eqrel, 2, catalog(2)).unwrap();
        assert_eq!(rel.policy(), InsertPolicy::EquivalenceClosure);

        let err = Relation::for_representation(RelationRepresentation::Eqrel, 3, catalog(3));
        assert_eq!(err.unwrap_err(), StoreError::NotBinary { arity: 3 });

        let err = Relation::for_representation(RelationRepresentation::Btree, 2, catalog(3));
        assert!(matches!(err, Err(StoreError::ArityMismatch { .. })));
    }

    #[test]
    fn test_plain_extend_is_identity() {
        let rel = Relation::new(2, catalog(2));
        assert_eq!(rel.extend(&[3, 4]), vec![vec![3, 4]]);
    }

    // ─── Equivalence closure ────────────────────────────────────────────

    fn pairs(rel: &Relation) -> BTreeSet<(DomainValue, DomainValue)> {
        rel.iter().map(|t| (t[0], t[1])).collect()
    }

    #[test]
    fn test_eqrel_first_pair() {
        let mut rel = Relation::equivalence(catalog(2));
        assert!(rel.insert(&[1, 2]));
        assert_eq!(pairs(&rel), BTreeSet::from([(1, 1), (1, 2), (2, 1), (2, 2)]));
    }

    #[test]
    fn test_eqrel_chain_of_two() {
        let mut rel = Relation::equivalence(catalog(2));
        rel.insert(&[1, 2]);
        rel.insert(&[2, 3]);
        let expected = BTreeSet::from([
            (1, 1),
            (2, 2),
            (3, 3),
            (1, 2),
            (2, 1),
            (2, 3),
            (3, 2),
            (1, 3),
            (3, 1),
        ]);
        assert_eq!(pairs(&rel), expected);
        assert_eq!(rel.len(), 9);
    }

    #[test]
    fn test_eqrel_self_pair() {
        let mut rel = Relation::equivalence(catalog(2));
        assert!(rel.insert(&[4, 4]));
        assert!(!rel.insert(&[4, 4]));
        assert_eq!(pairs(&rel), BTreeSet::from([(4, 4)]));
    }

    #[test]
    fn test_eqrel_present_pair_is_noop() {
        let mut rel = Relation::equivalence(catalog(2));
        rel.insert(&[1, 2]);
        rel.insert(&[2, 3]);
        assert!(!rel.insert(&[3, 1]));
        assert_eq!(rel.len(), 9);
    }

    #[test]
    fn test_eqrel_joins_two_classes() {
        let mut rel = Relation::equivalence(catalog(2));
        rel.insert(&[1, 2]);
        rel.insert(&[3, 4]);
        assert_eq!(rel.len(), 8);

        rel.insert(&[2, 3]);
        assert_eq!(rel.len(), 16);
        for x in 1..=4 {
            for y in 1..=4 {
                assert!(rel.exists(&[x, y]), "missing ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_eqrel_long_chain() {
        let n = 300;
        let mut rel = Relation::equivalence(catalog(2));
        for i in 0..n {
            assert!(rel.insert(&[i, i + 1]));
        }
        assert_eq!(rel.len(), ((n + 1) * (n + 1)) as usize);
        assert!(rel.exists(&[0, n]));
        assert!(rel.exists(&[n, 0]));
    }

    #[test]
    fn test_eqrel_joins_two_classes_without_first_column_index() {
        let reversed = Arc::new(OrderCatalog::from_orders(2, vec![LexOrder::new(vec![1, 0])]).unwrap());
        let mut rel = Relation::equivalence(reversed);
        rel.insert(&[1, 2]);
        rel.insert(&[3, 4]);
        rel.insert(&[2, 3]);
        let expected: BTreeSet<_> = (1..=4).flat_map(|x| (1..=4).map(move |y| (x, y))).collect();
        assert_eq!(pairs(&rel), expected);
    }

    #[test]
    fn test_eqrel_merge_relation() {
        let mut a = Relation::equivalence(catalog(2));
        a.insert(&[1, 2]);
        let mut b = Relation::equivalence(catalog(2));
        b.insert(&[2, 3]);
        b.insert(&[5, 6]);

        a.insert_all(&b);
        let class: BTreeSet<_> = [1, 2, 3]
            .iter()
            .flat_map(|&x| [1, 2, 3].map(|y| (x, y)))
            .chain([(5, 5), (5, 6), (6, 5), (6, 6)])
            .collect();
        assert_eq!(pairs(&a), class);
    }

    #[test]
    fn test_eqrel_extend_reports_implied_pairs() {
        let mut rel = Relation::equivalence(catalog(2));
        rel.insert(&[1, 2]);
        let implied: BTreeSet<_> = rel.extend(&[2, 3]).into_iter().collect();
        assert!(implied.contains(&vec![1, 3]));
        assert!(implied.contains(&vec![3, 1]));
        assert!(implied.contains(&vec![3, 3]));
        // extend is a pure computation
        assert_eq!(rel.len(), 4);
    }

    #[test]
    #[should_panic(expected = "binary")]
    fn test_eqrel_requires_binary() {
        let options = RelationOptions {
            policy: InsertPolicy::EquivalenceClosure,
            ..RelationOptions::default()
        };
        Relation::with_options(3, catalog(3), options);
    }
}
