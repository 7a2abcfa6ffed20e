//! A relation behind a reader-writer lock.
//!
//! [`Relation`] itself relies on `&mut self` for exclusive mutation. When
//! several workers insert into the same relation, wrap it in a
//! [`SharedRelation`]: single inserts take the write lock for one call, and
//! [`SharedRelation::batch`] holds it across a whole group of mutations so
//! readers only ever observe completed batches.

use parking_lot::{RwLock, RwLockReadGuard};
use relstore_index::DomainValue;

use crate::relation::Relation;

#[derive(Debug)]
pub struct SharedRelation {
    inner: RwLock<Relation>,
}

impl SharedRelation {
    pub fn new(relation: Relation) -> Self {
        Self {
            inner: RwLock::new(relation),
        }
    }

    pub fn insert(&self, tuple: &[DomainValue]) -> bool {
        self.inner.write().insert(tuple)
    }

    /// Merge `other` under this relation's write lock.
    pub fn insert_all(&self, other: &Relation) -> usize {
        self.inner.write().insert_all(other)
    }

    pub fn exists(&self, tuple: &[DomainValue]) -> bool {
        self.inner.read().exists(tuple)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn purge(&self) {
        self.inner.write().purge();
    }

    /// Run `f` with the write lock held for its whole duration.
    pub fn batch<R>(&self, f: impl FnOnce(&mut Relation) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Shared read access. Writers wait until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, Relation> {
        self.inner.read()
    }

    pub fn into_inner(self) -> Relation {
        self.inner.into_inner()
    }
}

impl From<Relation> for SharedRelation {
    fn from(relation: Relation) -> Self {
        Self::new(relation)
    }
}
