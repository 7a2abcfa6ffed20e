//! Block-allocated tuple storage.
//!
//! Tuples are written back to back into fixed-size blocks. A block, once
//! allocated, is never moved or resized, so a [`TupleHandle`] handed out by
//! [`TupleArena::append`] stays valid until the arena is purged or dropped.

use relstore_index::DomainValue;
use tracing::trace;

/// Number of domain values held by one block.
pub const BLOCK_SIZE: usize = 1024;

/// Stable location of a stored tuple: block number and value offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleHandle {
    block: u32,
    offset: u32,
}

impl TupleHandle {
    /// Stand-in for the single tuple of a nullary relation, which has no
    /// arena slot.
    pub const NULLARY: Self = Self {
        block: u32::MAX,
        offset: 0,
    };

    pub fn block(self) -> usize {
        self.block as usize
    }

    pub fn offset(self) -> usize {
        self.offset as usize
    }
}

/// Append-only storage for the tuples of one relation.
#[derive(Debug, Clone)]
pub struct TupleArena {
    arity: usize,
    /// Tuples per block.
    per_block: usize,
    blocks: Vec<Box<[DomainValue]>>,
    len: usize,
}

impl TupleArena {
    pub fn new(arity: usize) -> Self {
        Self::with_block_size(arity, BLOCK_SIZE)
    }

    /// Arena whose blocks hold `block_size` values. A tuple wider than the
    /// block gets a block of its own.
    pub fn with_block_size(arity: usize, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be positive");
        Self {
            arity,
            per_block: (block_size / arity.max(1)).max(1),
            blocks: Vec::new(),
            len: 0,
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Tuples that fit in one block.
    pub fn tuples_per_block(&self) -> usize {
        self.per_block
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Copy `tuple` into the next free slot, opening a new block when the
    /// current one is full.
    pub fn append(&mut self, tuple: &[DomainValue]) -> TupleHandle {
        assert!(self.arity > 0, "nullary relations keep no arena storage");
        assert_eq!(tuple.len(), self.arity, "tuple width does not match arena arity");

        let handle = self.handle_at(self.len);
        if handle.offset == 0 {
            trace!(block = self.blocks.len(), arity = self.arity, "allocating tuple block");
            self.blocks
                .push(vec![0; self.per_block * self.arity].into_boxed_slice());
        }

        let start = handle.offset();
        self.blocks[handle.block()][start..start + self.arity].copy_from_slice(tuple);
        self.len += 1;
        handle
    }

    /// The tuple stored at `handle`.
    pub fn get(&self, handle: TupleHandle) -> &[DomainValue] {
        let start = handle.offset();
        &self.blocks[handle.block()][start..start + self.arity]
    }

    /// Handle of the `i`-th appended tuple. Valid for `i < len()`, and for
    /// `i == len()` as the slot the next append will use.
    pub fn handle_at(&self, i: usize) -> TupleHandle {
        let block = u32::try_from(i / self.per_block)
            .ok()
            .filter(|&block| block != TupleHandle::NULLARY.block)
            .expect("tuple arena exceeded the addressable block count");
        let offset = u32::try_from((i % self.per_block) * self.arity)
            .expect("tuple arena block offset exceeds u32");
        TupleHandle { block, offset }
    }

    /// Release every block back to the allocator.
    pub fn purge(&mut self) {
        self.blocks = Vec::new();
        self.len = 0;
    }

    /// Stored tuples in append order.
    pub fn iter(&self) -> ArenaIter<'_> {
        ArenaIter {
            arena: self,
            next: 0,
        }
    }
}

/// Walks an arena's tuples in append order across block boundaries.
#[derive(Debug, Clone)]
pub struct ArenaIter<'a> {
    arena: &'a TupleArena,
    next: usize,
}

impl<'a> ArenaIter<'a> {
    /// Handle of the tuple the next call to `next` yields.
    pub fn peek_handle(&self) -> Option<TupleHandle> {
        (self.next < self.arena.len).then(|| self.arena.handle_at(self.next))
    }
}

impl<'a> Iterator for ArenaIter<'a> {
    type Item = &'a [DomainValue];

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.peek_handle()?;
        self.next += 1;
        Some(self.arena.get(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.arena.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArenaIter<'_> {}
