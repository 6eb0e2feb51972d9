//! Block - a resident, fixed-capacity tuple sequence.

use crate::common::BlockId;
use crate::storage::Tuple;

/// A block materialized into a memory frame.
///
/// A `Block` is the *resident* half of the block model: it occupies exactly
/// one frame of the store's budget from [`BlockManager::allocate`] /
/// [`BlockManager::load`] until [`BlockManager::release`]. Its immutable
/// counterpart is the [`BlockId`] reference, which costs nothing.
///
/// The block tracks its own occupancy (`len`, `is_full`, `is_empty`). The
/// store exposes no element-removal primitive, so algorithms that consume a
/// block tuple-by-tuple (the merge phase of the external sort) keep their own
/// remaining counters next to this bookkeeping.
///
/// [`BlockManager::allocate`]: crate::storage::BlockManager::allocate
/// [`BlockManager::load`]: crate::storage::BlockManager::load
/// [`BlockManager::release`]: crate::storage::BlockManager::release
#[derive(Debug)]
pub struct Block {
    id: BlockId,
    tuples: Vec<Tuple>,
    capacity: usize,
}

impl Block {
    /// Called by the store when a frame is allocated or loaded.
    pub(crate) fn new(id: BlockId, tuples: Vec<Tuple>, capacity: usize) -> Self {
        debug_assert!(tuples.len() <= capacity);
        Self {
            id,
            tuples,
            capacity,
        }
    }

    /// The stable identity of this block.
    ///
    /// For a loaded block this is the disk reference it came from; for a
    /// freshly allocated block it is the reference it will persist under.
    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Number of tuples currently in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Whether the block holds no tuples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Whether the block is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.tuples.len() == self.capacity
    }

    /// Maximum number of tuples this block can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a tuple.
    ///
    /// # Panics
    /// Panics if the block is full. Callers check [`Block::is_full`] first;
    /// overflowing a frame is a programming error, not a runtime condition.
    pub fn push(&mut self, tuple: Tuple) {
        assert!(!self.is_full(), "block {} overflow", self.id);
        self.tuples.push(tuple);
    }

    /// The tuples currently in the block, in slot order.
    #[inline]
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Called by the store on release, and by the block sorter to rewrite
    /// frames in place.
    pub(crate) fn take_tuples(&mut self) -> Vec<Tuple> {
        std::mem::take(&mut self.tuples)
    }

    pub(crate) fn set_tuples(&mut self, tuples: Vec<Tuple>) {
        debug_assert!(tuples.len() <= self.capacity);
        self.tuples = tuples;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    fn tuple(i: i64) -> Tuple {
        Tuple::new(vec![Value::Int(i)])
    }

    #[test]
    fn test_block_occupancy_bookkeeping() {
        let mut block = Block::new(BlockId::new(0), Vec::new(), 2);
        assert!(block.is_empty());
        assert!(!block.is_full());

        block.push(tuple(1));
        assert_eq!(block.len(), 1);

        block.push(tuple(2));
        assert!(block.is_full());
        assert_eq!(block.capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn test_block_push_past_capacity_panics() {
        let mut block = Block::new(BlockId::new(0), Vec::new(), 1);
        block.push(tuple(1));
        block.push(tuple(2));
    }
}
