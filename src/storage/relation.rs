//! Relations and the buffered output sink.

use crate::common::{BlockId, Result};
use crate::storage::{Block, BlockManager, Schema, Tuple};

/// A fully materialized relation: a schema plus an ordered list of block
/// references.
///
/// The relation owns no frames — it is pure disk-reference metadata. Sizes
/// are exact here (the store is synchronous and reliable), standing in for
/// the estimates a planner would use.
#[derive(Debug, Clone)]
pub struct Relation {
    schema: Schema,
    blocks: Vec<BlockId>,
    tuple_count: usize,
}

impl Relation {
    /// Create an empty relation.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            blocks: Vec::new(),
            tuple_count: 0,
        }
    }

    pub(crate) fn from_parts(schema: Schema, blocks: Vec<BlockId>, tuple_count: usize) -> Self {
        Self {
            schema,
            blocks,
            tuple_count,
        }
    }

    /// The relation's schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The relation's block references, in order.
    #[inline]
    pub fn block_ids(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Size in blocks.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Size in tuples.
    #[inline]
    pub fn tuple_count(&self) -> usize {
        self.tuple_count
    }

    /// Stream the relation's tuples into memory, one frame at a time.
    ///
    /// Needs one free frame; the budget is restored before returning.
    pub fn scan(&self, store: &BlockManager) -> Result<Vec<Tuple>> {
        let mut tuples = Vec::with_capacity(self.tuple_count);
        for &id in &self.blocks {
            let block = store.load(id)?;
            tuples.extend_from_slice(block.tuples());
            store.release(block, false);
        }
        Ok(tuples)
    }
}

/// A buffered sink producing a [`Relation`] block by block.
///
/// The writer holds at most one resident frame: a full frame is flushed to
/// disk and replaced, and [`RelationWriter::finish`] flushes the partial
/// trailing frame exactly once. Both the sort's merge phase and the join's
/// probe phase emit their output through this sink.
#[derive(Debug)]
pub struct RelationWriter<'a> {
    store: &'a BlockManager,
    schema: Schema,
    current: Option<Block>,
    blocks: Vec<BlockId>,
    tuple_count: usize,
}

impl<'a> RelationWriter<'a> {
    /// Create a writer for a relation with the given schema.
    ///
    /// No frame is taken until the first [`RelationWriter::push`].
    pub fn new(store: &'a BlockManager, schema: Schema) -> Self {
        Self {
            store,
            schema,
            current: None,
            blocks: Vec::new(),
            tuple_count: 0,
        }
    }

    /// Append a tuple, flushing the output frame to disk when it fills.
    ///
    /// # Errors
    /// [`Error::NoFreeFrames`] if no frame can be taken for the output block
    /// (the operators' feasibility checks reserve this frame up front).
    ///
    /// [`Error::NoFreeFrames`]: crate::common::Error::NoFreeFrames
    pub fn push(&mut self, tuple: Tuple) -> Result<()> {
        let block = match self.current.as_mut() {
            Some(block) => block,
            None => self.current.insert(self.store.allocate()?),
        };
        block.push(tuple);
        self.tuple_count += 1;

        if block.is_full() {
            let block = self.current.take().expect("output frame present");
            self.blocks.push(self.store.release(block, true));
        }
        Ok(())
    }

    /// Tuples pushed so far.
    #[inline]
    pub fn tuple_count(&self) -> usize {
        self.tuple_count
    }

    /// Flush the trailing partial frame and return the finished relation.
    pub fn finish(mut self) -> Result<Relation> {
        if let Some(block) = self.current.take() {
            // A trailing frame exists only if it holds tuples: full frames
            // are flushed eagerly in push.
            debug_assert!(!block.is_empty());
            self.blocks.push(self.store.release(block, true));
        }
        Ok(Relation::from_parts(
            self.schema,
            self.blocks,
            self.tuple_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    fn tuple(i: i64) -> Tuple {
        Tuple::new(vec![Value::Int(i)])
    }

    fn int_schema() -> Schema {
        Schema::new(vec!["n"])
    }

    #[test]
    fn test_writer_packs_blocks_to_capacity() {
        let store = BlockManager::new(2, 3);
        let mut writer = RelationWriter::new(&store, int_schema());
        for i in 0..7 {
            writer.push(tuple(i)).unwrap();
        }
        let relation = writer.finish().unwrap();

        // 7 tuples at 3 per block: two full blocks and one trailing block.
        assert_eq!(relation.block_count(), 3);
        assert_eq!(relation.tuple_count(), 7);
        assert_eq!(store.free_frames(), 2);

        let tuples = relation.scan(&store).unwrap();
        assert_eq!(tuples, (0..7).map(tuple).collect::<Vec<_>>());
    }

    #[test]
    fn test_writer_empty_relation() {
        let store = BlockManager::new(1, 3);
        let writer = RelationWriter::new(&store, int_schema());
        let relation = writer.finish().unwrap();

        assert_eq!(relation.block_count(), 0);
        assert_eq!(relation.tuple_count(), 0);
        assert_eq!(store.free_frames(), 1);
        assert!(relation.scan(&store).unwrap().is_empty());
    }

    #[test]
    fn test_writer_holds_at_most_one_frame() {
        let store = BlockManager::new(1, 2);
        let mut writer = RelationWriter::new(&store, int_schema());
        for i in 0..10 {
            writer.push(tuple(i)).unwrap();
        }
        // Single-frame budget was enough for the whole stream.
        let relation = writer.finish().unwrap();
        assert_eq!(relation.block_count(), 5);
        assert_eq!(store.free_frames(), 1);
    }
}
