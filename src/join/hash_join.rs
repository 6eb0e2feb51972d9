//! Grace/partition hash equi-join.

use crate::common::{BlockId, Error, Result};
use crate::storage::{Block, BlockManager, Relation, RelationWriter, Tuple};

/// The equality predicate of a join: column `left` of the left relation
/// equals column `right` of the right relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinColumns {
    /// Join column index in the left relation.
    pub left: usize,
    /// Join column index in the right relation.
    pub right: usize,
}

impl JoinColumns {
    /// Create a join column pair.
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// Partitioned (grace) hash inner equi-join over a frame-budgeted store.
///
/// One frame is reserved for streaming input, leaving
/// `bucket_count = free_frames - 1` bucket representative frames for the
/// partition phase. The relation with fewer blocks becomes the build side
/// (size decides, not role); it is feasible to join iff the build side has
/// at most `(bucket_count - 1)^2` blocks, the inner `- 1` reserving the
/// probe phase's output frame. The check runs before any I/O.
///
/// Both relations are partitioned with the same modulus over their own join
/// column, so matching tuples always land in the same bucket index — which
/// is why the nested-loop probe can confine itself to same-index buckets.
///
/// Output tuples are left-fields-then-right-fields regardless of which side
/// was chosen as the build side; duplicate join keys produce the full cross
/// product within the matching pair.
pub struct PartitionHashJoin<'a> {
    store: &'a BlockManager,
    columns: JoinColumns,
}

/// The per-relation result of the partition phase: one block-reference list
/// per bucket index.
type BucketLists = Vec<Vec<BlockId>>;

impl<'a> PartitionHashJoin<'a> {
    /// Create a join on the given column pair.
    pub fn new(store: &'a BlockManager, columns: JoinColumns) -> Self {
        Self { store, columns }
    }

    /// Estimated I/O cost of the join.
    ///
    /// # Errors
    /// Always fails with [`Error::Unsupported`]: no cost model is
    /// implemented for this join, and unsupported operations never degrade.
    pub fn estimated_io_cost(&self, _left: &Relation, _right: &Relation) -> Result<usize> {
        Err(Error::Unsupported(
            "I/O cost estimate for partition hash join",
        ))
    }

    /// Join `left` and `right` on the configured column pair, fully
    /// materializing one output tuple per matching pair.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] if the smaller relation has more than
    /// `(bucket_count - 1)^2` blocks; raised before any I/O.
    pub fn join(&self, left: &Relation, right: &Relation) -> Result<Relation> {
        // One frame stays reserved for reading the relations in.
        let bucket_count = self.store.free_frames().saturating_sub(1);

        let swapped = left.block_count() > right.block_count();
        let (smaller, larger) = if swapped { (right, left) } else { (left, right) };
        let (smaller_column, larger_column) = if swapped {
            (self.columns.right, self.columns.left)
        } else {
            (self.columns.left, self.columns.right)
        };

        // The inner -1 reserves the output frame needed while probing.
        let capacity = bucket_count.saturating_sub(1).pow(2);
        if smaller.block_count() > capacity {
            return Err(Error::CapacityExceeded {
                required: smaller.block_count(),
                capacity,
            });
        }

        let smaller_buckets = self.partition(smaller, smaller_column, bucket_count)?;
        let larger_buckets = self.partition(larger, larger_column, bucket_count)?;

        self.probe(
            smaller_buckets,
            larger_buckets,
            smaller_column,
            larger_column,
            swapped,
            left,
            right,
        )
    }

    // ========================================================================
    // Partition phase
    // ========================================================================

    /// Hash-partition one relation into `bucket_count` block-reference
    /// lists, using that relation's own join column.
    ///
    /// Holds one representative frame per bucket plus one streaming input
    /// frame; every representative is released exactly once (persisted if it
    /// holds tuples, discarded if it stayed empty).
    fn partition(
        &self,
        relation: &Relation,
        column: usize,
        bucket_count: usize,
    ) -> Result<BucketLists> {
        let mut buckets: BucketLists = vec![Vec::new(); bucket_count];

        // Slots so a full representative can be released before its
        // replacement is allocated; the budget never dips below zero.
        let mut representatives: Vec<Option<Block>> = Vec::with_capacity(bucket_count);
        for _ in 0..bucket_count {
            representatives.push(Some(self.store.allocate()?));
        }

        for &id in relation.block_ids() {
            let input = self.store.load(id)?;

            for tuple in input.tuples() {
                let bucket = tuple.value(column).bucket(bucket_count);
                let mut representative = representatives[bucket]
                    .take()
                    .expect("bucket representative present");

                if representative.is_full() {
                    // Write the full representative to disk and start a
                    // fresh one for this bucket.
                    buckets[bucket].push(self.store.release(representative, true));
                    representative = self.store.allocate()?;
                }
                representative.push(tuple.clone());
                representatives[bucket] = Some(representative);
            }

            // Make space for the relation's next block.
            self.store.release(input, false);
        }

        for (bucket, slot) in representatives.into_iter().enumerate() {
            let representative = slot.expect("bucket representative present");
            if representative.is_empty() {
                self.store.release(representative, false);
            } else {
                buckets[bucket].push(self.store.release(representative, true));
            }
        }

        Ok(buckets)
    }

    // ========================================================================
    // Probe phase
    // ========================================================================

    /// For each bucket index: load the build side's bucket fully, stream the
    /// probe side's bucket block by block, and nested-loop compare on the
    /// join key. The output sink flushes full frames as it goes and
    /// finalizes one partial trailing frame at the end of the whole join.
    #[allow(clippy::too_many_arguments)]
    fn probe(
        &self,
        smaller_buckets: BucketLists,
        larger_buckets: BucketLists,
        smaller_column: usize,
        larger_column: usize,
        swapped: bool,
        left: &Relation,
        right: &Relation,
    ) -> Result<Relation> {
        let schema = left.schema().concat(right.schema());
        let mut writer = RelationWriter::new(self.store, schema);

        for (small_ids, large_ids) in smaller_buckets.into_iter().zip(larger_buckets) {
            // A bucket empty on either side cannot produce matches.
            if small_ids.is_empty() || large_ids.is_empty() {
                continue;
            }

            // Feasibility guarantees the whole build-side bucket fits.
            let mut small_blocks: Vec<Block> = Vec::with_capacity(small_ids.len());
            for id in small_ids {
                small_blocks.push(self.store.load(id)?);
            }

            for id in large_ids {
                let large_block = self.store.load(id)?;
                for large_tuple in large_block.tuples() {
                    for small_block in &small_blocks {
                        for small_tuple in small_block.tuples() {
                            if small_tuple.value(smaller_column)
                                == large_tuple.value(larger_column)
                            {
                                writer.push(self.output_tuple(
                                    small_tuple,
                                    large_tuple,
                                    swapped,
                                ))?;
                            }
                        }
                    }
                }
                self.store.release(large_block, false);
            }

            for block in small_blocks {
                self.store.release(block, false);
            }
        }

        writer.finish()
    }

    /// Concatenate a matching pair in left-then-right field order.
    fn output_tuple(&self, small: &Tuple, large: &Tuple, swapped: bool) -> Tuple {
        if swapped {
            // The build side is the right relation.
            large.concat(small)
        } else {
            small.concat(large)
        }
    }
}
