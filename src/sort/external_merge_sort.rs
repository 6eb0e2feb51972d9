//! Two-phase multiway merge sort.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::common::{BlockId, Error, Result};
use crate::storage::{
    block_sorter, Block, BlockManager, Relation, RelationWriter, Schema, Tuple, Value,
};

/// Direction of the sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Non-decreasing by the sort key.
    #[default]
    Ascending,
    /// Non-increasing by the sort key.
    Descending,
}

/// External two-phase multiway merge sort over a frame-budgeted store.
///
/// With a budget of `f` frames, phase 1 fills all `f` frames per run and
/// phase 2 merges one resident block per run plus one output frame, so a
/// relation is sortable iff it has at most `f * (f - 1)` blocks. The
/// feasibility check runs before any I/O; past it, the sort runs to
/// completion.
///
/// Phase 1 persists each run into the input relation's own block slots, so
/// the input's disk contents are reordered by a successful sort (the
/// returned relation references fresh output blocks).
///
/// # Example
/// ```no_run
/// use blockops::{BlockManager, ExternalMergeSort, Relation, Schema};
///
/// let store = BlockManager::new(4, 64);
/// let relation = Relation::empty(Schema::new(vec!["id"]));
/// let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();
/// ```
pub struct ExternalMergeSort<'a> {
    store: &'a BlockManager,
    sort_column: usize,
    order: SortOrder,
}

impl<'a> ExternalMergeSort<'a> {
    /// Create an ascending sort on `sort_column`.
    pub fn new(store: &'a BlockManager, sort_column: usize) -> Self {
        Self::with_order(store, sort_column, SortOrder::Ascending)
    }

    /// Create a sort on `sort_column` with an explicit direction.
    pub fn with_order(store: &'a BlockManager, sort_column: usize, order: SortOrder) -> Self {
        Self {
            store,
            sort_column,
            order,
        }
    }

    /// Estimated I/O cost of sorting `relation`, in block transfers.
    ///
    /// Two passes reading and writing every block: `4 * block_count`. A
    /// stated approximation for the planner, not a measured quantity.
    pub fn estimated_io_cost(&self, relation: &Relation) -> usize {
        relation.block_count() * 4
    }

    /// Sort `relation` by the configured column, fully materializing the
    /// result.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] if the relation has more than
    /// `free_frames * (free_frames - 1)` blocks; raised before any I/O.
    pub fn sort(&self, relation: &Relation) -> Result<Relation> {
        let free = self.store.free_frames();
        let capacity = free * free.saturating_sub(1);
        if relation.block_count() > capacity {
            return Err(Error::CapacityExceeded {
                required: relation.block_count(),
                capacity,
            });
        }

        let runs = self.create_runs(relation)?;
        self.merge_runs(relation.schema().clone(), runs)
    }

    fn compare(&self, a: &Tuple, b: &Tuple) -> Ordering {
        let ordering = a.value(self.sort_column).cmp(b.value(self.sort_column));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    // ========================================================================
    // Phase 1: run creation
    // ========================================================================

    /// Stream the input block-by-block, filling every free frame; when the
    /// budget is exhausted (or the input ends), sort the resident frames
    /// globally and write them back as one contiguous run.
    fn create_runs(&self, relation: &Relation) -> Result<Vec<VecDeque<BlockId>>> {
        let mut resident: Vec<Block> = Vec::new();
        let mut runs: Vec<VecDeque<BlockId>> = Vec::new();

        let ids = relation.block_ids();
        for (i, &id) in ids.iter().enumerate() {
            resident.push(self.store.load(id)?);

            let input_done = i + 1 == ids.len();
            if self.store.free_frames() == 0 || input_done {
                block_sorter::sort_blocks(&mut resident, |a, b| self.compare(a, b));
                let run = resident
                    .drain(..)
                    .map(|block| self.store.release(block, true))
                    .collect();
                runs.push(run);
            }
        }

        Ok(runs)
    }

    // ========================================================================
    // Phase 2: k-way merge
    // ========================================================================

    /// Merge the runs with a min-priority queue of head tuples, holding one
    /// resident block per still-active run plus one output frame.
    fn merge_runs(&self, schema: Schema, runs: Vec<VecDeque<BlockId>>) -> Result<Relation> {
        let mut heap = MergeHeap::new(self.order);
        let mut seq = 0u64;

        let mut states: Vec<RunState> = runs
            .into_iter()
            .map(|pending| RunState {
                pending,
                resident: None,
                remaining: 0,
            })
            .collect();

        for (run, state) in states.iter_mut().enumerate() {
            self.advance_run(state, run, &mut heap, &mut seq)?;
        }

        let mut writer = RelationWriter::new(self.store, schema);
        while let Some(entry) = heap.pop() {
            writer.push(entry.tuple)?;

            let state = &mut states[entry.run];
            // The store has no element removal, so block consumption is
            // tracked with this counter rather than in the frame itself.
            state.remaining -= 1;
            if state.remaining == 0 {
                if let Some(block) = state.resident.take() {
                    self.store.release(block, false);
                }
                self.advance_run(state, entry.run, &mut heap, &mut seq)?;
            }
        }

        writer.finish()
    }

    /// Load the run's next block (if any) and enqueue all of its tuples.
    fn advance_run(
        &self,
        state: &mut RunState,
        run: usize,
        heap: &mut MergeHeap,
        seq: &mut u64,
    ) -> Result<()> {
        let Some(id) = state.pending.pop_front() else {
            return Ok(());
        };

        let block = self.store.load(id)?;
        if block.is_empty() {
            // Phase 1 never persists empty blocks; tolerate one anyway.
            self.store.release(block, false);
            return Ok(());
        }

        state.remaining = block.len();
        for tuple in block.tuples() {
            heap.push(HeapEntry {
                key: tuple.value(self.sort_column).clone(),
                seq: *seq,
                run,
                tuple: tuple.clone(),
            });
            *seq += 1;
        }
        state.resident = Some(block);
        Ok(())
    }
}

/// Per-run merge state: the unread block references, the one resident block,
/// and how many of its tuples are still in the queue.
struct RunState {
    pending: VecDeque<BlockId>,
    resident: Option<Block>,
    remaining: usize,
}

/// A head tuple in the merge queue, tagged with its source run and an
/// enqueue sequence number as the consistent tie-break among equal keys.
struct HeapEntry {
    key: Value,
    seq: u64,
    run: usize,
    tuple: Tuple,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Priority queue popping heads in the configured sort order.
enum MergeHeap {
    Ascending(BinaryHeap<Reverse<HeapEntry>>),
    Descending(BinaryHeap<HeapEntry>),
}

impl MergeHeap {
    fn new(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => MergeHeap::Ascending(BinaryHeap::new()),
            SortOrder::Descending => MergeHeap::Descending(BinaryHeap::new()),
        }
    }

    fn push(&mut self, entry: HeapEntry) {
        match self {
            MergeHeap::Ascending(heap) => heap.push(Reverse(entry)),
            MergeHeap::Descending(heap) => heap.push(entry),
        }
    }

    fn pop(&mut self) -> Option<HeapEntry> {
        match self {
            MergeHeap::Ascending(heap) => heap.pop().map(|Reverse(entry)| entry),
            MergeHeap::Descending(heap) => heap.pop(),
        }
    }
}
