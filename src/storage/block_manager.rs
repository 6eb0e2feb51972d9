//! Block manager - the frame-budgeted block store.
//!
//! The [`BlockManager`] provides:
//! - A hard budget of memory frames, one per resident block
//! - `allocate` / `load` / `release` block movement
//! - Operational statistics

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::common::{BlockId, Error, Result};
use crate::storage::{Block, Tuple};

/// The frame-budget-aware block store the operators run against.
///
/// Every resident [`Block`] occupies exactly one frame. `allocate` and `load`
/// each consume one unit of budget and fail with [`Error::NoFreeFrames`] at
/// zero; `release` returns the unit and optionally persists the block's
/// contents under its [`BlockId`]. The operators prove feasibility against
/// [`BlockManager::free_frames`] before starting and are structured so that
/// `NoFreeFrames` can never fire on their paths.
///
/// The "disk" is an in-memory map from block references to tuple vectors:
/// the operators' contract is the frame accounting and the load/release
/// discipline, not a persistence format.
///
/// # Invariant
/// `0 <= free_frames <= budget` at all times. Loading copies contents into
/// the frame; the disk copy stays valid until overwritten by a persisting
/// release of the same reference.
#[derive(Debug)]
pub struct BlockManager {
    /// Disk map, free-frame count, and the reference counter.
    inner: Mutex<StoreInner>,

    /// Operational statistics.
    stats: StoreStats,

    /// Tuples per block (immutable after construction).
    block_capacity: usize,

    /// Total frames (immutable after construction).
    budget: usize,
}

#[derive(Debug)]
struct StoreInner {
    disk: HashMap<BlockId, Vec<Tuple>>,
    free_frames: usize,
    next_id: u64,
}

impl BlockManager {
    /// Create a store with `budget` frames holding blocks of
    /// `block_capacity` tuples.
    ///
    /// # Panics
    /// Panics if `budget` or `block_capacity` is 0.
    pub fn new(budget: usize, block_capacity: usize) -> Self {
        assert!(budget > 0, "budget must be > 0");
        assert!(block_capacity > 0, "block_capacity must be > 0");

        Self {
            inner: Mutex::new(StoreInner {
                disk: HashMap::new(),
                free_frames: budget,
                next_id: 0,
            }),
            stats: StoreStats::new(),
            block_capacity,
            budget,
        }
    }

    /// Obtain a fresh resident block; consumes one unit of frame budget.
    ///
    /// # Errors
    /// [`Error::NoFreeFrames`] if the budget is exhausted.
    pub fn allocate(&self) -> Result<Block> {
        let mut inner = self.inner.lock();
        if inner.free_frames == 0 {
            return Err(Error::NoFreeFrames);
        }
        inner.free_frames -= 1;

        let id = BlockId::new(inner.next_id);
        inner.next_id += 1;
        drop(inner);

        self.stats.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(Block::new(id, Vec::new(), self.block_capacity))
    }

    /// Materialize a disk block into a frame; consumes one unit of budget.
    ///
    /// # Errors
    /// - [`Error::NoFreeFrames`] if the budget is exhausted
    /// - [`Error::BlockNotFound`] if `id` has no contents on disk
    pub fn load(&self, id: BlockId) -> Result<Block> {
        let mut inner = self.inner.lock();
        if inner.free_frames == 0 {
            return Err(Error::NoFreeFrames);
        }
        let tuples = inner
            .disk
            .get(&id)
            .cloned()
            .ok_or(Error::BlockNotFound(id))?;
        inner.free_frames -= 1;
        drop(inner);

        self.stats.loads.fetch_add(1, Ordering::Relaxed);
        Ok(Block::new(id, tuples, self.block_capacity))
    }

    /// Free a resident frame, optionally writing the block back to disk
    /// first. Returns the reference usable for a later [`BlockManager::load`].
    ///
    /// Releasing without persisting leaves any previous disk contents of the
    /// reference untouched.
    pub fn release(&self, mut block: Block, persist: bool) -> BlockId {
        let id = block.id();
        let tuples = block.take_tuples();

        let mut inner = self.inner.lock();
        if persist {
            inner.disk.insert(id, tuples);
        }
        inner.free_frames += 1;
        debug_assert!(inner.free_frames <= self.budget, "frame budget overflow");
        drop(inner);

        self.stats.releases.fetch_add(1, Ordering::Relaxed);
        if persist {
            self.stats.blocks_written.fetch_add(1, Ordering::Relaxed);
        }
        id
    }

    /// Current available frame budget.
    pub fn free_frames(&self) -> usize {
        self.inner.lock().free_frames
    }

    /// Total frames in the store.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Tuples per block.
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    /// Get store statistics.
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }
}

/// Statistics tracked by the block store.
///
/// All fields are atomic so operators can update them through a shared
/// reference; use [`StoreStats::snapshot`] for display and assertions.
#[derive(Debug)]
pub struct StoreStats {
    /// Fresh frames handed out.
    pub allocations: AtomicU64,

    /// Disk blocks materialized into frames.
    pub loads: AtomicU64,

    /// Frames returned to the budget.
    pub releases: AtomicU64,

    /// Releases that persisted contents to disk.
    pub blocks_written: AtomicU64,
}

impl StoreStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            loads: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            blocks_written: AtomicU64::new(0),
        }
    }

    /// Get a non-atomic snapshot of the current statistics.
    pub fn snapshot(&self) -> StoreStatsSnapshot {
        StoreStatsSnapshot {
            allocations: self.allocations.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            blocks_written: self.blocks_written.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.allocations.store(0, Ordering::Relaxed);
        self.loads.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
        self.blocks_written.store(0, Ordering::Relaxed);
    }
}

impl Default for StoreStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatsSnapshot {
    pub allocations: u64,
    pub loads: u64,
    pub releases: u64,
    pub blocks_written: u64,
}

impl StoreStatsSnapshot {
    /// Total I/O operations against disk (loads plus persisted releases).
    pub fn io_ops(&self) -> u64 {
        self.loads + self.blocks_written
    }
}

impl fmt::Display for StoreStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ allocations: {}, loads: {}, releases: {}, written: {} }}",
            self.allocations, self.loads, self.releases, self.blocks_written
        )
    }
}
