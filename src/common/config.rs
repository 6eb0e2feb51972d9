//! Configuration constants for blockops.

/// Default number of tuples a block can hold.
///
/// Real systems size blocks in bytes; here the unit of I/O is a fixed
/// number of tuples, which keeps the capacity arithmetic of the operators
/// (runs per phase, buckets per budget) exact and easy to test.
pub const DEFAULT_BLOCK_CAPACITY: usize = 64;

/// Default frame budget of a [`BlockManager`].
///
/// Every resident block occupies exactly one frame; the operators prove
/// feasibility against this budget before touching disk.
///
/// [`BlockManager`]: crate::storage::BlockManager
pub const DEFAULT_FRAME_BUDGET: usize = 16;
