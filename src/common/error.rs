//! Error types for blockops.

use thiserror::Error;

use crate::common::BlockId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in blockops.
///
/// The operators check feasibility against the frame budget up front, so
/// [`Error::CapacityExceeded`] is always raised before any block I/O has
/// happened. [`Error::NoFreeFrames`] is a precondition violation: the
/// operators are structured never to call into the store at zero budget.
#[derive(Debug, Error)]
pub enum Error {
    /// The relation(s) cannot be processed within the available frame budget.
    ///
    /// Retrying with the same budget is deterministic and will fail
    /// identically; the caller must free frames or pick another algorithm.
    #[error("relation of {required} blocks exceeds a capacity of {capacity} blocks")]
    CapacityExceeded {
        /// Blocks the operator would have to process.
        required: usize,
        /// Most blocks the current budget admits.
        capacity: usize,
    },

    /// The block store has no free frames left.
    #[error("no free frames available in the block store")]
    NoFreeFrames,

    /// The referenced block has no contents on disk.
    #[error("{0} not found on disk")]
    BlockNotFound(BlockId),

    /// The operation is not implemented and never degrades.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
