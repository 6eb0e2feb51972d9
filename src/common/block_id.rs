//! Block identifier type.

use std::fmt;

/// Identifies a block on disk.
///
/// A `BlockId` is the immutable *reference* half of the block model: it names
/// disk-resident contents and costs no memory frame. Materializing the
/// contents into a frame goes through [`BlockManager::load`].
///
/// # Example
/// ```
/// use blockops::BlockId;
///
/// let id = BlockId::new(42);
/// assert_eq!(id.0, 42);
/// ```
///
/// [`BlockManager::load`]: crate::storage::BlockManager::load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u64) -> Self {
        BlockId(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}
