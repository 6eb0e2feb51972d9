//! Index structures.
//!
//! [`BPlusTree`] is a balanced multiway search tree supporting
//! upsert-by-key with leaf/inner splitting and root growth. Deletion and
//! underflow rebalancing are unsupported.

mod bplus_tree;
mod node;

pub use bplus_tree::{BPlusTree, IndexStats, Iter};
