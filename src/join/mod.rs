//! Joins.
//!
//! [`PartitionHashJoin`] implements the grace (partitioned) hash equi-join:
//! both relations are hash-partitioned into bucket block lists with the same
//! modulus, then each bucket index is probed with a nested loop.

mod hash_join;

pub use hash_join::{JoinColumns, PartitionHashJoin};
