//! Storage layer - the frame-budgeted block store and the relation model.
//!
//! This module is the substrate the operators run against:
//! - [`BlockManager`] - frame-budget-aware block store
//! - [`Block`] - a resident, fixed-capacity tuple sequence
//! - [`Relation`] / [`RelationWriter`] - materialized relations and the
//!   buffered output sink
//! - [`Value`], [`Tuple`], [`Schema`] - the tuple model
//! - [`block_sorter`] - the in-place sort primitive used by run creation

mod block;
mod block_manager;
pub mod block_sorter;
mod relation;
mod schema;
mod tuple;
mod value;

pub use block::Block;
pub use block_manager::{BlockManager, StoreStats, StoreStatsSnapshot};
pub use relation::{Relation, RelationWriter};
pub use schema::Schema;
pub use tuple::{Tuple, TupleRef};
pub use value::Value;
