//! blockops - Bounded-memory database operators over a frame-budgeted block store.
//!
//! # Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           blockops                               │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────┐ │
//! │  │  Sort (sort/)    │  │  Join (join/)    │  │ Index (index/) │ │
//! │  │  Two-phase       │  │  Partitioned     │  │ B+Tree insert  │ │
//! │  │  multiway merge  │  │  (grace) hash    │  │ with splits &  │ │
//! │  │  sort            │  │  equi-join       │  │ root growth    │ │
//! │  └──────────────────┘  └──────────────────┘  └────────────────┘ │
//! │            ↓                     ↓                               │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │              Block Store (storage/)                      │   │
//! │  │  BlockManager (frame budget + simulated disk + stats)    │   │
//! │  │  Block + Tuple + Value + Schema + Relation + writers     │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │            ↓                                                     │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │              Common (common/)                             │   │
//! │  │          BlockId + Error + configuration                  │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operator works against a [`BlockManager`] with a fixed frame
//! budget: blocks must be loaded into a frame before their tuples are
//! visible, the budget caps how many frames are resident at once, and each
//! operator checks up front that its input fits the budget before touching
//! the store.
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`storage`] - Frame-budgeted block store and relation plumbing
//! - [`sort`] - External two-phase multiway merge sort
//! - [`join`] - Partitioned hash equi-join
//! - [`index`] - B+Tree index
//!
//! # Quick Start
//! ```
//! use blockops::{BlockManager, ExternalMergeSort, Relation, RelationWriter};
//! use blockops::{Schema, Tuple, Value};
//!
//! // A store with 4 frames of memory, 2 tuples per block.
//! let store = BlockManager::new(4, 2);
//!
//! let mut writer = RelationWriter::new(&store, Schema::new(vec!["id"]));
//! for key in [3i64, 1, 4, 1, 5] {
//!     writer.push(Tuple::new(vec![Value::Int(key)])).unwrap();
//! }
//! let relation = writer.finish().unwrap();
//!
//! let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();
//! let keys: Vec<Value> = sorted
//!     .scan(&store)
//!     .unwrap()
//!     .into_iter()
//!     .map(|t| t.value(0).clone())
//!     .collect();
//! assert_eq!(keys, vec![1.into(), 1.into(), 3.into(), 4.into(), 5.into()]);
//! ```

pub mod common;
pub mod index;
pub mod join;
pub mod sort;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_BLOCK_CAPACITY, DEFAULT_FRAME_BUDGET};
pub use common::{BlockId, Error, Result};

pub use index::{BPlusTree, IndexStats};
pub use join::{JoinColumns, PartitionHashJoin};
pub use sort::{ExternalMergeSort, SortOrder};
pub use storage::{
    Block, BlockManager, Relation, RelationWriter, Schema, StoreStats, StoreStatsSnapshot, Tuple,
    TupleRef, Value,
};
