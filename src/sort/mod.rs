//! External sorting.
//!
//! [`ExternalMergeSort`] implements two-phase multiway merge sort (TPMMS):
//! sorted runs are created with every available frame, then merged with one
//! frame per run plus one output frame.

mod external_merge_sort;

pub use external_merge_sort::{ExternalMergeSort, SortOrder};
