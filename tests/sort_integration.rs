//! Integration tests for the external merge sort.
//!
//! These tests verify cross-component behavior that unit tests don't cover:
//! frame accounting across both phases, and sortedness/permutation over
//! arbitrary inputs.

use blockops::{
    BlockManager, Error, ExternalMergeSort, Relation, RelationWriter, Schema, SortOrder, Tuple,
    Value,
};
use proptest::prelude::*;

fn make_relation(store: &BlockManager, values: &[i64]) -> Relation {
    let mut writer = RelationWriter::new(store, Schema::new(vec!["n"]));
    for &v in values {
        writer.push(Tuple::new(vec![Value::Int(v)])).unwrap();
    }
    writer.finish().unwrap()
}

fn scan_ints(store: &BlockManager, relation: &Relation) -> Vec<i64> {
    relation
        .scan(store)
        .unwrap()
        .into_iter()
        .map(|t| match t.value(0) {
            Value::Int(i) => *i,
            other => panic!("unexpected value {other}"),
        })
        .collect()
}

/// A multi-run sort returns the frame budget fully to the store.
#[test]
fn test_sort_restores_all_frames() {
    let store = BlockManager::new(4, 2);
    let values: Vec<i64> = (0..20).rev().collect();
    let relation = make_relation(&store, &values);
    assert_eq!(relation.block_count(), 10);
    assert_eq!(store.free_frames(), 4);

    let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();

    assert_eq!(scan_ints(&store, &sorted), (0..20).collect::<Vec<_>>());
    assert_eq!(sorted.tuple_count(), 20);
    assert_eq!(store.free_frames(), 4);
}

/// The feasibility check fires before any block is read or written.
#[test]
fn test_infeasible_sort_touches_no_blocks() {
    let store = BlockManager::new(3, 1);
    // 3 frames admit 3 * 2 = 6 blocks; 7 single-tuple blocks are too many.
    let relation = make_relation(&store, &[1, 2, 3, 4, 5, 6, 7]);

    store.stats().reset();
    let err = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap_err();

    assert!(matches!(
        err,
        Error::CapacityExceeded {
            required: 7,
            capacity: 6
        }
    ));
    assert_eq!(store.stats().snapshot().io_ops(), 0);
    assert_eq!(store.free_frames(), 3);

    // The input is untouched and still sortable with a bigger budget.
    let store2 = BlockManager::new(4, 1);
    let relation2 = make_relation(&store2, &scan_ints(&store, &relation));
    let sorted = ExternalMergeSort::new(&store2, 0).sort(&relation2).unwrap();
    assert_eq!(scan_ints(&store2, &sorted), vec![1, 2, 3, 4, 5, 6, 7]);
}

/// Sorting a relation that fits in a single run still merges correctly.
#[test]
fn test_single_run_sort() {
    let store = BlockManager::new(8, 4);
    let relation = make_relation(&store, &[5, 3, 8, 1]);
    let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();
    assert_eq!(scan_ints(&store, &sorted), vec![1, 3, 5, 8]);
    assert_eq!(store.free_frames(), 8);
}

/// Text keys sort lexicographically.
#[test]
fn test_sort_text_column() {
    let store = BlockManager::new(4, 2);
    let schema = Schema::new(vec!["name"]);
    let mut writer = RelationWriter::new(&store, schema);
    for name in ["pear", "apple", "quince", "banana", "fig"] {
        writer.push(Tuple::new(vec![Value::from(name)])).unwrap();
    }
    let relation = writer.finish().unwrap();

    let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();
    let names: Vec<String> = sorted
        .scan(&store)
        .unwrap()
        .into_iter()
        .map(|t| t.value(0).to_string())
        .collect();
    assert_eq!(names, vec!["apple", "banana", "fig", "pear", "quince"]);
}

proptest! {
    /// Any feasible input sorts to a non-decreasing permutation of itself.
    #[test]
    fn prop_sort_is_a_sorted_permutation(values in prop::collection::vec(-1000i64..1000, 0..64)) {
        // 7 frames, 2 tuples per block: up to 42 blocks, well past 32.
        let store = BlockManager::new(7, 2);
        let relation = make_relation(&store, &values);

        let sorted = ExternalMergeSort::new(&store, 0).sort(&relation).unwrap();
        let output = scan_ints(&store, &sorted);

        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(output, expected);
        prop_assert_eq!(store.free_frames(), 7);
    }

    /// Descending order is the exact reverse of ascending order.
    #[test]
    fn prop_descending_mirrors_ascending(values in prop::collection::vec(-100i64..100, 1..40)) {
        let store = BlockManager::new(7, 2);
        let relation = make_relation(&store, &values);
        let sorted = ExternalMergeSort::with_order(&store, 0, SortOrder::Descending)
            .sort(&relation)
            .unwrap();

        let mut expected = values.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(scan_ints(&store, &sorted), expected);
    }
}
