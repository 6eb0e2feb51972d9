//! Integration tests for the B+Tree index.
//!
//! These tests verify end-to-end behavior over longer insert sequences:
//! ordered iteration through the leaf chain, upsert semantics, and agreement
//! with a map oracle over arbitrary key sequences.

use std::collections::BTreeMap;

use blockops::{BlockId, BPlusTree, TupleRef};
use proptest::prelude::*;

fn value(slot: usize) -> TupleRef {
    TupleRef::new(BlockId::new(0), slot)
}

/// Indexing an entire relation's worth of keys keeps the leaf chain sorted
/// and every key reachable.
#[test]
fn test_bulk_insert_and_lookup() {
    let mut tree = BPlusTree::new(4);
    // A shuffled-looking but deterministic key sequence.
    let keys: Vec<i64> = (0..500).map(|i| (i * 379) % 1000).collect();

    for (slot, &key) in keys.iter().enumerate() {
        assert_eq!(tree.insert(key, value(slot)), None);
    }

    assert_eq!(tree.len(), 500);
    for &key in &keys {
        assert!(tree.get(key).is_some());
    }
    assert_eq!(tree.get(-1), None);
    assert_eq!(tree.get(1000), None);

    let chain: Vec<i64> = tree.iter().map(|(k, _)| k).collect();
    let mut expected = keys.clone();
    expected.sort_unstable();
    assert_eq!(chain, expected);
}

/// Re-inserting every key overwrites in place: no growth, no splits, and
/// each call returns the value it replaced.
#[test]
fn test_reinsert_is_pure_overwrite() {
    let mut tree = BPlusTree::new(3);
    for key in 0..100 {
        tree.insert(key, value(key as usize));
    }
    let splits_before = tree.stats().splits;

    for key in 0..100 {
        let old = tree.insert(key, value(1000 + key as usize));
        assert_eq!(old, Some(value(key as usize)));
    }

    assert_eq!(tree.len(), 100);
    assert_eq!(tree.stats().splits, splits_before);
    assert_eq!(tree.get(42), Some(value(1042)));
}

/// Height grows logarithmically: order-4 trees hold far more than their
/// height suggests.
#[test]
fn test_height_growth() {
    let mut tree = BPlusTree::new(4);
    assert_eq!(tree.height(), 1);
    for key in 0..1000 {
        tree.insert(key, value(0));
    }
    assert!(tree.height() >= 4);
    assert!(tree.height() <= 10);
    assert_eq!(tree.stats().root_growths as usize, tree.height() - 1);
}

proptest! {
    /// The tree agrees with a BTreeMap oracle under arbitrary insert
    /// sequences, duplicates included, for several node orders.
    #[test]
    fn prop_tree_matches_map_oracle(
        keys in prop::collection::vec(-500i64..500, 1..300),
        order in 3usize..9,
    ) {
        let mut tree = BPlusTree::new(order);
        let mut oracle: BTreeMap<i64, TupleRef> = BTreeMap::new();

        for (slot, &key) in keys.iter().enumerate() {
            let expected_old = oracle.insert(key, value(slot));
            prop_assert_eq!(tree.insert(key, value(slot)), expected_old);
        }

        prop_assert_eq!(tree.len(), oracle.len());
        let chain: Vec<(i64, TupleRef)> = tree.iter().collect();
        let expected: Vec<(i64, TupleRef)> =
            oracle.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(chain, expected);

        for (&key, &v) in &oracle {
            prop_assert_eq!(tree.get(key), Some(v));
        }
    }
}
