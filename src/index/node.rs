//! B+Tree nodes.
//!
//! Nodes live in the tree's arena and are addressed by [`NodeId`]; a node's
//! identity is stable for its lifetime, so splitting produces a new right
//! sibling without rewriting the parent's pointer to the survivor.

use std::fmt;

use crate::storage::TupleRef;

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// A node of the tree: a leaf holding key/value entries or an inner node
/// holding separator keys and child pointers.
#[derive(Debug)]
pub(crate) enum Node {
    Leaf(LeafNode),
    Inner(InnerNode),
}

impl Node {
    pub(crate) fn as_leaf(&self) -> &LeafNode {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Inner(_) => unreachable!("expected leaf node"),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Inner(_) => unreachable!("expected leaf node"),
        }
    }

    pub(crate) fn as_inner_mut(&mut self) -> &mut InnerNode {
        match self {
            Node::Inner(inner) => inner,
            Node::Leaf(_) => unreachable!("expected inner node"),
        }
    }
}

/// A leaf: sorted unique keys, parallel value references, and a forward
/// sibling link forming the sorted leaf chain.
///
/// `keys` never grows beyond the tree's order; the vectors are allocated at
/// that capacity once and occupancy is their length.
#[derive(Debug)]
pub(crate) struct LeafNode {
    pub(crate) keys: Vec<i64>,
    pub(crate) values: Vec<TupleRef>,
    pub(crate) next: Option<NodeId>,
}

impl LeafNode {
    pub(crate) fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order),
            values: Vec::with_capacity(order),
            next: None,
        }
    }

    /// Insert an entry at its sorted position (shift-insert).
    ///
    /// The caller has ruled out both a full leaf and a duplicate key.
    pub(crate) fn insert_entry(&mut self, key: i64, value: TupleRef) {
        let pos = self.keys.partition_point(|k| *k < key);
        self.keys.insert(pos, key);
        self.values.insert(pos, value);
    }

    /// The smallest key; promoted as the separator after a leaf split.
    pub(crate) fn smallest_key(&self) -> i64 {
        self.keys[0]
    }
}

/// An inner node: `k` sorted separator keys and `k + 1` child pointers.
/// Child `i` covers keys below `keys[i]`; the last child covers keys at or
/// above the last separator.
#[derive(Debug)]
pub(crate) struct InnerNode {
    pub(crate) keys: Vec<i64>,
    pub(crate) children: Vec<NodeId>,
}

impl InnerNode {
    pub(crate) fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
        }
    }

    /// The child whose key range contains `key`: the last child whose
    /// preceding separator is at most `key`.
    pub(crate) fn select_child(&self, key: i64) -> NodeId {
        self.children[self.keys.partition_point(|k| *k <= key)]
    }

    /// Insert a pending (separator, right child) pair at its sorted
    /// position; the child lands one slot right of the key.
    ///
    /// The caller has ruled out a full node.
    pub(crate) fn insert_pending(&mut self, key: i64, right_child: NodeId) {
        let pos = self.keys.partition_point(|k| *k < key);
        self.keys.insert(pos, key);
        self.children.insert(pos + 1, right_child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BlockId;

    fn value(slot: usize) -> TupleRef {
        TupleRef::new(BlockId::new(0), slot)
    }

    #[test]
    fn test_leaf_shift_insert_keeps_keys_sorted() {
        let mut leaf = LeafNode::new(4);
        for key in [20, 5, 10, 15] {
            leaf.insert_entry(key, value(key as usize));
        }
        assert_eq!(leaf.keys, vec![5, 10, 15, 20]);
        assert_eq!(leaf.smallest_key(), 5);
        assert_eq!(leaf.values[1], value(10));
    }

    #[test]
    fn test_inner_child_selection_partitions_key_space() {
        let mut inner = InnerNode::new(4);
        inner.keys = vec![10, 20];
        inner.children = vec![NodeId(0), NodeId(1), NodeId(2)];

        assert_eq!(inner.select_child(5), NodeId(0));
        assert_eq!(inner.select_child(10), NodeId(1));
        assert_eq!(inner.select_child(19), NodeId(1));
        assert_eq!(inner.select_child(20), NodeId(2));
        assert_eq!(inner.select_child(99), NodeId(2));
    }

    #[test]
    fn test_inner_pending_insert_places_child_right_of_key() {
        let mut inner = InnerNode::new(4);
        inner.keys = vec![10, 30];
        inner.children = vec![NodeId(0), NodeId(1), NodeId(2)];

        inner.insert_pending(20, NodeId(3));
        assert_eq!(inner.keys, vec![10, 20, 30]);
        assert_eq!(
            inner.children,
            vec![NodeId(0), NodeId(1), NodeId(3), NodeId(2)]
        );
    }
}
