//! B+Tree index with upsert-by-key insertion.

use std::fmt;

use crate::index::node::{InnerNode, LeafNode, Node, NodeId};
use crate::storage::TupleRef;

/// A B+Tree mapping keys to tuple references.
///
/// `order` is the maximum number of keys a node may hold before it must
/// split. Keys within a node are sorted and unique, leaves form a singly
/// linked sorted chain, and only the root may fall below minimum occupancy
/// (deletion is unsupported, so no merging ever happens).
///
/// The tree starts as a sentinel root leaf. The sentinel cannot be reused as
/// an ordinary leaf: on its first split its contents are copied into a fresh
/// node. Every other node keeps its identity across splits — the split
/// survivor stays where the parent already points, and only the new right
/// sibling has to be inserted upward.
///
/// Split rules:
/// - A leaf splits at `ceil(order / 2)`, moved one slot left when the new
///   key precedes the key at that position in the *pre-insertion* order;
///   the new key is inserted into its side only after splitting. The new
///   right leaf's smallest key is promoted as the separator and stays in
///   the leaf.
/// - An inner node absorbs the pending pair first (going one key over
///   capacity), splits, and promotes the left half's largest key, removing
///   it from the left node. The leaf/inner asymmetry is deliberate; do not
///   "fix" it to be symmetric.
///
/// # Example
/// ```
/// use blockops::{BlockId, BPlusTree, TupleRef};
///
/// let mut tree = BPlusTree::new(4);
/// let value = TupleRef::new(BlockId::new(0), 0);
/// assert_eq!(tree.insert(42, value), None);
/// assert_eq!(tree.get(42), Some(value));
/// ```
pub struct BPlusTree {
    order: usize,
    nodes: Vec<Node>,
    root: Root,
    len: usize,
    stats: IndexStats,
}

/// The root of the tree: the initial sentinel leaf, or a grown inner node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    /// The distinguished empty-tree leaf; converted on its first split.
    Initial(NodeId),
    /// An ordinary inner root created by a split.
    Inner(NodeId),
}

impl Root {
    fn id(self) -> NodeId {
        match self {
            Root::Initial(id) | Root::Inner(id) => id,
        }
    }
}

/// Counters describing the tree's split activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Leaf and inner node splits performed.
    pub splits: u64,
    /// Splits that created a new root (tree height growth).
    pub root_growths: u64,
}

impl BPlusTree {
    /// Create an empty tree whose nodes hold at most `order` keys.
    ///
    /// # Panics
    /// Panics if `order < 3`: an inner split promotes a key out of the left
    /// half, so both halves need a separator left over.
    pub fn new(order: usize) -> Self {
        assert!(order >= 3, "order must be >= 3");
        let mut tree = Self {
            order,
            nodes: Vec::new(),
            root: Root::Initial(NodeId(0)),
            len: 0,
            stats: IndexStats::default(),
        };
        let sentinel = tree.alloc(Node::Leaf(LeafNode::new(order)));
        tree.root = Root::Initial(sentinel);
        tree
    }

    /// Maximum keys per node.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of entries in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root and the leaf level.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root.id();
        while let Node::Inner(inner) = &self.nodes[current.0] {
            current = inner.children[0];
            height += 1;
        }
        height
    }

    /// Split activity counters.
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up the value reference stored under `key`.
    pub fn get(&self, key: i64) -> Option<TupleRef> {
        let leaf = self.nodes[self.find_leaf(key, None).0].as_leaf();
        leaf.keys
            .iter()
            .position(|k| *k == key)
            .map(|pos| leaf.values[pos])
    }

    /// Iterate all entries in ascending key order along the leaf chain.
    pub fn iter(&self) -> Iter<'_> {
        let mut current = self.root.id();
        while let Node::Inner(inner) = &self.nodes[current.0] {
            current = inner.children[0];
        }
        Iter {
            tree: self,
            leaf: Some(current),
            pos: 0,
        }
    }

    /// Descend to the leaf covering `key`, optionally recording the inner
    /// nodes visited (needed only if a split must propagate upward).
    fn find_leaf(&self, key: i64, mut path: Option<&mut Vec<NodeId>>) -> NodeId {
        let mut current = self.root.id();
        while let Node::Inner(inner) = &self.nodes[current.0] {
            if let Some(path) = path.as_deref_mut() {
                path.push(current);
            }
            current = inner.select_child(key);
        }
        current
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Upsert `value` under `key`.
    ///
    /// If the key already exists its value reference is overwritten and the
    /// prior one returned; otherwise a new entry is inserted and `None` is
    /// returned.
    pub fn insert(&mut self, key: i64, value: TupleRef) -> Option<TupleRef> {
        let mut path: Vec<NodeId> = Vec::new();
        let leaf_id = self.find_leaf(key, Some(&mut path));

        // Existing key: overwrite, return the old value.
        let leaf = self.nodes[leaf_id.0].as_leaf_mut();
        if let Some(pos) = leaf.keys.iter().position(|k| *k == key) {
            let old = leaf.values[pos];
            leaf.values[pos] = value;
            return Some(old);
        }

        self.len += 1;
        if leaf.keys.len() < self.order {
            leaf.insert_entry(key, value);
            return None;
        }

        self.split_leaf(leaf_id, key, value, path);
        None
    }

    /// Split a full leaf, insert the new entry into the proper half, and
    /// propagate the separator upward.
    fn split_leaf(&mut self, leaf_id: NodeId, key: i64, value: TupleRef, path: Vec<NodeId>) {
        self.stats.splits += 1;

        // The sentinel initial root cannot be reused as the left leaf: copy
        // its contents into a fresh node first. An ordinary leaf survives as
        // the left half, so the parent's pointer to it stays valid.
        let is_initial_root = self.root == Root::Initial(leaf_id);
        let left_id = if is_initial_root {
            let sentinel = self.nodes[leaf_id.0].as_leaf();
            let copy = LeafNode {
                keys: sentinel.keys.clone(),
                values: sentinel.values.clone(),
                next: sentinel.next,
            };
            self.alloc(Node::Leaf(copy))
        } else {
            leaf_id
        };

        // Split point over the pre-insertion key order: one slot left of
        // naive when the new key belongs in the left half.
        let mut split_pos = self.order.div_ceil(2);
        let insert_left = self.nodes[left_id.0].as_leaf().keys[split_pos - 1] > key;
        if insert_left {
            split_pos -= 1;
        }

        let left = self.nodes[left_id.0].as_leaf_mut();
        let right = LeafNode {
            keys: left.keys.split_off(split_pos),
            values: left.values.split_off(split_pos),
            next: left.next,
        };
        let right_id = self.alloc(Node::Leaf(right));
        self.nodes[left_id.0].as_leaf_mut().next = Some(right_id);

        let target = if insert_left { left_id } else { right_id };
        self.nodes[target.0].as_leaf_mut().insert_entry(key, value);

        let separator = self.nodes[right_id.0].as_leaf().smallest_key();
        if is_initial_root {
            self.grow_root(separator, left_id, right_id);
            return;
        }
        self.propagate(separator, right_id, path);
    }

    /// Walk the recorded path from the innermost parent toward the root,
    /// inserting the pending (separator, right child) pair, splitting full
    /// inner nodes along the way.
    fn propagate(&mut self, mut pending_key: i64, mut pending_child: NodeId, mut path: Vec<NodeId>) {
        while let Some(node_id) = path.pop() {
            if self.nodes[node_id.0].as_inner_mut().keys.len() < self.order {
                self.nodes[node_id.0]
                    .as_inner_mut()
                    .insert_pending(pending_key, pending_child);
                return;
            }

            self.stats.splits += 1;

            // A full inner node absorbs the pending pair first, going one
            // key over capacity; splitting below the extra key keeps each
            // child next to its separator no matter where the pair landed.
            let split_pos = self.order.div_ceil(2);
            let left = self.nodes[node_id.0].as_inner_mut();
            left.insert_pending(pending_key, pending_child);

            let right = InnerNode {
                keys: left.keys.split_off(split_pos),
                children: left.children.split_off(split_pos),
            };
            // Unlike leaves, inner splits promote the left half's largest
            // key and remove it; that removal is what restores the
            // one-more-child-than-keys shape on the left.
            let promoted = left.keys.pop().expect("left inner half is never empty");
            let right_id = self.alloc(Node::Inner(right));

            if self.root.id() == node_id {
                self.grow_root(promoted, node_id, right_id);
                return;
            }
            pending_key = promoted;
            pending_child = right_id;
        }
    }

    /// Create a new inner root with one separator and two children.
    fn grow_root(&mut self, separator: i64, left: NodeId, right: NodeId) {
        let mut root = InnerNode::new(self.order);
        root.keys.push(separator);
        root.children.push(left);
        root.children.push(right);
        let root_id = self.alloc(Node::Inner(root));
        self.root = Root::Inner(root_id);
        self.stats.root_growths += 1;
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // ========================================================================
    // Invariant checks (test support)
    // ========================================================================

    /// Walk the whole tree asserting the structural invariants: sorted
    /// unique keys, occupancy at most `order`, child counts, separator key
    /// ranges, and a complete sorted leaf chain.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.assert_subtree(self.root.id(), i64::MIN, None);

        // The leaf chain yields every entry in ascending order.
        let keys: Vec<i64> = self.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), self.len);
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "leaf chain unsorted");
    }

    #[cfg(test)]
    fn assert_subtree(&self, id: NodeId, lower: i64, upper: Option<i64>) {
        let in_range = |k: i64| k >= lower && upper.map_or(true, |u| k < u);
        match &self.nodes[id.0] {
            Node::Leaf(leaf) => {
                assert!(leaf.keys.len() <= self.order, "leaf over capacity");
                assert_eq!(leaf.keys.len(), leaf.values.len());
                assert!(leaf.keys.windows(2).all(|w| w[0] < w[1]));
                assert!(leaf.keys.iter().all(|&k| in_range(k)));
            }
            Node::Inner(inner) => {
                assert!(inner.keys.len() <= self.order, "inner over capacity");
                assert!(!inner.keys.is_empty(), "inner node without separators");
                assert_eq!(inner.children.len(), inner.keys.len() + 1);
                assert!(inner.keys.windows(2).all(|w| w[0] < w[1]));
                assert!(inner.keys.iter().all(|&k| in_range(k)));

                let mut child_lower = lower;
                for (i, &child) in inner.children.iter().enumerate() {
                    let child_upper = inner.keys.get(i).copied().or(upper);
                    self.assert_subtree(child, child_lower, child_upper);
                    if let Some(k) = inner.keys.get(i) {
                        child_lower = *k;
                    }
                }
            }
        }
    }
}

impl fmt::Debug for BPlusTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPlusTree")
            .field("order", &self.order)
            .field("len", &self.len)
            .field("height", &self.height())
            .finish()
    }
}

/// Ascending iterator over the tree's entries, following the leaf chain.
pub struct Iter<'a> {
    tree: &'a BPlusTree,
    leaf: Option<NodeId>,
    pos: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i64, TupleRef);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.tree.nodes[self.leaf?.0].as_leaf();
            if self.pos < leaf.keys.len() {
                let item = (leaf.keys[self.pos], leaf.values[self.pos]);
                self.pos += 1;
                return Some(item);
            }
            self.leaf = leaf.next;
            self.pos = 0;
        }
    }
}
