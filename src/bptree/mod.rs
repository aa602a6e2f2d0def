//! B+tree over `i64` keys: the core structure of this collection.
//!
//! All data keys live in leaves; internal nodes hold routing separators only.
//! Leaves are singly linked in key order, so ordered scans walk the chain
//! instead of re-descending from the root per key. Nodes live in an
//! [`Arena`](arena::Arena) and refer to each other by index, which keeps the
//! parent/sibling "pointer graph" free of ownership cycles and makes teardown
//! a flat vector drop.

mod arena;
mod handle;
mod node;

use core::fmt;
use core::iter::FusedIterator;

use alloc::vec::Vec;
use smallvec::SmallVec;

use arena::Arena;
use handle::NodeId;
use node::{InternalNode, LeafNode, Node};

/// One step of a root-to-leaf descent: the internal node visited and the
/// child slot taken. Splits and underflow repair replay this stack bottom-up
/// in a loop; no parent pointers are stored and no recursion is involved.
struct PathElement {
    node: NodeId,
    child_index: usize,
}

type Path = SmallVec<[PathElement; 16]>;

/// An ordered set of `i64` keys backed by a B+tree of minimum degree `t`.
///
/// Every node except the root holds between `t - 1` and `2t - 1` keys; all
/// leaves sit at the same depth; separator `keys[i]` of an internal node
/// equals the minimum key of the subtree at `children[i + 1]`. These
/// invariants hold before and after every public operation.
///
/// Duplicate inserts and removes of absent keys are documented no-ops, not
/// errors: both return `false` and leave the tree untouched.
///
/// # Examples
///
/// ```
/// use arboretum::BPlusTree;
///
/// let mut tree = BPlusTree::new(3);
/// assert!(tree.insert(7));
/// assert!(!tree.insert(7)); // silently rejected
/// assert!(tree.contains(7));
/// assert!(tree.remove(7));
/// assert!(!tree.remove(7)); // silently ignored
/// ```
pub struct BPlusTree {
    /// Arena storing all tree nodes; the only owner of node memory.
    nodes: Arena<Node>,
    /// The root node. Always present: an empty tree is a single empty leaf.
    root: NodeId,
    /// Head of the leaf chain (the leftmost leaf).
    first_leaf: NodeId,
    /// Minimum degree `t`, fixed at construction.
    min_degree: usize,
    /// Number of keys currently stored.
    len: usize,
}

impl BPlusTree {
    /// Creates an empty tree with the given minimum degree.
    ///
    /// # Panics
    ///
    /// Panics if `min_degree < 2` - a degree-1 tree cannot satisfy the node
    /// fill invariant, so construction is rejected outright.
    #[must_use]
    pub fn new(min_degree: usize) -> Self {
        assert!(min_degree >= 2, "`BPlusTree::new()` - `min_degree` must be at least 2!");
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::Leaf(LeafNode::new()));
        Self { nodes, root, first_leaf: root, min_degree, len: 0 }
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The minimum degree `t` the tree was constructed with.
    #[must_use]
    pub const fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of internal levels above the leaves (0 for a leaf-only tree).
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Node::Internal(internal) = self.nodes.get(current) {
            height += 1;
            current = internal.child(0);
        }
        height
    }

    /// Removes every key, resetting to a single empty root leaf.
    pub fn clear(&mut self) {
        self.nodes.clear();
        let root = self.nodes.alloc(Node::Leaf(LeafNode::new()));
        self.root = root;
        self.first_leaf = root;
        self.len = 0;
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: i64) -> bool {
        self.nodes.get(self.locate_leaf(key)).as_leaf().search(key).is_ok()
    }

    /// Finds the leaf holding `key`, or `None` if the key is absent.
    ///
    /// The returned [`Leaf`] is a read-only view; its [`next`](Leaf::next)
    /// link can be followed to walk the rest of the chain in key order.
    #[must_use]
    pub fn search(&self, key: i64) -> Option<Leaf<'_>> {
        let id = self.locate_leaf(key);
        self.nodes.get(id).as_leaf().search(key).is_ok().then(|| Leaf { tree: self, id })
    }

    /// Inserts `key`, returning `false` (and changing nothing) if already
    /// present.
    ///
    /// Descends to the target leaf recording the path, inserts in sorted
    /// position, and splits any node that reaches `2t - 1` keys on the way
    /// back up. A root split allocates a new root and grows the height by
    /// one.
    pub fn insert(&mut self, key: i64) -> bool {
        let (leaf_id, mut path) = self.descend(key);

        let leaf = self.nodes.get_mut(leaf_id).as_leaf_mut();
        let Err(index) = leaf.search(key) else {
            return false;
        };
        leaf.insert_at(index, key);
        self.len += 1;

        if self.nodes.get(leaf_id).as_leaf().needs_split(self.min_degree) {
            self.split_leaf(leaf_id, &mut path);
        }
        true
    }

    /// Removes `key`, returning `false` (and changing nothing) if absent.
    ///
    /// Descends to the owning leaf, removes the key, and repairs any
    /// underflow by borrowing from a sibling (left first, then right) or
    /// merging, recursing up the recorded path. A root internal node left
    /// with a single child is collapsed away, shrinking the height by one.
    pub fn remove(&mut self, key: i64) -> bool {
        let (leaf_id, mut path) = self.descend(key);

        let leaf = self.nodes.get_mut(leaf_id).as_leaf_mut();
        let Ok(index) = leaf.search(key) else {
            return false;
        };
        leaf.remove_at(index);
        self.len -= 1;

        if !path.is_empty() {
            if self.nodes.get(leaf_id).is_underfull(self.min_degree) {
                self.rebalance_leaf(leaf_id, &mut path);
            }
            self.refresh_separator(key);
        }
        true
    }

    /// Iterates the keys in `[start, end]` in ascending order.
    ///
    /// Locates the leaf that would hold `start`, then walks the leaf chain,
    /// stopping past `end`. The tree is not mutated; calling `range` again
    /// restarts the scan. An empty interval yields nothing.
    #[must_use]
    pub fn range(&self, start: i64, end: i64) -> Range<'_> {
        let leaf = self.locate_leaf(start);
        let index = match self.nodes.get(leaf).as_leaf().search(start) {
            Ok(index) | Err(index) => index,
        };
        Range { tree: self, leaf: Some(leaf), index, end }
    }

    /// Iterates all keys in ascending order via the leaf chain.
    #[must_use]
    pub fn iter(&self) -> Keys<'_> {
        Keys { tree: self, leaf: Some(self.first_leaf), index: 0, remaining: self.len }
    }

    // ─── Descent ────────────────────────────────────────────────────────────

    /// Read-only root-to-leaf descent for `key`.
    fn locate_leaf(&self, key: i64) -> NodeId {
        let mut current = self.root;
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => current = internal.child(internal.child_for(key)),
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Descent for `key` that records the path for later fix-up.
    fn descend(&self, key: i64) -> (NodeId, Path) {
        let mut path = Path::new();
        let mut current = self.root;
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => {
                    let child_index = internal.child_for(key);
                    path.push(PathElement { node: current, child_index });
                    current = internal.child(child_index);
                }
                Node::Leaf(_) => return (current, path),
            }
        }
    }

    /// Minimum key of the subtree rooted at `current` (leftmost leaf's first
    /// key).
    fn subtree_min(&self, mut current: NodeId) -> i64 {
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => current = internal.child(0),
                Node::Leaf(leaf) => return leaf.first_key(),
            }
        }
    }

    // ─── Insert fix-up ──────────────────────────────────────────────────────

    fn split_leaf(&mut self, leaf_id: NodeId, path: &mut Path) {
        let (separator, right) = {
            let leaf = self.nodes.get_mut(leaf_id).as_leaf_mut();
            let (separator, mut right) = leaf.split();
            right.set_next(leaf.next());
            (separator, right)
        };
        let right_id = self.nodes.alloc(Node::Leaf(right));
        self.nodes.get_mut(leaf_id).as_leaf_mut().set_next(Some(right_id));

        self.propagate_split(path, separator, right_id);
    }

    /// Inserts `separator`/`new_child` into the parent, splitting overfull
    /// ancestors until the split stops or a new root is grown.
    fn propagate_split(&mut self, path: &mut Path, mut separator: i64, mut new_child: NodeId) {
        while let Some(element) = path.pop() {
            let parent = self.nodes.get_mut(element.node).as_internal_mut();
            parent.insert_child(element.child_index, separator, new_child);

            if !parent.needs_split(self.min_degree) {
                return;
            }
            let (median, right) = parent.split();
            separator = median;
            new_child = self.nodes.alloc(Node::Internal(right));
        }

        // Every ancestor split: the old root partners with the final right
        // half under a fresh root.
        let new_root = InternalNode::root(separator, self.root, new_child);
        self.root = self.nodes.alloc(Node::Internal(new_root));
    }

    // ─── Delete fix-up ──────────────────────────────────────────────────────

    fn rebalance_leaf(&mut self, leaf_id: NodeId, path: &mut Path) {
        let t = self.min_degree;
        let &PathElement { node: parent_id, child_index } = path.last().unwrap();
        let (left_id, right_id) = {
            let parent = self.nodes.get(parent_id).as_internal();
            (
                (child_index > 0).then(|| parent.child(child_index - 1)),
                (child_index + 1 < parent.child_count()).then(|| parent.child(child_index + 1)),
            )
        };

        if let Some(left_id) = left_id {
            if self.nodes.get(left_id).can_lend(t) {
                self.borrow_leaf_from_left(leaf_id, left_id, parent_id, child_index);
                return;
            }
        }
        if let Some(right_id) = right_id {
            if self.nodes.get(right_id).can_lend(t) {
                self.borrow_leaf_from_right(leaf_id, right_id, parent_id, child_index);
                return;
            }
        }
        if let Some(left_id) = left_id {
            self.merge_leaves(left_id, leaf_id, path, child_index - 1);
        } else {
            self.merge_leaves(leaf_id, right_id.unwrap(), path, child_index);
        }
    }

    /// Rotates the left sibling's maximum into the underfull leaf.
    fn borrow_leaf_from_left(
        &mut self,
        leaf_id: NodeId,
        left_id: NodeId,
        parent_id: NodeId,
        child_index: usize,
    ) {
        let key = self.nodes.get_mut(left_id).as_leaf_mut().pop_back();
        self.nodes.get_mut(leaf_id).as_leaf_mut().push_front(key);
        // The borrowed key is the leaf's new minimum.
        self.nodes.get_mut(parent_id).as_internal_mut().set_key(child_index - 1, key);
    }

    /// Rotates the right sibling's minimum into the underfull leaf.
    fn borrow_leaf_from_right(
        &mut self,
        leaf_id: NodeId,
        right_id: NodeId,
        parent_id: NodeId,
        child_index: usize,
    ) {
        let (key, right_min) = {
            let right = self.nodes.get_mut(right_id).as_leaf_mut();
            let key = right.pop_front();
            (key, right.first_key())
        };
        self.nodes.get_mut(leaf_id).as_leaf_mut().push_back(key);
        self.nodes.get_mut(parent_id).as_internal_mut().set_key(child_index, right_min);
    }

    /// Merges `right_id` into `left_id`, relinking the chain around the
    /// removed leaf, then drops the separating key from the parent.
    fn merge_leaves(&mut self, left_id: NodeId, right_id: NodeId, path: &mut Path, separator_index: usize) {
        let right = match self.nodes.take(right_id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        };
        self.nodes.get_mut(left_id).as_leaf_mut().merge_with_right(right);

        // The absorbed leaf is never the leftmost (merges prefer the left
        // sibling, and a leftmost leaf absorbs its right neighbour), so
        // `first_leaf` needs no adjustment.
        self.remove_separator_and_propagate(path, separator_index);
    }

    /// Removes a separator and its right child slot from the parent after a
    /// merge, then repairs the parent if it underflowed in turn.
    fn remove_separator_and_propagate(&mut self, path: &mut Path, separator_index: usize) {
        let parent_id = path.pop().unwrap().node;
        let parent = self.nodes.get_mut(parent_id).as_internal_mut();
        parent.remove_child(separator_index);

        if path.is_empty() {
            // The root may thin out to a single child; that child becomes the
            // new root and the height shrinks by one.
            if parent.key_count() == 0 {
                let sole_child = parent.child(0);
                self.nodes.free(parent_id);
                self.root = sole_child;
            }
            return;
        }

        if self.nodes.get(parent_id).is_underfull(self.min_degree) {
            self.rebalance_internal(parent_id, path);
        }
    }

    fn rebalance_internal(&mut self, node_id: NodeId, path: &mut Path) {
        let t = self.min_degree;
        let &PathElement { node: parent_id, child_index } = path.last().unwrap();
        let (left_id, right_id) = {
            let parent = self.nodes.get(parent_id).as_internal();
            (
                (child_index > 0).then(|| parent.child(child_index - 1)),
                (child_index + 1 < parent.child_count()).then(|| parent.child(child_index + 1)),
            )
        };

        if let Some(left_id) = left_id {
            if self.nodes.get(left_id).can_lend(t) {
                self.borrow_internal_from_left(node_id, left_id, parent_id, child_index);
                return;
            }
        }
        if let Some(right_id) = right_id {
            if self.nodes.get(right_id).can_lend(t) {
                self.borrow_internal_from_right(node_id, right_id, parent_id, child_index);
                return;
            }
        }
        if let Some(left_id) = left_id {
            self.merge_internals(left_id, node_id, path, child_index - 1);
        } else {
            self.merge_internals(node_id, right_id.unwrap(), path, child_index);
        }
    }

    /// Internal borrow: the parent separator rotates down in front of the
    /// underfull node's keys, the left sibling's last key rotates up.
    fn borrow_internal_from_left(
        &mut self,
        node_id: NodeId,
        left_id: NodeId,
        parent_id: NodeId,
        child_index: usize,
    ) {
        let separator = self.nodes.get(parent_id).as_internal().keys()[child_index - 1];
        let (left_key, left_child) = self.nodes.get_mut(left_id).as_internal_mut().pop_back();
        self.nodes.get_mut(node_id).as_internal_mut().push_front(separator, left_child);
        self.nodes.get_mut(parent_id).as_internal_mut().set_key(child_index - 1, left_key);
    }

    fn borrow_internal_from_right(
        &mut self,
        node_id: NodeId,
        right_id: NodeId,
        parent_id: NodeId,
        child_index: usize,
    ) {
        let separator = self.nodes.get(parent_id).as_internal().keys()[child_index];
        let (right_key, right_child) = self.nodes.get_mut(right_id).as_internal_mut().pop_front();
        self.nodes.get_mut(node_id).as_internal_mut().push_back(separator, right_child);
        self.nodes.get_mut(parent_id).as_internal_mut().set_key(child_index, right_key);
    }

    /// Merges two internal siblings around their parent separator; the
    /// separator rejoins the keys (internal splits moved it up exclusively,
    /// so the merge must bring it back down).
    fn merge_internals(&mut self, left_id: NodeId, right_id: NodeId, path: &mut Path, separator_index: usize) {
        let parent_id = path.last().unwrap().node;
        let separator = self.nodes.get(parent_id).as_internal().keys()[separator_index];

        let right = match self.nodes.take(right_id) {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        };
        self.nodes.get_mut(left_id).as_internal_mut().merge_with_right(separator, right);

        self.remove_separator_and_propagate(path, separator_index);
    }

    /// Restores separator exactness after a removal.
    ///
    /// At most one internal key can still hold the removed value (it was the
    /// minimum of some right subtree, and key values are unique). Routing
    /// for the removed value leads straight to it; rewrite it with the
    /// subtree's live minimum and stop.
    fn refresh_separator(&mut self, removed: i64) {
        let mut current = self.root;
        loop {
            let internal = match self.nodes.get(current) {
                Node::Internal(internal) => internal,
                Node::Leaf(_) => return,
            };
            if let Some(index) = internal.separator_position(removed) {
                let minimum = self.subtree_min(internal.child(index + 1));
                self.nodes.get_mut(current).as_internal_mut().set_key(index, minimum);
                return;
            }
            current = internal.child(internal.child_for(removed));
        }
    }
}

impl fmt::Debug for BPlusTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Level-order diagnostic rendering: one line per level, each node's key
/// list in order. The root line comes first, the leaf chain last.
///
/// ```
/// use arboretum::BPlusTree;
///
/// let mut tree = BPlusTree::new(3);
/// for key in 1..=5 {
///     tree.insert(key);
/// }
/// assert_eq!(tree.to_string(), "[3]\n[1, 2] [3, 4, 5]");
/// ```
impl fmt::Display for BPlusTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut level = alloc::vec![self.root];
        loop {
            let mut next_level = Vec::new();
            for (i, &id) in level.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                match self.nodes.get(id) {
                    Node::Internal(internal) => {
                        write!(f, "{:?}", internal.keys())?;
                        next_level.extend_from_slice(internal.children());
                    }
                    Node::Leaf(leaf) => write!(f, "{:?}", leaf.keys())?,
                }
            }
            if next_level.is_empty() {
                return Ok(());
            }
            f.write_str("\n")?;
            level = next_level;
        }
    }
}

/// Read-only view of one leaf, as returned by [`BPlusTree::search`].
#[derive(Clone, Copy)]
pub struct Leaf<'a> {
    tree: &'a BPlusTree,
    id: NodeId,
}

impl<'a> Leaf<'a> {
    /// The leaf's sorted keys.
    #[must_use]
    pub fn keys(&self) -> &'a [i64] {
        self.tree.nodes.get(self.id).as_leaf().keys()
    }

    /// The next leaf in the chain, if any.
    #[must_use]
    pub fn next(&self) -> Option<Leaf<'a>> {
        let next = self.tree.nodes.get(self.id).as_leaf().next()?;
        Some(Leaf { tree: self.tree, id: next })
    }
}

impl fmt::Debug for Leaf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Iterator over all keys in ascending order.
///
/// Created by [`BPlusTree::iter`]; walks the leaf chain, worst-case constant
/// work per key after the initial position.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a> {
    tree: &'a BPlusTree,
    leaf: Option<NodeId>,
    index: usize,
    remaining: usize,
}

impl Iterator for Keys<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            let leaf = self.tree.nodes.get(self.leaf?).as_leaf();
            if let Some(&key) = leaf.keys().get(self.index) {
                self.index += 1;
                self.remaining -= 1;
                return Some(key);
            }
            self.leaf = leaf.next();
            self.index = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl FusedIterator for Keys<'_> {}

impl<'a> IntoIterator for &'a BPlusTree {
    type Item = i64;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.iter()
    }
}

/// Iterator over the keys in `[start, end]`, created by
/// [`BPlusTree::range`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a> {
    tree: &'a BPlusTree,
    leaf: Option<NodeId>,
    index: usize,
    end: i64,
}

impl Iterator for Range<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            let leaf = self.tree.nodes.get(self.leaf?).as_leaf();
            if let Some(&key) = leaf.keys().get(self.index) {
                if key > self.end {
                    self.leaf = None;
                    return None;
                }
                self.index += 1;
                return Some(key);
            }
            self.leaf = leaf.next();
            self.index = 0;
        }
    }
}

impl FusedIterator for Range<'_> {}
