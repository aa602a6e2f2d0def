//! Randomized binary search tree (treap).
//!
//! Each node carries a random priority; the tree is a BST on keys and a
//! max-heap on priorities simultaneously. Random priorities make the shape
//! equivalent to a BST built from a random insertion order, giving O(log n)
//! expected operations with no explicit rebalancing bookkeeping.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

type Link = Option<Box<TreapNode>>;

struct TreapNode {
    key: i64,
    priority: u64,
    left: Link,
    right: Link,
}

impl TreapNode {
    fn new(key: i64, priority: u64) -> Box<Self> {
        Box::new(Self { key, priority, left: None, right: None })
    }
}

/// An ordered set of `i64` keys balanced by random heap priorities.
///
/// Priorities come from a deterministically seeded [`SmallRng`], so a given
/// insertion sequence always produces the same shape; use
/// [`with_seed`](Treap::with_seed) to vary it.
///
/// # Examples
///
/// ```
/// use arboretum::Treap;
///
/// let mut treap = Treap::new();
/// for key in [9, 4, 6] {
///     treap.insert(key);
/// }
/// assert!(treap.contains(6));
/// assert_eq!(treap.in_order(), [4, 6, 9]);
/// ```
pub struct Treap {
    root: Link,
    rng: SmallRng,
    len: usize,
}

impl Treap {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(0x5eed_1e55)
    }

    /// Creates an empty treap drawing priorities from the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { root: None, rng: SmallRng::seed_from_u64(seed), len: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn contains(&self, key: i64) -> bool {
        let mut current = &self.root;
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Inserts `key` with a fresh random priority, rotating it up until the
    /// heap order holds. Returns `false` if already present.
    pub fn insert(&mut self, key: i64) -> bool {
        let priority = self.rng.next_u64();
        let (root, inserted) = insert(self.root.take(), key, priority);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes `key` by joining its subtrees in priority order. Returns
    /// `false` if absent.
    pub fn remove(&mut self, key: i64) -> bool {
        let (root, removed) = remove(self.root.take(), key);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Keys in ascending order.
    #[must_use]
    pub fn in_order(&self) -> Vec<i64> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack: Vec<&TreapNode> = Vec::new();
        let mut current = self.root.as_deref();
        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            let node = stack.pop().unwrap();
            result.push(node.key);
            current = node.right.as_deref();
        }
        result
    }
}

impl Default for Treap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Treap {
    fn drop(&mut self) {
        // Expected depth is logarithmic but only probabilistically; drop
        // iteratively to be safe.
        let mut stack = Vec::new();
        stack.extend(self.root.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

fn rotate_right(mut node: Box<TreapNode>) -> Box<TreapNode> {
    let mut pivot = node.left.take().expect("rotate_right without left child");
    node.left = pivot.right.take();
    pivot.right = Some(node);
    pivot
}

fn rotate_left(mut node: Box<TreapNode>) -> Box<TreapNode> {
    let mut pivot = node.right.take().expect("rotate_left without right child");
    node.right = pivot.left.take();
    pivot.left = Some(node);
    pivot
}

fn insert(link: Link, key: i64, priority: u64) -> (Box<TreapNode>, bool) {
    let Some(mut node) = link else {
        return (TreapNode::new(key, priority), true);
    };
    match key.cmp(&node.key) {
        Ordering::Equal => (node, false),
        Ordering::Less => {
            let (child, inserted) = insert(node.left.take(), key, priority);
            node.left = Some(child);
            // Rotate a higher-priority child above its parent.
            if node.left.as_ref().unwrap().priority > node.priority {
                node = rotate_right(node);
            }
            (node, inserted)
        }
        Ordering::Greater => {
            let (child, inserted) = insert(node.right.take(), key, priority);
            node.right = Some(child);
            if node.right.as_ref().unwrap().priority > node.priority {
                node = rotate_left(node);
            }
            (node, inserted)
        }
    }
}

fn remove(link: Link, key: i64) -> (Link, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, removed) = remove(node.left.take(), key);
            node.left = child;
            (Some(node), removed)
        }
        Ordering::Greater => {
            let (child, removed) = remove(node.right.take(), key);
            node.right = child;
            (Some(node), removed)
        }
        Ordering::Equal => (join(node.left.take(), node.right.take()), true),
    }
}

/// Joins two treaps where every key in `left` is below every key in
/// `right`, choosing roots by priority so the heap order survives.
fn join(left: Link, right: Link) -> Link {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(mut l), Some(r)) if l.priority > r.priority => {
            l.right = join(l.right.take(), Some(r));
            Some(l)
        }
        (left, Some(mut r)) => {
            r.left = join(left, r.left.take());
            Some(r)
        }
    }
}
