//! Fenwick tree (binary indexed tree) for prefix sums.
//!
//! A flat array where slot `i` (1-based) covers the `i & -i` elements ending
//! at `i`. Point updates and prefix queries both walk at most `log n` slots.

use alloc::vec;
use alloc::vec::Vec;

/// Prefix-sum structure over a fixed-length array of `i64` values.
///
/// Indices are 0-based at the API surface; the classic 1-based layout is
/// internal.
///
/// # Examples
///
/// ```
/// use arboretum::FenwickTree;
///
/// let mut tree = FenwickTree::from_slice(&[3, 2, -1, 6, 5]);
/// assert_eq!(tree.prefix_sum(2), 4);
/// assert_eq!(tree.range_sum(1, 3), 7);
///
/// tree.add(2, 10);
/// assert_eq!(tree.range_sum(1, 3), 17);
/// ```
pub struct FenwickTree {
    /// 1-based; `tree[0]` is unused.
    tree: Vec<i64>,
}

impl FenwickTree {
    /// A zeroed tree over `len` elements.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { tree: vec![0; len + 1] }
    }

    /// Builds from existing values in O(n): each slot pushes its running
    /// total into its parent instead of issuing `len` separate updates.
    #[must_use]
    pub fn from_slice(values: &[i64]) -> Self {
        let mut tree = vec![0; values.len() + 1];
        tree[1..].copy_from_slice(values);
        for i in 1..tree.len() {
            let parent = i + lowest_bit(i);
            if parent < tree.len() {
                tree[parent] += tree[i];
            }
        }
        Self { tree }
    }

    /// Number of elements covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `delta` to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn add(&mut self, index: usize, delta: i64) {
        assert!(index < self.len(), "`FenwickTree::add()` - `index` out of bounds!");
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += lowest_bit(i);
        }
    }

    /// Sum of elements `0..=index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn prefix_sum(&self, index: usize) -> i64 {
        assert!(index < self.len(), "`FenwickTree::prefix_sum()` - `index` out of bounds!");
        let mut i = index + 1;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowest_bit(i);
        }
        sum
    }

    /// Sum of elements `lo..=hi`; 0 when `lo > hi`.
    ///
    /// # Panics
    ///
    /// Panics if `hi` is out of bounds.
    #[must_use]
    pub fn range_sum(&self, lo: usize, hi: usize) -> i64 {
        if lo > hi {
            return 0;
        }
        let below = if lo == 0 { 0 } else { self.prefix_sum(lo - 1) };
        self.prefix_sum(hi) - below
    }
}

#[inline]
fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}
