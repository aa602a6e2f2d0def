//! Classic ordered-tree and graph structures for Rust.
//!
//! This crate is a teaching collection: each structure is self-contained,
//! independently testable, and implemented over plain `i64` keys with the
//! usual insert/search/remove/traverse operations.
//!
//! The centerpiece is [`BPlusTree`], an arena-backed B+tree with a singly
//! linked leaf chain for ordered range scans:
//!
//! ```
//! use arboretum::BPlusTree;
//!
//! let mut tree = BPlusTree::new(3);
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! // Keys come back sorted via the leaf chain.
//! let keys: Vec<i64> = tree.iter().collect();
//! assert_eq!(keys, [5, 6, 7, 10, 12, 17, 20, 30]);
//!
//! // Range scans walk the chain instead of re-descending per key.
//! let mid: Vec<i64> = tree.range(6, 17).collect();
//! assert_eq!(mid, [6, 7, 10, 12, 17]);
//! ```
//!
//! The remaining structures are independent peers, ported from the same
//! collection:
//!
//! - [`AvlTree`], [`BinarySearchTree`], [`SplayTree`], [`Treap`] - single-key
//!   binary search trees with different balancing strategies
//! - [`BTree`] - the classic multiway B-tree (keys in internal nodes too)
//! - [`FenwickTree`], [`SegmentTree`] - flat-array range query structures
//! - [`Digraph`] - BFS/DFS traversal, cycle detection, topological sort
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`
//! - **Single-threaded by design** - no operation blocks or suspends; callers
//!   needing shared access serialize externally
//! - **No panics in steady state** - duplicate inserts and missing removes are
//!   ordinary `false` returns; only construction preconditions assert

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

pub mod avl;
pub mod bptree;
pub mod bst;
pub mod btree;
pub mod fenwick;
pub mod graph;
pub mod segment;
pub mod splay;
pub mod treap;

pub use avl::AvlTree;
pub use bptree::BPlusTree;
pub use bst::BinarySearchTree;
pub use btree::BTree;
pub use fenwick::FenwickTree;
pub use graph::Digraph;
pub use segment::SegmentTree;
pub use splay::SplayTree;
pub use treap::Treap;
