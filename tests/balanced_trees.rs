//! Differential tests for the binary and multiway search trees: every
//! structure replays the same random op sequences as `BTreeSet` and must
//! agree at every step.

use std::collections::BTreeSet;

use arboretum::{AvlTree, BTree, BinarySearchTree, SplayTree, Treap};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    let key = -200i64..200;
    prop_oneof![
        5 => key.clone().prop_map(SetOp::Insert),
        3 => key.clone().prop_map(SetOp::Remove),
        2 => key.prop_map(SetOp::Contains),
    ]
}

fn ops() -> impl Strategy<Value = Vec<SetOp>> {
    proptest::collection::vec(set_op_strategy(), 1..1_000)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn avl_matches_btreeset(ops in ops()) {
        let mut tree = AvlTree::new();
        let mut set = BTreeSet::new();
        for op in ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tree.insert(k), set.insert(k)),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(k), set.remove(&k)),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(k), set.contains(&k)),
            }
            prop_assert_eq!(tree.len(), set.len());
        }
        prop_assert_eq!(tree.in_order(), set.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn bst_matches_btreeset(ops in ops()) {
        let mut tree = BinarySearchTree::new();
        let mut set = BTreeSet::new();
        for op in ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tree.insert(k), set.insert(k)),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(k), set.remove(&k)),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(k), set.contains(&k)),
            }
            prop_assert_eq!(tree.len(), set.len());
        }
        prop_assert_eq!(tree.in_order(), set.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn splay_matches_btreeset(ops in ops()) {
        let mut tree = SplayTree::new();
        let mut set = BTreeSet::new();
        for op in ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tree.insert(k), set.insert(k)),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(k), set.remove(&k)),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(k), set.contains(&k)),
            }
            prop_assert_eq!(tree.len(), set.len());
        }
        prop_assert_eq!(tree.in_order(), set.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn treap_matches_btreeset(seed in any::<u64>(), ops in ops()) {
        let mut tree = Treap::with_seed(seed);
        let mut set = BTreeSet::new();
        for op in ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tree.insert(k), set.insert(k)),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(k), set.remove(&k)),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(k), set.contains(&k)),
            }
            prop_assert_eq!(tree.len(), set.len());
        }
        prop_assert_eq!(tree.in_order(), set.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn btree_matches_btreeset(t in 2usize..6, ops in ops()) {
        let mut tree = BTree::new(t);
        let mut set = BTreeSet::new();
        for op in ops {
            match op {
                SetOp::Insert(k) => prop_assert_eq!(tree.insert(k), set.insert(k)),
                SetOp::Remove(k) => prop_assert_eq!(tree.remove(k), set.remove(&k)),
                SetOp::Contains(k) => prop_assert_eq!(tree.contains(k), set.contains(&k)),
            }
            prop_assert_eq!(tree.len(), set.len());
        }
        prop_assert_eq!(tree.in_order(), set.iter().copied().collect::<Vec<_>>());
    }
}

/// All five keyed structures agree with each other on the same workload.
#[test]
fn every_structure_agrees_on_a_fixed_workload() {
    let keys =
        [42, -7, 13, 99, 0, -50, 7, 28, 150, -3, 64, 5, -199, 81, 33, 12, -12, 200, 1, -1];

    let mut avl = AvlTree::new();
    let mut bst = BinarySearchTree::new();
    let mut splay = SplayTree::new();
    let mut treap = Treap::new();
    let mut btree = BTree::new(3);
    for &k in &keys {
        avl.insert(k);
        bst.insert(k);
        splay.insert(k);
        treap.insert(k);
        btree.insert(k);
    }
    for &k in &keys[..10] {
        avl.remove(k);
        bst.remove(k);
        splay.remove(k);
        treap.remove(k);
        btree.remove(k);
    }

    let expected: Vec<i64> = {
        let mut set: BTreeSet<i64> = keys.iter().copied().collect();
        for k in &keys[..10] {
            set.remove(k);
        }
        set.into_iter().collect()
    };
    assert_eq!(avl.in_order(), expected);
    assert_eq!(bst.in_order(), expected);
    assert_eq!(splay.in_order(), expected);
    assert_eq!(treap.in_order(), expected);
    assert_eq!(btree.in_order(), expected);
}
