extern crate std;

use std::{
    collections::BTreeSet,
    ops::Bound::{Excluded, Unbounded},
    prelude::v1::*,
    ptr::NonNull,
};

use arbitrary::Arbitrary;
use cordyceps::Linked;
use proptest::strategy::{Just, Strategy};

use crate::{AvlTree, Config, Duplicates, Links, TreeNode};

#[derive(Debug)]
#[repr(C)]
pub struct TestNode {
    pub links: Links<TestNode>,
    pub key: u32,
    /// Distinguishes nodes with equal keys.
    pub id: u32,
}

impl TestNode {
    pub(crate) fn new(key: u32) -> Box<TestNode> {
        Self::with_id(key, 0)
    }

    pub(crate) fn with_id(key: u32, id: u32) -> Box<TestNode> {
        Box::new(TestNode {
            links: Links::new(),
            key,
            id,
        })
    }
}

unsafe impl Linked<Links<TestNode>> for TestNode {
    type Handle = Box<TestNode>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        NonNull::new(Box::into_raw(r)).unwrap()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<TestNode>> {
        // SAFETY: Self is #[repr(C)] and `links` is first field
        ptr.cast()
    }
}

impl TreeNode<Links<TestNode>> for TestNode {
    type Key = u32;

    fn key(&self) -> &Self::Key {
        &self.key
    }
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Get(ItemValue),
    Remove(ItemValue),
    Successor(ItemValue),
    First,
    PopFirst,
    Last,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len().max(1)]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::Successor(item) => FinalOp::Successor(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Get(u32),
    Remove(u32),
    Successor(u32),
    First,
    PopFirst,
    Last,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Get),
        value_strategy().prop_map(Op::Remove),
        value_strategy().prop_map(Op::Successor),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
    ]
}

#[inline]
#[allow(clippy::boxed_local)]
fn node_key(node: Box<TestNode>) -> u32 {
    node.key
}

#[inline]
fn ref_key(node: &TestNode) -> u32 {
    node.key
}

#[inline]
fn ref_entry(node: &TestNode) -> (u32, u32) {
    (node.key, node.id)
}

/// Runs `ops` against a tree that replaces duplicates and against a `BTreeSet`, asserting that
/// both agree after every step.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut avl: AvlTree<TestNode> = AvlTree::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = if btree.insert(value) {
                    None
                } else {
                    Some(value)
                };
                let from_avl = avl.insert(TestNode::new(value)).map(node_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Get(value) => {
                let from_btree = btree.get(&value).copied();
                let from_avl = avl.find(&value).map(|node| ref_key(&node));

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = btree.remove(&value).then_some(value);
                let from_avl = avl.remove(&value).map(node_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Successor(value) => {
                let from_btree = btree
                    .contains(&value)
                    .then(|| btree.range((Excluded(value), Unbounded)).next().copied())
                    .flatten();
                let from_avl = avl
                    .find(&value)
                    .and_then(|node| avl.successor(&node).map(|next| ref_key(&next)));

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first().copied();
                let from_avl = avl.first().map(|node| ref_key(&node));

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_btree = btree.pop_first();
                let from_avl = avl.pop_first().map(node_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last().copied();
                let from_avl = avl.last().map(|node| ref_key(&node));

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().zip(avl.iter()).all(|(&a, b)| a == b.key));
    }
}

/// Runs `ops` against a tree that allows duplicates and against a sorted vector of
/// `(key, insertion id)` pairs, asserting that both agree after every step.
///
/// Equal keys must stay in insertion order through every rebalance.
pub fn run_multiset_equivalence(ops: Vec<Op>) {
    let mut sorted: Vec<(u32, u32)> = Vec::with_capacity(ops.len());
    let mut avl: AvlTree<TestNode> =
        AvlTree::with_config(Config::new().duplicates(Duplicates::Allow));

    for (op_id, op) in ops.into_iter().enumerate() {
        let keys: Vec<u32> = sorted.iter().map(|&(key, _)| key).collect();
        let final_op = op.finalize(&keys);

        match final_op {
            FinalOp::Insert(value) => {
                let id = op_id as u32;
                let idx = sorted.partition_point(|&(key, _)| key <= value);
                sorted.insert(idx, (value, id));

                let displaced = avl.insert(TestNode::with_id(value, id)).map(node_key);

                assert_eq!(None, displaced, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Get(value) => {
                let from_model = keys.contains(&value).then_some(value);
                let from_avl = avl.find(&value).map(|node| ref_key(&node));

                assert_eq!(from_model, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                let removed = avl.remove(&value);

                assert_eq!(
                    keys.contains(&value),
                    removed.is_some(),
                    "FinalOp #{op_id}: {final_op:?}"
                );

                if let Some(node) = removed {
                    let entry = (node.key, node.id);
                    let idx = sorted
                        .iter()
                        .position(|&e| e == entry)
                        .expect("removed node must be in the model");
                    sorted.remove(idx);
                }
            }

            FinalOp::Successor(value) => {
                let from_avl = avl.find(&value).map(|node| {
                    let entry = ref_entry(&node);
                    let next = avl.successor(&node).map(|next| ref_entry(&next));
                    (entry, next)
                });

                match from_avl {
                    Some((entry, next)) => {
                        let idx = sorted
                            .iter()
                            .position(|&e| e == entry)
                            .expect("found node must be in the model");

                        assert_eq!(
                            sorted.get(idx + 1).copied(),
                            next,
                            "FinalOp #{op_id}: {final_op:?}"
                        );
                    }
                    None => assert!(!keys.contains(&value), "FinalOp #{op_id}: {final_op:?}"),
                }
            }

            FinalOp::First => {
                let from_avl = avl.first().map(|node| ref_entry(&node));

                assert_eq!(sorted.first().copied(), from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_model = (!sorted.is_empty()).then(|| sorted.remove(0));
                let from_avl = avl.pop_first().map(|node| (node.key, node.id));

                assert_eq!(from_model, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_avl = avl.last().map(|node| ref_entry(&node));

                assert_eq!(sorted.last().copied(), from_avl, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        avl.assert_invariants();
        assert_eq!(sorted.len(), avl.len());
        assert!(sorted
            .iter()
            .zip(avl.iter())
            .all(|(&entry, node)| entry == ref_entry(node)));
    }
}
