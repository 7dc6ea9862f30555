use std::{fmt::Write, ptr::NonNull};

use cordyceps::Linked;
use cordyceps_avl::{AvlTree, Links, TreeNode};

#[derive(Debug)]
#[repr(C)]
struct TestNode {
    links: Links<TestNode>,
    key: u32,
}

impl TestNode {
    fn new(key: u32) -> Box<TestNode> {
        Box::new(TestNode {
            links: Links::new(),
            key,
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

fn print_tree(tree: &AvlTree<TestNode>) {
    let mut out = String::new();
    tree.write_pretty(&mut out, |w, node| write!(w, "{}", node.key)).unwrap();
    print!("{out}");
}

fn main() {
    let mut tree: AvlTree<TestNode> = AvlTree::new();

    for key in [1, 3, 5, 7] {
        tree.insert(TestNode::new(key));
        tree.assert_invariants();
    }

    print_tree(&tree);

    let one = tree.find_ptr(&1).unwrap();
    assert!(unsafe { tree.delete(one, false) }.is_none());
    tree.assert_invariants();

    print_tree(&tree);

    drop(tree);
}
