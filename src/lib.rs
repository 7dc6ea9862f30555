//! An intrusive AVL tree with cached balance factors.
//#![no_std]

// Conventions used in comments:
// - The height of a missing subtree is 0; the height of a leaf is 1.
// - The balance factor of a node `x` is `bf(x) = h(right(x)) - h(left(x))`.
// - A node is heavy on a side if that side's subtree is the taller one.
//
// The fundamental invariants of an AVL tree are:
// 1. Every node orders its subtrees: keys to the left compare less, keys to the right compare
//    greater. When duplicates are allowed both comparisons are non-strict, and an equal key is
//    always inserted after the equal keys already present.
// 2. All balance factors are -1, 0 or 1.
//
// Balance factors are never recomputed from heights. Insertion and removal only change the
// heights of nodes on the path between the modified position and the root, so each walks that
// path once, adjusting factors from the side whose height changed and stopping as soon as a
// subtree's height is known to be unchanged.

use core::{
    cell::UnsafeCell, cmp::Ordering, fmt, marker::PhantomPinned, mem, ops::Not, pin::Pin,
    ptr::NonNull,
};
use std::borrow::Borrow;

use cordyceps::Linked;

mod check;
mod config;
mod debug;
mod iter;
#[cfg(any(test, feature = "model"))]
pub mod model;
mod traverse;


pub use check::IntegrityError;
pub use config::{Config, Duplicates};
pub use iter::Iter;
pub use traverse::Traversal;

pub trait TreeNode<L>: Linked<L> {
    type Key: Ord + fmt::Debug;

    fn key(&self) -> &Self::Key;
}

/// An intrusive AVL tree.
///
/// Items are owned by the tree through their [`Linked::Handle`] from insertion until they are
/// removed or the tree is dropped. Dropping a handle is how an item is released; the tree drops
/// each handle it owns exactly once.
pub struct AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    root: Link<T>,
    min: Link<T>,
    len: usize,
    config: Config,
}

pub struct Links<T: ?Sized> {
    inner: UnsafeCell<LinksInner<T>>,
}

/// The cached balance factor of a node, `h(right) - h(left)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum Balance {
    LeftHeavy = -1,
    Balanced = 0,
    RightHeavy = 1,
}

impl Balance {
    /// Returns the balance of a node whose `dir` subtree is the taller one.
    #[inline]
    fn heavy(dir: Dir) -> Balance {
        match dir {
            Dir::Left => Balance::LeftHeavy,
            Dir::Right => Balance::RightHeavy,
        }
    }

    /// Returns the balance factor as a signed integer.
    #[inline]
    pub const fn factor(self) -> i8 {
        self as i8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[repr(C)]
struct LinksInner<T: ?Sized> {
    parent: Link<T>,
    children: [Link<T>; 2],
    balance: Balance,
    _unpin: PhantomPinned,
}

type Link<T> = Option<NonNull<T>>;

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Returns a new empty tree with the default [`Config`].
    pub const fn new() -> AvlTree<T> {
        Self::with_config(Config::new())
    }

    /// Returns a new empty tree using `config`.
    ///
    /// The configuration is fixed for the lifetime of the tree.
    pub const fn with_config(config: Config) -> AvlTree<T> {
        AvlTree {
            root: None,
            min: None,
            len: 0,
            config,
        }
    }

    /// Returns the configuration this tree was built with.
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if let Err(error) = self.check() {
            panic!("tree invariant violated: {error}");
        }
    }

    /// Returns a reference to a node whose key equals `key`.
    ///
    /// When duplicates are allowed this is some node with an equal key, not necessarily the one
    /// inserted first.
    pub fn find<Q>(&self, key: &Q) -> Option<Pin<&T>>
    where
        T::Key: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let ptr = self.find_ptr(key)?;
        unsafe { Some(Pin::new_unchecked(ptr.as_ref())) }
    }

    /// Returns a pointer to a node whose key equals `key`, for use with [`AvlTree::remove_at`]
    /// and [`AvlTree::delete`].
    pub fn find_ptr<Q>(&self, key: &Q) -> Option<NonNull<T>>
    where
        T::Key: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            unsafe {
                match key.cmp(cur.as_ref().key().borrow()) {
                    Ordering::Less => opt_cur = self.links(cur).left(),
                    Ordering::Equal => return Some(cur),
                    Ordering::Greater => opt_cur = self.links(cur).right(),
                }
            }
        }
    }

    /// Returns `true` if the tree contains a node whose key equals `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find_ptr(key).is_some()
    }

    /// Returns the minimum element of the tree.
    pub fn first(&self) -> Option<Pin<&T>> {
        self.first_raw()
            .map(|first| unsafe { Pin::new_unchecked(first.as_ref()) })
    }

    /// Returns the maximum element of the tree.
    pub fn last(&self) -> Option<Pin<&T>> {
        let mut cur = self.root?;

        unsafe {
            while let Some(right) = self.links(cur).right() {
                cur = right;
            }

            Some(Pin::new_unchecked(cur.as_ref()))
        }
    }

    /// Returns the element following `node` in key order, or `None` if `node` is the maximum.
    ///
    /// `node` must be an element of this tree; otherwise the result is unspecified.
    pub fn successor(&self, node: &T) -> Option<Pin<&T>> {
        let next = unsafe { self.successor_raw(NonNull::from(node))? };
        unsafe { Some(Pin::new_unchecked(next.as_ref())) }
    }

    fn first_raw(&self) -> Link<T> {
        if self.config.caches_min() {
            return self.min;
        }

        self.root.map(|root| unsafe { self.min_in_subtree(root).0 })
    }

    unsafe fn successor_raw(&self, node: NonNull<T>) -> Link<T> {
        unsafe {
            // With a right subtree, the successor is its minimum.
            if let Some(right) = self.links(node).right() {
                return Some(self.min_in_subtree(right).0);
            }

            // Otherwise it is the first ancestor reached by stepping up from a left child.
            let mut cur = node;
            while let Some(parent) = self.links(cur).parent() {
                if self.links(parent).left() == Some(cur) {
                    return Some(parent);
                }

                cur = parent;
            }

            None
        }
    }

    #[inline]
    unsafe fn links<'a>(&self, node: NonNull<T>) -> &'a Links<T> {
        unsafe { T::links(node).as_ref() }
    }

    #[inline]
    unsafe fn links_mut<'a>(&mut self, node: NonNull<T>) -> &'a mut Links<T> {
        unsafe { T::links(node).as_mut() }
    }

    unsafe fn maybe_set_parent(&mut self, opt_node: Link<T>, parent: Link<T>) {
        let Some(node) = opt_node else {
            return;
        };

        unsafe { self.links_mut(node).set_parent(parent) };
    }

    #[inline]
    unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link<T>,
        old_child: NonNull<T>,
        new_child: Link<T>,
    ) {
        match parent {
            Some(parent) => unsafe { self.replace_child(parent, old_child, new_child) },
            None => self.root = new_child,
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent pointer is not updated.
    //
    // # Safety
    //
    // The caller must ensure that `old_child` is a child node of `parent`.
    #[inline]
    unsafe fn replace_child(&mut self, parent: NonNull<T>, old_child: NonNull<T>, new_child: Link<T>) {
        unsafe {
            let dir = self.which_child(parent, old_child);
            debug_assert_eq!(
                self.links(parent).child(dir),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );

            self.links_mut(parent).set_child(dir, new_child);
        }
    }

    // Rotates `x` down toward `dir`, lifting its child on the other side into its place.
    //
    // Balance factors are not updated. Returns the new root of the subtree.
    unsafe fn rotate(&mut self, x: NonNull<T>, dir: Dir) -> NonNull<T> {
        unsafe {
            let y = self
                .links(x)
                .child(!dir)
                .expect("rotation requires a child to lift");

            #[cfg(feature = "tracing")]
            tracing::trace!(pivot = ?x.as_ref().key(), lifted = ?y.as_ref().key(), ?dir, "rotate");

            // `y`'s inner subtree crosses over to `x`.
            let across = self.links(y).child(dir);
            self.links_mut(x).set_child(!dir, across);
            self.maybe_set_parent(across, Some(x));

            // `y` takes `x`'s place under its parent.
            let parent = self.links(x).parent();
            self.links_mut(y).set_parent(parent);
            self.replace_child_or_set_root(parent, x, Some(y));

            // `x` hangs below `y`.
            self.links_mut(y).set_child(dir, Some(x));
            self.links_mut(x).set_parent(Some(y));

            y
        }
    }

    #[inline]
    unsafe fn rotate_left(&mut self, x: NonNull<T>) -> NonNull<T> {
        unsafe { self.rotate(x, Dir::Left) }
    }

    #[inline]
    unsafe fn rotate_right(&mut self, x: NonNull<T>) -> NonNull<T> {
        unsafe { self.rotate(x, Dir::Right) }
    }

    // Rotates `p` twice so that the inner grandchild on its `heavy` side becomes the subtree
    // root, then sets the balance factors of the three nodes involved.
    //
    // Returns the new root of the subtree, which is always balanced.
    unsafe fn rotate_twice(&mut self, p: NonNull<T>, heavy: Dir) -> NonNull<T> {
        unsafe {
            let child = self.links(p).child(heavy).expect("heavy side must be present");
            let inner = self
                .links(child)
                .child(!heavy)
                .expect("double rotation requires an inner grandchild");

            let inner_balance = self.links(inner).balance();

            match heavy {
                Dir::Left => {
                    self.rotate_left(child);
                    self.rotate_right(p);
                }
                Dir::Right => {
                    self.rotate_right(child);
                    self.rotate_left(p);
                }
            }

            // The heights below `inner` are inherited by the two nodes now beside it.
            let (left_balance, right_balance) = match inner_balance {
                Balance::LeftHeavy => (Balance::Balanced, Balance::RightHeavy),
                Balance::Balanced => (Balance::Balanced, Balance::Balanced),
                Balance::RightHeavy => (Balance::LeftHeavy, Balance::Balanced),
            };

            let root = inner;
            let left = self.links(root).left().expect("left of a double rotation");
            let right = self.links(root).right().expect("right of a double rotation");

            self.links_mut(left).set_balance(left_balance);
            self.links_mut(right).set_balance(right_balance);
            self.links_mut(root).set_balance(Balance::Balanced);

            root
        }
    }

    /// Inserts an item into the tree.
    ///
    /// If duplicates are not allowed and the tree already holds an item with an equal key, the new
    /// item takes that item's place and the displaced item is returned. Otherwise returns `None`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, item: T::Handle) -> Option<T::Handle> {
        let ptr = T::into_ptr(item);

        let mut opt_parent = None;
        let mut opt_cur = self.root;
        let mut dir = Dir::Left;

        // Descend the tree, looking for an empty position.
        while let Some(cur) = opt_cur {
            let ordering = unsafe { ptr.as_ref().key().cmp(cur.as_ref().key()) };

            dir = match ordering {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => match self.config.duplicates_mode() {
                    Duplicates::Replace => return Some(unsafe { self.replace_node(cur, ptr) }),
                    // Equal keys chain to the right of the existing ones.
                    Duplicates::Allow => Dir::Right,
                },
            };

            opt_parent = Some(cur);
            opt_cur = unsafe { self.links(cur).child(dir) };
        }

        unsafe {
            let links = self.links_mut(ptr);
            links.set_parent(opt_parent);
            links.set_left(None);
            links.set_right(None);
            links.set_balance(Balance::Balanced);

            match opt_parent {
                Some(parent) => {
                    self.links_mut(parent).set_child(dir, Some(ptr));
                }
                None => self.root = Some(ptr),
            }

            if self.config.caches_min()
                && self
                    .min
                    .map_or(true, |min| ptr.as_ref().key() < min.as_ref().key())
            {
                self.min = Some(ptr);
            }

            self.len += 1;

            self.rebalance_inserted(ptr);
        }

        None
    }

    // Replaces `old` with `new` in place, taking over its links and balance factor.
    //
    // Returns the handle of `old`, which is no longer linked.
    unsafe fn replace_node(&mut self, old: NonNull<T>, new: NonNull<T>) -> T::Handle {
        unsafe {
            let old_links = self.links(old);
            let parent = old_links.parent();
            let left = old_links.left();
            let right = old_links.right();
            let balance = old_links.balance();

            self.replace_child_or_set_root(parent, old, Some(new));
            self.maybe_set_parent(left, Some(new));
            self.maybe_set_parent(right, Some(new));

            let new_links = self.links_mut(new);
            new_links.set_parent(parent);
            new_links.set_left(left);
            new_links.set_right(right);
            new_links.set_balance(balance);

            if self.min == Some(old) {
                self.min = Some(new);
            }

            self.links_mut(old).clear();

            T::from_ptr(old)
        }
    }

    // Performs a bottom-up rebalance of the tree after the insertion of `node`.
    //
    // Invariants:
    // - `node` is a balanced leaf.
    // - The subtree rooted at `x` has grown by one.
    unsafe fn rebalance_inserted(&mut self, node: NonNull<T>) {
        let mut x = node;

        unsafe {
            while let Some(parent) = self.links(x).parent() {
                let grown = self.which_child(parent, x);

                match self.links(parent).balance() {
                    Balance::Balanced => {
                        // The parent's height grows with `x`; keep climbing.
                        self.links_mut(parent).set_balance(Balance::heavy(grown));
                        x = parent;
                    }

                    balance if balance == Balance::heavy(grown) => {
                        // The parent would become 2-heavy. The fix-up restores the subtree's
                        // height from before the insertion.
                        self.fix_insert_imbalance(parent, grown);
                        break;
                    }

                    _ => {
                        // The growth fills in the parent's shorter side.
                        self.links_mut(parent).set_balance(Balance::Balanced);
                        break;
                    }
                }
            }
        }
    }

    // Repairs `p`, whose `heavy` subtree has grown to two taller than its other subtree.
    //
    // Returns the new root of the subtree.
    unsafe fn fix_insert_imbalance(&mut self, p: NonNull<T>, heavy: Dir) -> NonNull<T> {
        unsafe {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = ?p.as_ref().key(), ?heavy, "fix insert imbalance");

            let child = self.links(p).child(heavy).expect("heavy side must be present");

            // A grown child is never balanced, so it leans either outward or inward.
            if self.links(child).balance() == Balance::heavy(heavy) {
                let root = self.rotate(p, !heavy);
                self.links_mut(root).set_balance(Balance::Balanced);
                self.links_mut(p).set_balance(Balance::Balanced);
                root
            } else {
                self.rotate_twice(p, heavy)
            }
        }
    }

    // Repairs `p`, whose subtree opposite `heavy` has shrunk to two shorter than its `heavy`
    // subtree.
    //
    // Returns the new root of the subtree. The subtree has shrunk iff the new root is balanced.
    unsafe fn fix_delete_imbalance(&mut self, p: NonNull<T>, heavy: Dir) -> NonNull<T> {
        unsafe {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = ?p.as_ref().key(), ?heavy, "fix delete imbalance");

            let child = self.links(p).child(heavy).expect("heavy side must be present");

            match self.links(child).balance() {
                balance if balance == Balance::heavy(heavy) => {
                    let root = self.rotate(p, !heavy);
                    self.links_mut(root).set_balance(Balance::Balanced);
                    self.links_mut(p).set_balance(Balance::Balanced);
                    root
                }

                Balance::Balanced => {
                    // Only reachable on removal: the rotation keeps the subtree's height.
                    let root = self.rotate(p, !heavy);
                    self.links_mut(root).set_balance(Balance::heavy(!heavy));
                    self.links_mut(p).set_balance(Balance::heavy(heavy));
                    root
                }

                _ => self.rotate_twice(p, heavy),
            }
        }
    }

    // Returns the minimum node in the subtree.
    //
    // If the subtree root is not the minimum, also returns the minimum node's parent.
    #[inline]
    unsafe fn min_in_subtree(&self, root: NonNull<T>) -> (NonNull<T>, Option<NonNull<T>>) {
        let mut parent = None;
        let mut cur = root;

        while let Some(left) = unsafe { self.links(cur).left() } {
            parent = Some(cur);
            cur = left;
        }

        (cur, parent)
    }

    /// Removes the item with a key equal to `key`, returning it.
    ///
    /// When duplicates are allowed, the item removed is the one [`AvlTree::find`] returns.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T::Handle>
    where
        T::Key: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let node = self.find_ptr(key)?;
        unsafe { Some(self.remove_at(node)) }
    }

    /// Removes and returns the minimum element of the tree.
    pub fn pop_first(&mut self) -> Option<T::Handle> {
        let first = self.first_raw()?;
        unsafe { Some(self.remove_at(first)) }
    }

    /// Removes `node` from the tree. If `keep` is `true` the item is returned to the caller;
    /// otherwise it is dropped and `None` is returned.
    ///
    /// # Safety
    ///
    /// It is the caller's responsibility to ensure that `node` is an element of `self`, and not any
    /// other tree.
    pub unsafe fn delete(&mut self, node: NonNull<T>, keep: bool) -> Option<T::Handle> {
        let item = unsafe { self.remove_at(node) };

        if keep {
            Some(item)
        } else {
            drop(item);
            None
        }
    }

    /// Removes an arbitrary node from the tree, returning its item.
    ///
    /// # Safety
    ///
    /// It is the caller's responsibility to ensure that `node` is an element of `self`, and not any
    /// other tree.
    pub unsafe fn remove_at(&mut self, node: NonNull<T>) -> T::Handle {
        // There are two possible cases:
        //
        // 1. `node` has at most one child.
        //
        //    `node` is unlinked directly and its child (if any) is elevated to replace it.
        //
        // 2. `node` has two children.
        //
        //    `node` trades places with its successor[^1], which by definition has no left child.
        //    Each takes over the other's links and balance factor, so the shape of the tree and
        //    every balance factor are unchanged while `node` now sits where case 1 applies.
        //
        // In both cases the balance factors above the unlinked position are corrected before the
        // node is spliced out; rotations during the correction never change `node`'s parent.
        //
        // [^1]: The successor of a node `a` is the least node in `a`'s right subtree.

        unsafe {
            // The cached minimum has no left child, so it only ever falls under case 1.
            if self.min == Some(node) {
                self.min = self.successor_raw(node);
            }

            if self.links(node).left().is_some() && self.links(node).right().is_some() {
                self.swap_with_successor(node);
            }

            self.rebalance_removed(node);

            let links = self.links(node);
            let parent = links.parent();
            let child = links.left().or(links.right());

            self.maybe_set_parent(child, parent);
            self.replace_child_or_set_root(parent, node, child);
            self.links_mut(node).clear();

            self.len -= 1;

            T::from_ptr(node)
        }
    }

    // Exchanges the tree positions of `node`, which has two children, and its successor.
    unsafe fn swap_with_successor(&mut self, node: NonNull<T>) {
        unsafe {
            let parent = self.links(node).parent();
            let left = self.links(node).left().expect("node must have a left child");
            let right = self.links(node).right().expect("node must have a right child");
            let node_balance = self.links(node).balance();

            let (successor, successor_parent) = self.min_in_subtree(right);
            let successor_right = self.links(successor).right();
            let successor_balance = self.links(successor).balance();

            // The successor assumes `node`'s place.
            self.replace_child_or_set_root(parent, node, Some(successor));
            self.links_mut(successor).set_parent(parent);
            self.links_mut(successor).set_left(Some(left));
            self.links_mut(left).set_parent(Some(successor));
            self.links_mut(successor).set_balance(node_balance);

            match successor_parent {
                Some(successor_parent) => {
                    self.links_mut(successor).set_right(Some(right));
                    self.links_mut(right).set_parent(Some(successor));

                    self.links_mut(successor_parent).set_left(Some(node));
                    self.links_mut(node).set_parent(Some(successor_parent));
                }

                // The successor was `node`'s right child.
                None => {
                    self.links_mut(successor).set_right(Some(node));
                    self.links_mut(node).set_parent(Some(successor));
                }
            }

            // `node` assumes the successor's place.
            self.links_mut(node).set_left(None);
            self.links_mut(node).set_right(successor_right);
            self.maybe_set_parent(successor_right, Some(node));
            self.links_mut(node).set_balance(successor_balance);
        }
    }

    // Performs a bottom-up rebalance of the tree ahead of unlinking `node`.
    //
    // Invariants:
    // - `node` has at most one child and is still linked.
    // - The subtree rooted at `x` is about to shrink, or has shrunk, by one.
    unsafe fn rebalance_removed(&mut self, node: NonNull<T>) {
        let mut x = node;

        unsafe {
            while let Some(mut parent) = self.links(x).parent() {
                let shrunk = self.which_child(parent, x);

                match self.links(parent).balance() {
                    balance if balance == Balance::heavy(shrunk) => {
                        // The parent loses height along with `x`; keep climbing.
                        self.links_mut(parent).set_balance(Balance::Balanced);
                    }

                    Balance::Balanced => {
                        // The other side keeps the parent's height.
                        self.links_mut(parent).set_balance(Balance::heavy(!shrunk));
                        break;
                    }

                    _ => {
                        // The parent would become 2-heavy on the other side.
                        parent = self.fix_delete_imbalance(parent, !shrunk);

                        if self.links(parent).balance() != Balance::Balanced {
                            break;
                        }
                    }
                }

                x = parent;
            }
        }
    }

    /// Clears the tree, removing and dropping all elements.
    ///
    /// Elements are dropped in post-order: both subtrees of a node before the node itself.
    pub fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                let links = self.links(cur);

                // Descend until reaching a leaf.
                if let Some(child) = links.left().or(links.right()) {
                    opt_cur = Some(child);
                    continue;
                }

                // Detach the leaf and drop it, then climb to the parent.
                let parent = links.parent();
                self.replace_child_or_set_root(parent, cur, None);
                self.links_mut(cur).clear();

                drop(T::from_ptr(cur));
                self.len -= 1;

                opt_cur = parent;
            }
        }

        self.min = None;

        debug_assert!(self.root.is_none());
        debug_assert_eq!(self.len(), 0);
    }

    // Support methods ========================================================

    unsafe fn which_child(&self, parent: NonNull<T>, child: NonNull<T>) -> Dir {
        if unsafe { self.links(parent).left() } == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }
}

impl<T> Default for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> fmt::Debug for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|node| node.key())).finish()
    }
}

impl<T: ?Sized> Links<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                balance: Balance::Balanced,
                _unpin: PhantomPinned,
            }),
        }
    }

    /// Returns `true` if this node is currently linked into a tree with other nodes.
    ///
    /// A tree's only node has no links and is indistinguishable from an unlinked node.
    pub fn is_linked(&self) -> bool {
        self.parent().is_some() || self.left().is_some() || self.right().is_some()
    }

    /// Returns the cached balance factor of this node.
    #[inline]
    pub fn balance(&self) -> Balance {
        unsafe { (*self.inner.get()).balance }
    }

    #[inline]
    fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    fn child(&self, dir: Dir) -> Link<T> {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    fn left(&self) -> Link<T> {
        self.child(Dir::Left)
    }

    #[inline]
    fn right(&self) -> Link<T> {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().children[dir as usize], child)
    }

    #[inline]
    fn set_left(&mut self, left: Link<T>) -> Link<T> {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    fn set_right(&mut self, right: Link<T>) -> Link<T> {
        self.set_child(Dir::Right, right)
    }

    #[inline]
    fn set_balance(&mut self, balance: Balance) {
        self.inner.get_mut().balance = balance;
    }

    fn clear(&mut self) {
        let inner = self.inner.get_mut();
        inner.parent = None;
        inner.children = [None; 2];
        inner.balance = Balance::Balanced;
    }
}

impl<T: ?Sized> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("parent", &self.parent())
            .field("left", &self.left())
            .field("right", &self.right())
            .field("balance", &self.balance())
            .finish()
    }
}
