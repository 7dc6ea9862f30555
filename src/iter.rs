use core::iter::FusedIterator;

use crate::{AvlTree, Link, Links, TreeNode};

/// An iterator over the elements of an [`AvlTree`] in key order.
///
/// Each step is a single successor lookup, so advancing costs _O(log(n))_ in the worst case and
/// _O(1)_ amortized over a full pass.
pub struct Iter<'tree, T: TreeNode<Links<T>> + ?Sized> {
    tree: &'tree AvlTree<T>,
    next: Link<T>,
    len: usize,
}

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Returns an iterator over the elements of the tree, in key order.
    ///
    /// Elements with equal keys are yielded in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: self.first_raw(),
            len: self.len(),
        }
    }
}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> Iterator for Iter<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;

        self.next = unsafe { self.tree.successor_raw(cur) };
        self.len = self.len.saturating_sub(1);

        Some(unsafe { cur.as_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T: TreeNode<Links<T>> + ?Sized> ExactSizeIterator for Iter<'_, T> {}

impl<T: TreeNode<Links<T>> + ?Sized> FusedIterator for Iter<'_, T> {}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> IntoIterator for &'tree AvlTree<T> {
    type Item = &'tree T;
    type IntoIter = Iter<'tree, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
