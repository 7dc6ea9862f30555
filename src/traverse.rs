use crate::{AvlTree, Link, Links, TreeNode};

/// The order in which [`AvlTree::apply`] visits the elements of a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Each node before its subtrees.
    PreOrder,
    /// Each node between its left and right subtrees, i.e. in key order.
    InOrder,
    /// Each node after its subtrees.
    PostOrder,
}

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Calls `visit` on every element of the tree in the given order.
    ///
    /// The walk stops at the first error returned by `visit`, and that error is returned. The tree
    /// is never modified.
    ///
    /// ```ignore
    /// let mut keys = Vec::new();
    /// tree.apply(Traversal::InOrder, |node| {
    ///     keys.push(node.key);
    ///     Ok::<_, ()>(())
    /// })?;
    /// ```
    pub fn apply<E, F>(&self, order: Traversal, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        self.apply_at(self.root, order, &mut visit)
    }

    fn apply_at<E, F>(&self, opt_node: Link<T>, order: Traversal, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        let Some(node) = opt_node else {
            return Ok(());
        };

        let links = unsafe { self.links(node) };
        let item = unsafe { node.as_ref() };

        if order == Traversal::PreOrder {
            visit(item)?;
        }

        self.apply_at(links.left(), order, visit)?;

        if order == Traversal::InOrder {
            visit(item)?;
        }

        self.apply_at(links.right(), order, visit)?;

        if order == Traversal::PostOrder {
            visit(item)?;
        }

        Ok(())
    }
}
