use core::fmt;

use crate::{AvlTree, Link, Links, TreeNode};

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Writes a sideways drawing of the tree to `w`, followed by its height.
    ///
    /// The root is at the left margin with larger keys above it; each level is indented by eight
    /// columns. Every node is labelled `T` (root), `R` or `L`, rendered by `print` and followed by
    /// its balance factor:
    ///
    /// ```text
    /// --
    ///                 R: 7 (+0)
    ///         R: 5 (+1)
    /// T: 3 (+1)
    ///         L: 1 (+0)
    ///
    /// height = 3
    /// ```
    pub fn write_pretty<W, F>(&self, mut w: W, mut print: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &T) -> fmt::Result,
    {
        w.write_str("\n--\n")?;
        self.write_pretty_at(&mut w, &mut print, self.root, 0, "T")?;

        match self.check_height() {
            Ok(height) => writeln!(w, "\nheight = {height}"),
            Err(error) => writeln!(w, "\nheight = ? ({error})"),
        }
    }

    fn write_pretty_at<W, F>(
        &self,
        w: &mut W,
        print: &mut F,
        opt_node: Link<T>,
        depth: usize,
        label: &str,
    ) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &T) -> fmt::Result,
    {
        let Some(node) = opt_node else {
            return Ok(());
        };

        let links = unsafe { self.links(node) };

        self.write_pretty_at(w, print, links.right(), depth + 1, "R")?;

        write!(w, "{:indent$}{label}: ", "", indent = 8 * depth)?;
        print(w, unsafe { node.as_ref() })?;
        writeln!(w, " ({:+})", links.balance().factor())?;

        self.write_pretty_at(w, print, links.left(), depth + 1, "L")
    }
}
