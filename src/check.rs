use core::ptr::NonNull;

use thiserror::Error;

use crate::{AvlTree, Link, Links, TreeNode};

/// A violated tree invariant, as reported by [`AvlTree::check`] and the checks it combines.
///
/// Keys are rendered with their `Debug` implementation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("key {key} is outside the bounds set by its ancestors")]
    OutOfOrder { key: String },

    #[error("subtrees of key {key} have heights {left} and {right}")]
    Unbalanced {
        key: String,
        left: usize,
        right: usize,
    },

    #[error("key {key} caches balance factor {cached} but its subtrees differ by {actual}")]
    BalanceMismatch {
        key: String,
        cached: i8,
        actual: isize,
    },

    #[error("a child of key {key} does not link back to it")]
    BrokenParentLink { key: String },

    #[error("cached minimum is {cached:?} but the leftmost key is {actual:?}")]
    StaleMinimum {
        cached: Option<String>,
        actual: Option<String>,
    },

    #[error("tree records {len} elements but holds {counted}")]
    LengthMismatch { len: usize, counted: usize },
}

fn describe<T>(node: NonNull<T>) -> String
where
    T: TreeNode<Links<T>> + ?Sized,
{
    format!("{:?}", unsafe { node.as_ref().key() })
}

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Runs every integrity check over the whole tree.
    pub fn check(&self) -> Result<(), IntegrityError> {
        self.check_order(None, None)?;
        self.check_height()?;
        self.check_links()?;
        self.check_min()?;

        let counted = self.iter().count();
        if counted != self.len {
            return Err(IntegrityError::LengthMismatch {
                len: self.len,
                counted,
            });
        }

        Ok(())
    }

    /// Verifies that every key lies between the keys of its ancestors, and between `lower` and
    /// `upper` where given.
    ///
    /// Bounds are exclusive, or inclusive when the tree allows duplicates.
    pub fn check_order(
        &self,
        lower: Option<&T::Key>,
        upper: Option<&T::Key>,
    ) -> Result<(), IntegrityError> {
        self.check_order_at(self.root, lower, upper)
    }

    fn check_order_at<'a>(
        &'a self,
        opt_node: Link<T>,
        lower: Option<&'a T::Key>,
        upper: Option<&'a T::Key>,
    ) -> Result<(), IntegrityError> {
        let Some(node) = opt_node else {
            return Ok(());
        };

        let key: &'a T::Key = unsafe { node.as_ref().key() };
        let inclusive = self.config.allows_duplicates();

        let above_lower = lower.map_or(true, |lower| {
            if inclusive {
                key >= lower
            } else {
                key > lower
            }
        });
        let below_upper = upper.map_or(true, |upper| {
            if inclusive {
                key <= upper
            } else {
                key < upper
            }
        });

        if !above_lower || !below_upper {
            return Err(IntegrityError::OutOfOrder {
                key: describe(node),
            });
        }

        unsafe {
            self.check_order_at(self.links(node).left(), lower, Some(key))?;
            self.check_order_at(self.links(node).right(), Some(key), upper)
        }
    }

    /// Recomputes the height of every subtree, verifying the balance factor cached at each node.
    ///
    /// Returns the height of the tree; an empty tree has height 0.
    pub fn check_height(&self) -> Result<usize, IntegrityError> {
        self.check_height_at(self.root)
    }

    fn check_height_at(&self, opt_node: Link<T>) -> Result<usize, IntegrityError> {
        let Some(node) = opt_node else {
            return Ok(0);
        };

        let links = unsafe { self.links(node) };
        let left = self.check_height_at(links.left())?;
        let right = self.check_height_at(links.right())?;

        let actual = right as isize - left as isize;
        if !(-1..=1).contains(&actual) {
            return Err(IntegrityError::Unbalanced {
                key: describe(node),
                left,
                right,
            });
        }

        let cached = links.balance().factor();
        if cached as isize != actual {
            return Err(IntegrityError::BalanceMismatch {
                key: describe(node),
                cached,
                actual,
            });
        }

        Ok(1 + left.max(right))
    }

    /// Verifies that every child links back to its parent and that the root has no parent.
    pub fn check_links(&self) -> Result<(), IntegrityError> {
        let Some(root) = self.root else {
            return Ok(());
        };

        if unsafe { self.links(root).parent() }.is_some() {
            return Err(IntegrityError::BrokenParentLink {
                key: describe(root),
            });
        }

        self.check_links_at(root)
    }

    fn check_links_at(&self, node: NonNull<T>) -> Result<(), IntegrityError> {
        let links = unsafe { self.links(node) };

        for child in [links.left(), links.right()].into_iter().flatten() {
            if unsafe { self.links(child).parent() } != Some(node) {
                return Err(IntegrityError::BrokenParentLink {
                    key: describe(node),
                });
            }

            self.check_links_at(child)?;
        }

        Ok(())
    }

    /// Verifies that the cached minimum, if enabled, is the leftmost node.
    pub fn check_min(&self) -> Result<(), IntegrityError> {
        if !self.config.caches_min() {
            return Ok(());
        }

        let leftmost = self.root.map(|root| unsafe { self.min_in_subtree(root).0 });
        if leftmost != self.min {
            return Err(IntegrityError::StaleMinimum {
                cached: self.min.map(describe),
                actual: leftmost.map(describe),
            });
        }

        Ok(())
    }
}
