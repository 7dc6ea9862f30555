/// How [`AvlTree::insert`](crate::AvlTree::insert) treats an item whose key equals the key of an
/// item already in the tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Duplicates {
    /// The new item takes the existing item's place, and the existing item is handed back to the
    /// caller.
    #[default]
    Replace,
    /// Both items are kept. Equal keys are ordered by insertion: each new one is placed after the
    /// equal keys already present.
    Allow,
}

/// Construction-time settings of an [`AvlTree`](crate::AvlTree).
///
/// ```
/// use cordyceps_avl::{Config, Duplicates};
///
/// let config = Config::new().duplicates(Duplicates::Allow).cache_min(false);
/// assert!(config.allows_duplicates());
/// assert!(!config.caches_min());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    duplicates: Duplicates,
    cache_min: bool,
}

impl Config {
    /// Returns the default configuration: duplicates replace, minimum cached.
    pub const fn new() -> Config {
        Config {
            duplicates: Duplicates::Replace,
            cache_min: true,
        }
    }

    /// Sets how equal keys are handled on insertion.
    #[must_use]
    pub const fn duplicates(mut self, duplicates: Duplicates) -> Config {
        self.duplicates = duplicates;
        self
    }

    /// Sets whether the tree keeps a pointer to its minimum element, making
    /// [`AvlTree::first`](crate::AvlTree::first) _O(1)_.
    #[must_use]
    pub const fn cache_min(mut self, enabled: bool) -> Config {
        self.cache_min = enabled;
        self
    }

    pub const fn duplicates_mode(&self) -> Duplicates {
        self.duplicates
    }

    pub const fn allows_duplicates(&self) -> bool {
        matches!(self.duplicates, Duplicates::Allow)
    }

    pub const fn caches_min(&self) -> bool {
        self.cache_min
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
