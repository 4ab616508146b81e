//! Selector tree compiled from dotted paths
//!
//! Provides [`SelectorTree`], a prefix tree of field names. Each level of the
//! tree corresponds to one level of the object graph; nodes without branches
//! are terminal selections copied or compared as a whole.

use crate::selector::{SelectorError, SelectorPath, SelectorSet};
use std::collections::btree_map::{self, BTreeMap};

/// Prefix tree of selected field names
///
/// # Invariants
/// - A node with zero branches is a terminal selector
/// - No terminal is also a prefix of another selected path
/// - Immutable once compiled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTree {
    branches: BTreeMap<String, SelectorTree>,
    depth: usize,
}

impl SelectorTree {
    /// Create empty root tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(0)
    }

    #[inline]
    fn with_depth(depth: usize) -> Self {
        Self {
            branches: BTreeMap::new(),
            depth,
        }
    }

    /// Compile a list of dotted paths
    ///
    /// Paths sharing a prefix merge into shared branches; duplicates are
    /// idempotent.
    ///
    /// # Errors
    /// Returns error if a path is empty, has an empty segment, or selects a
    /// field both as a whole and as a prefix of a longer path
    pub fn compile<S: AsRef<str>>(paths: &[S]) -> Result<Self, SelectorError> {
        Self::from_set(&SelectorSet::parse(paths)?)
    }

    /// Compile an already parsed selector set
    ///
    /// # Errors
    /// Returns error on terminal/prefix conflicts
    pub fn from_set(set: &SelectorSet) -> Result<Self, SelectorError> {
        let mut tree = Self::new();
        for path in set {
            tree.insert(path)?;
        }
        tracing::trace!(paths = set.len(), terminals = tree.len(), "compiled selector tree");
        Ok(tree)
    }

    /// Insert one path, following existing branches where present
    fn insert(&mut self, path: &SelectorPath) -> Result<(), SelectorError> {
        let last = path.len() - 1;
        let mut cur = self;

        for (i, segment) in path.iter().enumerate() {
            let depth = cur.depth + 1;
            cur = match cur.branches.entry(segment.to_string()) {
                btree_map::Entry::Occupied(entry) => {
                    let node = entry.into_mut();
                    // an existing terminal cannot grow children, an existing
                    // prefix cannot become terminal
                    let conflict = if i == last {
                        !node.is_terminal()
                    } else {
                        node.is_terminal()
                    };
                    if conflict {
                        return Err(SelectorError::Conflict {
                            path: path.segments()[..=i].join("."),
                        });
                    }
                    node
                }
                btree_map::Entry::Vacant(entry) => entry.insert(Self::with_depth(depth)),
            };
        }

        Ok(())
    }

    /// Find child branch by field name
    #[inline]
    #[must_use]
    pub fn branch(&self, name: &str) -> Option<&Self> {
        self.branches.get(name)
    }

    /// Iterate over `(field name, sub-tree)` pairs
    #[inline]
    pub fn branches(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.branches.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    /// Check if this node selects its field as a whole
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.branches.is_empty()
    }

    /// Hierarchy level, root is 0
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of terminal selections below this node
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches
            .values()
            .map(|b| if b.is_terminal() { 1 } else { b.len() })
            .sum()
    }

    /// Check if nothing is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// List terminal paths in sorted order
    #[must_use]
    pub fn paths(&self) -> Vec<SelectorPath> {
        let mut out = Vec::new();
        self.collect_paths(&mut Vec::new(), &mut out);
        out
    }

    fn collect_paths(&self, prefix: &mut Vec<String>, out: &mut Vec<SelectorPath>) {
        for (name, branch) in &self.branches {
            prefix.push(name.clone());
            if branch.is_terminal() {
                out.extend(SelectorPath::new(prefix.clone()));
            } else {
                branch.collect_paths(prefix, out);
            }
            prefix.pop();
        }
    }
}

impl TryFrom<&SelectorSet> for SelectorTree {
    type Error = SelectorError;

    fn try_from(set: &SelectorSet) -> Result<Self, Self::Error> {
        Self::from_set(set)
    }
}
