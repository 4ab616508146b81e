//! Replicators and convenience entry points
//!
//! A replicator owns a compiled [`SelectorTree`] so one selector set can be
//! applied to many object pairs. [`partial`], [`on_change`] and
//! [`on_change_traced`] compile the selectors for a single call.

use crate::error::{ReplicaError, Result};
use crate::node::Node;
use crate::selector::SelectorSet;
use crate::trace::{NoopTracer, Tracer};
use crate::tree::SelectorTree;
use crate::walk::{
    copy_changed, copy_changed_dyn, copy_selected, copy_selected_dyn, ensure_same_type,
};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Copies only the selected fields into a destination
///
/// The destination is replaced by a fresh value holding the selected,
/// non-zero source fields, and only when at least one field was copied.
#[derive(Clone)]
pub struct PartialReplicator {
    tree: SelectorTree,
    tracer: Arc<dyn Tracer>,
}

impl PartialReplicator {
    /// Compile a replicator from dotted paths
    ///
    /// # Errors
    /// Returns [`ReplicaError::MalformedSelector`] for invalid paths
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Result<Self> {
        Ok(Self::from_tree(SelectorTree::compile(paths)?))
    }

    /// Wrap an already compiled tree
    #[must_use]
    pub fn from_tree(tree: SelectorTree) -> Self {
        Self {
            tree,
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Compiled selectors
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &SelectorTree {
        &self.tree
    }

    /// Partial copy between two values of the same type
    ///
    /// # Errors
    /// Returns [`ReplicaError::NotTraversable`] if a selector descends into a
    /// leaf value; `dst` is untouched on error
    pub fn copy<T>(&self, dst: &mut T, src: &T) -> Result<bool>
    where
        T: Node + Clone + PartialEq + Default,
    {
        let (out, copied) = copy_selected(src, &self.tree, &*self.tracer)?;
        if copied {
            *dst = out;
        }
        Ok(copied)
    }

    /// Partial copy between type-erased values
    ///
    /// An absent source copies nothing.
    ///
    /// # Errors
    /// - [`ReplicaError::MissingDestination`] if `dst` is absent
    /// - [`ReplicaError::TypeMismatch`] if the types differ
    /// - the errors of [`PartialReplicator::copy`]
    pub fn copy_dyn(&self, dst: Option<&mut dyn Node>, src: Option<&dyn Node>) -> Result<bool> {
        let Some(src) = src else {
            return Ok(false);
        };
        let dst = dst.ok_or(ReplicaError::MissingDestination)?;
        ensure_same_type(dst, src)?;

        let (out, copied) = copy_selected_dyn(src, &self.tree, &*self.tracer)?;
        if copied && !dst.assign_boxed(out) {
            return Err(ReplicaError::type_mismatch(dst.type_name(), src.type_name()));
        }
        Ok(copied)
    }
}

impl Debug for PartialReplicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialReplicator")
            .field("tree", &self.tree)
            .field("tracing", &self.tracer.enabled())
            .finish()
    }
}

/// Copies the selected fields that differ into a destination
#[derive(Clone)]
pub struct ChangeReplicator {
    tree: SelectorTree,
    tracer: Arc<dyn Tracer>,
}

impl ChangeReplicator {
    /// Compile a replicator from dotted paths
    ///
    /// # Errors
    /// Returns [`ReplicaError::MalformedSelector`] for invalid paths
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Result<Self> {
        Ok(Self::from_tree(SelectorTree::compile(paths)?))
    }

    /// Wrap an already compiled tree
    #[must_use]
    pub fn from_tree(tree: SelectorTree) -> Self {
        Self {
            tree,
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Compiled selectors
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &SelectorTree {
        &self.tree
    }

    /// Copy-on-change between two values of the same type
    ///
    /// Returns false when every selected field already matches.
    ///
    /// # Errors
    /// Returns [`ReplicaError::NotTraversable`] if a selector descends into a
    /// leaf value; `dst` is untouched on error
    pub fn copy<T>(&self, dst: &mut T, src: &T) -> Result<bool>
    where
        T: Node + Clone + PartialEq + Default,
    {
        copy_changed(dst, src, &self.tree, &*self.tracer)
    }

    /// Copy-on-change between type-erased values
    ///
    /// An absent source changes nothing.
    ///
    /// # Errors
    /// - [`ReplicaError::MissingDestination`] if `dst` is absent
    /// - [`ReplicaError::TypeMismatch`] if the types differ
    /// - the errors of [`ChangeReplicator::copy`]
    pub fn copy_dyn(&self, dst: Option<&mut dyn Node>, src: Option<&dyn Node>) -> Result<bool> {
        let Some(src) = src else {
            return Ok(false);
        };
        let dst = dst.ok_or(ReplicaError::MissingDestination)?;
        copy_changed_dyn(dst, src, &self.tree, &*self.tracer)
    }
}

impl Debug for ChangeReplicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeReplicator")
            .field("tree", &self.tree)
            .field("tracing", &self.tracer.enabled())
            .finish()
    }
}

/// Builder for replicators
///
/// Paths are validated when the replicator is built.
#[derive(Default)]
pub struct ReplicatorBuilder {
    paths: Vec<String>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl ReplicatorBuilder {
    /// Create new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one dotted path
    #[inline]
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Add several dotted paths
    #[must_use]
    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add a parsed selector set, e.g. one loaded from configuration
    #[must_use]
    pub fn selectors(mut self, set: &SelectorSet) -> Self {
        self.paths.extend(set.iter().map(ToString::to_string));
        self
    }

    /// Set diagnostic tracer
    #[inline]
    #[must_use]
    pub fn tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Some(Arc::new(tracer));
        self
    }

    fn compile(&self) -> Result<(SelectorTree, Arc<dyn Tracer>)> {
        let tree = SelectorTree::compile(&self.paths)?;
        let tracer = self.tracer.clone().unwrap_or_else(|| Arc::new(NoopTracer));
        Ok((tree, tracer))
    }

    /// Build a partial-copy replicator
    ///
    /// # Errors
    /// Returns [`ReplicaError::MalformedSelector`] for invalid paths
    pub fn build_partial(&self) -> Result<PartialReplicator> {
        let (tree, tracer) = self.compile()?;
        Ok(PartialReplicator { tree, tracer })
    }

    /// Build a copy-on-change replicator
    ///
    /// # Errors
    /// Returns [`ReplicaError::MalformedSelector`] for invalid paths
    pub fn build_on_change(&self) -> Result<ChangeReplicator> {
        let (tree, tracer) = self.compile()?;
        Ok(ChangeReplicator { tree, tracer })
    }
}

impl Debug for ReplicatorBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicatorBuilder")
            .field("paths", &self.paths)
            .field("tracer", &self.tracer.is_some())
            .finish()
    }
}

/// Copy the selected fields of `src` into `dst`
///
/// `dst` is replaced by a fresh value holding only the selected, non-zero
/// fields of `src`, and only when at least one field was copied.
///
/// # Errors
/// - [`ReplicaError::MalformedSelector`] for invalid paths
/// - [`ReplicaError::NotTraversable`] if a selector descends into a leaf
pub fn partial<T, S>(dst: &mut T, src: &T, paths: &[S]) -> Result<bool>
where
    T: Node + Clone + PartialEq + Default,
    S: AsRef<str>,
{
    let copied = PartialReplicator::new(paths)?.copy(dst, src)?;
    tracing::debug!(selectors = paths.len(), copied, "partial copy");
    Ok(copied)
}

/// Copy the selected fields of `src` that differ into `dst`
///
/// # Errors
/// Same as [`partial`]
pub fn on_change<T, S>(dst: &mut T, src: &T, paths: &[S]) -> Result<bool>
where
    T: Node + Clone + PartialEq + Default,
    S: AsRef<str>,
{
    on_change_traced(dst, src, &NoopTracer, paths)
}

/// [`on_change`] reporting progress to `tracer`
///
/// # Errors
/// Same as [`partial`]
pub fn on_change_traced<T, S>(
    dst: &mut T,
    src: &T,
    tracer: &dyn Tracer,
    paths: &[S],
) -> Result<bool>
where
    T: Node + Clone + PartialEq + Default,
    S: AsRef<str>,
{
    let tree = SelectorTree::compile(paths)?;
    let changed = copy_changed(dst, src, &tree, tracer)?;
    tracing::debug!(selectors = paths.len(), changed, "copy on change");
    Ok(changed)
}
