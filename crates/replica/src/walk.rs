//! Structural walker
//!
//! Applies a compiled [`SelectorTree`] to object graphs in two modes:
//!
//! - **Partial copy** ([`copy_selected`]): builds a fresh value of the
//!   source's type with only the selected fields populated
//! - **Copy-on-change** ([`copy_changed`]): overwrites only the selected
//!   destination fields that differ from the source
//!
//! Both modes descend through references, apply the same sub-tree to every
//! sequence element and stop at terminal selectors, which are copied or
//! compared as a whole.

use crate::error::{ReplicaError, Result};
use crate::node::{Node, Shape, ShapeMut};
use crate::trace::{TracePath, Tracer};
use crate::tree::SelectorTree;

macro_rules! trace_line {
    ($walker:expr, $($arg:tt)*) => {
        if $walker.tracer.enabled() {
            $walker.tracer.printf_ln(format_args!($($arg)*));
        }
    };
}

/// Recursive walker over a pair of nodes
struct Walker<'t> {
    tracer: &'t dyn Tracer,
}

impl<'t> Walker<'t> {
    fn new(tracer: &'t dyn Tracer) -> Self {
        Self { tracer }
    }

    /// Populate `out` (a default value) with the selected fields of `src`
    fn select(
        &self,
        out: &mut dyn Node,
        src: &dyn Node,
        tree: &SelectorTree,
        at: &TracePath,
    ) -> Result<bool> {
        let (out_type, src_type) = (out.type_name(), src.type_name());

        match (out.shape_mut(), src.shape()) {
            (ShapeMut::Reference(out_ref), Shape::Reference(target)) => {
                let Some(target) = target else {
                    trace_line!(self, "[{}] {at}: absent reference, stop", tree.depth());
                    return Ok(false);
                };
                self.select(out_ref.target_or_insert(), target, tree, at)
            }
            (ShapeMut::Sequence(out_seq), Shape::Sequence(src_seq)) => {
                out_seq.resize_default(src_seq.len());
                let mut copied = false;
                for i in 0..src_seq.len() {
                    if let (Some(out_elem), Some(src_elem)) =
                        (out_seq.element_mut(i), src_seq.element(i))
                    {
                        copied |= self.select(out_elem, src_elem, tree, &at.index(i))?;
                    }
                }
                Ok(copied)
            }
            (ShapeMut::Record(out_rec), Shape::Record(src_rec)) => {
                let mut copied = false;
                for (name, branch) in tree.branches() {
                    let here = at.field(name);
                    let (Some(out_field), Some(src_field)) =
                        (out_rec.field_mut(name), src_rec.field(name))
                    else {
                        trace_line!(self, "[{}] {here}: no such field, skipped", branch.depth());
                        continue;
                    };

                    if !branch.is_terminal() {
                        copied |= self.select(out_field, src_field, branch, &here)?;
                    } else if src_field.is_zero() {
                        trace_line!(self, "[{}] {here}: zero value, skipped", branch.depth());
                    } else {
                        assign(out_field, src_field)?;
                        trace_line!(self, "[{}] {here}: copied", branch.depth());
                        copied = true;
                    }
                }
                Ok(copied)
            }
            (_, Shape::Leaf) => Err(ReplicaError::not_traversable(at.to_string(), src_type)),
            _ => Err(ReplicaError::type_mismatch(out_type, src_type)),
        }
    }

    /// Overwrite the selected fields of `dst` that differ from `src`
    fn diff(
        &self,
        dst: &mut dyn Node,
        src: &dyn Node,
        tree: &SelectorTree,
        at: &TracePath,
    ) -> Result<bool> {
        let (dst_type, src_type) = (dst.type_name(), src.type_name());

        match (dst.shape_mut(), src.shape()) {
            (ShapeMut::Reference(dst_ref), Shape::Reference(target)) => {
                let Some(target) = target else {
                    trace_line!(self, "[{}] {at}: absent reference, stop", tree.depth());
                    return Ok(false);
                };
                self.diff(dst_ref.target_or_insert(), target, tree, at)
            }
            (ShapeMut::Sequence(dst_seq), Shape::Sequence(src_seq)) => {
                let mut changed = false;
                if dst_seq.len() != src_seq.len() {
                    trace_line!(
                        self,
                        "[{}] {at}: resized {} -> {}",
                        tree.depth(),
                        dst_seq.len(),
                        src_seq.len()
                    );
                    dst_seq.resize_default(src_seq.len());
                    changed = true;
                }
                for i in 0..src_seq.len() {
                    if let (Some(dst_elem), Some(src_elem)) =
                        (dst_seq.element_mut(i), src_seq.element(i))
                    {
                        changed |= self.diff(dst_elem, src_elem, tree, &at.index(i))?;
                    }
                }
                Ok(changed)
            }
            (ShapeMut::Record(dst_rec), Shape::Record(src_rec)) => {
                let mut changed = false;
                for (name, branch) in tree.branches() {
                    let here = at.field(name);
                    let (Some(dst_field), Some(src_field)) =
                        (dst_rec.field_mut(name), src_rec.field(name))
                    else {
                        trace_line!(self, "[{}] {here}: no such field, skipped", branch.depth());
                        continue;
                    };

                    if !branch.is_terminal() {
                        changed |= self.diff(dst_field, src_field, branch, &here)?;
                    } else if dst_field.value_eq(src_field.as_any()) {
                        trace_line!(self, "[{}] {here}: unchanged", branch.depth());
                    } else {
                        assign(dst_field, src_field)?;
                        trace_line!(self, "[{}] {here}: changed", branch.depth());
                        changed = true;
                    }
                }
                Ok(changed)
            }
            (_, Shape::Leaf) => Err(ReplicaError::not_traversable(at.to_string(), src_type)),
            _ => Err(ReplicaError::type_mismatch(dst_type, src_type)),
        }
    }
}

/// Deep-copy a terminal field
fn assign(dst: &mut dyn Node, src: &dyn Node) -> Result<()> {
    if dst.assign_from(src.as_any()) {
        Ok(())
    } else {
        Err(ReplicaError::type_mismatch(dst.type_name(), src.type_name()))
    }
}

/// Fail unless both roots have the same concrete type
pub(crate) fn ensure_same_type(dst: &dyn Node, src: &dyn Node) -> Result<()> {
    if dst.as_any().type_id() == src.as_any().type_id() {
        Ok(())
    } else {
        Err(ReplicaError::type_mismatch(dst.type_name(), src.type_name()))
    }
}

/// Build a fresh value holding only the selected fields of `src`
///
/// Returns the new value and whether any field was copied. Fields that are
/// not selected, or whose source value is zero, keep their default.
///
/// # Errors
/// Returns [`ReplicaError::NotTraversable`] if a selector descends into a
/// leaf value
pub fn copy_selected<T>(src: &T, tree: &SelectorTree, tracer: &dyn Tracer) -> Result<(T, bool)>
where
    T: Node + Clone + PartialEq + Default,
{
    let mut out = T::default();
    let copied = Walker::new(tracer).select(&mut out, src, tree, &TracePath::root())?;
    Ok((out, copied))
}

/// Type-erased [`copy_selected`]
///
/// # Errors
/// Same as [`copy_selected`]
pub fn copy_selected_dyn(
    src: &dyn Node,
    tree: &SelectorTree,
    tracer: &dyn Tracer,
) -> Result<(Box<dyn Node>, bool)> {
    let mut out = src.boxed_default();
    let copied = Walker::new(tracer).select(&mut *out, src, tree, &TracePath::root())?;
    Ok((out, copied))
}

/// Overwrite the selected fields of `dst` that differ from `src`
///
/// Returns whether anything changed. The walk runs against a staged copy of
/// `dst` that is committed only when it succeeds and something changed, so
/// `dst` is untouched on error or when nothing differs.
///
/// # Errors
/// Returns [`ReplicaError::NotTraversable`] if a selector descends into a
/// leaf value
pub fn copy_changed<T>(
    dst: &mut T,
    src: &T,
    tree: &SelectorTree,
    tracer: &dyn Tracer,
) -> Result<bool>
where
    T: Node + Clone + PartialEq + Default,
{
    let mut staged = dst.clone();
    let changed = Walker::new(tracer).diff(&mut staged, src, tree, &TracePath::root())?;
    if changed {
        *dst = staged;
    }
    Ok(changed)
}

/// Type-erased [`copy_changed`]
///
/// # Errors
/// Returns [`ReplicaError::TypeMismatch`] if `dst` and `src` have different
/// types, plus the errors of [`copy_changed`]
pub fn copy_changed_dyn(
    dst: &mut dyn Node,
    src: &dyn Node,
    tree: &SelectorTree,
    tracer: &dyn Tracer,
) -> Result<bool> {
    ensure_same_type(dst, src)?;

    let mut staged = dst.boxed_clone();
    let changed = Walker::new(tracer).diff(&mut *staged, src, tree, &TracePath::root())?;
    if changed && !dst.assign_boxed(staged) {
        return Err(ReplicaError::type_mismatch(dst.type_name(), src.type_name()));
    }
    Ok(changed)
}
