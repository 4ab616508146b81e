//! Structural accessor over object graphs
//!
//! Every type taking part in a replica walk implements [`Node`], which exposes
//! the value as one of a closed set of shapes:
//!
//! - **Reference**: optional indirection (`Option<T>`); `Box<T>` is transparent
//! - **Sequence**: ordered homogeneous elements (`Vec<T>`)
//! - **Record**: named fields, generated by `#[derive(Node)]`
//! - **Leaf**: scalars, strings, maps and sets; atomic to the walker
//!
//! Copy, comparison and zero-value checks go through [`Value`], which is
//! implemented automatically for every `Node` that is
//! `Clone + PartialEq + Default + Debug`.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

/// Type-erased value operations
///
/// Blanket-implemented for every [`Node`]; never implement it by hand.
pub trait Value: Any + Debug {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Upcast an owned box for downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Name of the concrete type
    fn type_name(&self) -> &'static str;

    /// Value equality against a value of possibly another type
    ///
    /// Values of different types are never equal.
    fn value_eq(&self, other: &dyn Any) -> bool;

    /// True if the value equals its type's default
    ///
    /// For maps and sets this is emptiness.
    fn is_zero(&self) -> bool;

    /// Replace `self` with a deep copy of `other`
    ///
    /// Returns false (and leaves `self` untouched) when the types differ.
    fn assign_from(&mut self, other: &dyn Any) -> bool;

    /// Replace `self` with an owned value of the same type
    ///
    /// Returns false when the types differ.
    fn assign_boxed(&mut self, other: Box<dyn Node>) -> bool;

    /// Deep copy into a new box
    fn boxed_clone(&self) -> Box<dyn Node>;

    /// Fresh default value of the same type
    fn boxed_default(&self) -> Box<dyn Node>;

    /// Reset to the type's default
    fn reset(&mut self);
}

impl<T> Value for T
where
    T: Node + Clone + PartialEq + Default,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    #[inline]
    fn value_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        *self == T::default()
    }

    fn assign_from(&mut self, other: &dyn Any) -> bool {
        match other.downcast_ref::<T>() {
            Some(other) => {
                self.clone_from(other);
                true
            }
            None => false,
        }
    }

    fn assign_boxed(&mut self, other: Box<dyn Node>) -> bool {
        match other.into_any().downcast::<T>() {
            Ok(other) => {
                *self = *other;
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    fn boxed_clone(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }

    #[inline]
    fn boxed_default(&self) -> Box<dyn Node> {
        Box::new(T::default())
    }

    #[inline]
    fn reset(&mut self) {
        *self = T::default();
    }
}

/// Structural view of a value taking part in a walk
///
/// Implemented for common std types here and for structs through
/// `#[derive(Node)]`.
pub trait Node: Value {
    /// Read-only shape
    fn shape(&self) -> Shape<'_>;

    /// Mutable shape
    fn shape_mut(&mut self) -> ShapeMut<'_>;
}

/// Read-only shape of a node
#[derive(Clone, Copy)]
pub enum Shape<'a> {
    /// Optional indirection; `None` when absent
    Reference(Option<&'a dyn Node>),
    /// Ordered homogeneous elements
    Sequence(&'a dyn SequenceNode),
    /// Named fields
    Record(&'a dyn RecordNode),
    /// Atomic value
    Leaf,
}

/// Mutable shape of a node
pub enum ShapeMut<'a> {
    /// Optional indirection
    Reference(&'a mut dyn ReferenceNode),
    /// Ordered homogeneous elements
    Sequence(&'a mut dyn SequenceNode),
    /// Named fields
    Record(&'a mut dyn RecordNode),
    /// Atomic value
    Leaf,
}

impl Shape<'_> {
    /// Short shape name for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reference(_) => "reference",
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
            Self::Leaf => "leaf",
        }
    }
}

/// Record accessor: field lookup by name
pub trait RecordNode {
    /// Field by selector name
    fn field(&self, name: &str) -> Option<&dyn Node>;

    /// Mutable field by selector name
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Node>;
}

/// Sequence accessor
pub trait SequenceNode {
    /// Number of elements
    fn len(&self) -> usize;

    /// Check if there are no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`
    fn element(&self, index: usize) -> Option<&dyn Node>;

    /// Mutable element at `index`
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Node>;

    /// Truncate, or extend with default elements, to `len`
    fn resize_default(&mut self, len: usize);
}

/// Mutable optional reference accessor
pub trait ReferenceNode {
    /// Target, if present
    fn target(&self) -> Option<&dyn Node>;

    /// Mutable target, if present
    fn target_mut(&mut self) -> Option<&mut dyn Node>;

    /// Mutable target, allocating a default one when absent
    fn target_or_insert(&mut self) -> &mut dyn Node;
}

impl<T> Node for Option<T>
where
    T: Node + Clone + PartialEq + Default,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Reference(self.as_ref().map(|t| t as &dyn Node))
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Reference(self)
    }
}

impl<T> ReferenceNode for Option<T>
where
    T: Node + Clone + PartialEq + Default,
{
    fn target(&self) -> Option<&dyn Node> {
        self.as_ref().map(|t| t as &dyn Node)
    }

    fn target_mut(&mut self) -> Option<&mut dyn Node> {
        self.as_mut().map(|t| t as &mut dyn Node)
    }

    fn target_or_insert(&mut self) -> &mut dyn Node {
        self.get_or_insert_with(T::default)
    }
}

impl<T> Node for Box<T>
where
    T: Node + Clone + PartialEq + Default,
{
    #[inline]
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        (**self).shape_mut()
    }
}

impl<T> Node for Vec<T>
where
    T: Node + Clone + PartialEq + Default,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Sequence(self)
    }
}

impl<T> SequenceNode for Vec<T>
where
    T: Node + Clone + PartialEq + Default,
{
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Node> {
        self.get(index).map(|t| t as &dyn Node)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        self.get_mut(index).map(|t| t as &mut dyn Node)
    }

    fn resize_default(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

macro_rules! leaf_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                #[inline]
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf
                }

                #[inline]
                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    ShapeMut::Leaf
                }
            }
        )*
    };
}

leaf_node!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
);

impl<K, V, S> Node for HashMap<K, V, S>
where
    K: Eq + Hash + Clone + Debug + 'static,
    V: PartialEq + Clone + Debug + 'static,
    S: BuildHasher + Clone + Default + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Leaf
    }
}

impl<K, V> Node for BTreeMap<K, V>
where
    K: Ord + Clone + Debug + 'static,
    V: PartialEq + Clone + Debug + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Leaf
    }
}

impl<T, S> Node for HashSet<T, S>
where
    T: Eq + Hash + Clone + Debug + 'static,
    S: BuildHasher + Clone + Default + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Leaf
    }
}

impl<T> Node for BTreeSet<T>
where
    T: Ord + Clone + Debug + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_value_ops() {
        let mut a = 5_i64;
        assert!(!a.is_zero());
        assert!(a.value_eq(&5_i64));
        assert!(!a.value_eq(&5_i32));
        assert!(a.assign_from(&7_i64));
        assert_eq!(a, 7);
        assert!(!a.assign_from(&"text"));
        assert_eq!(a, 7);
        a.reset();
        assert!(a.is_zero());
    }

    #[test]
    fn map_zero_is_emptiness() {
        let mut labels: HashMap<String, String> = HashMap::new();
        assert!(labels.is_zero());
        labels.insert("app".into(), "web".into());
        assert!(!labels.is_zero());
        assert!(matches!(labels.shape(), Shape::Leaf));
    }

    #[test]
    fn option_is_reference() {
        let mut value: Option<Box<u16>> = None;
        assert!(matches!(value.shape(), Shape::Reference(None)));

        let ShapeMut::Reference(reference) = value.shape_mut() else {
            panic!("expected reference shape");
        };
        assert!(reference.target().is_none());
        assert!(reference.target_or_insert().assign_from(&Box::new(80_u16)));
        assert_eq!(value, Some(Box::new(80)));
    }

    #[test]
    fn box_is_transparent() {
        let boxed = Box::new(vec![1_u8, 2, 3]);
        let Shape::Sequence(seq) = boxed.shape() else {
            panic!("expected sequence shape");
        };
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn vec_resize_default() {
        let mut items = vec![String::from("a"), String::from("b")];
        let ShapeMut::Sequence(seq) = items.shape_mut() else {
            panic!("expected sequence shape");
        };
        seq.resize_default(3);
        assert_eq!(seq.len(), 3);
        assert!(seq.element(2).is_some_and(|e| e.is_zero()));
        seq.resize_default(1);
        assert_eq!(items, vec![String::from("a")]);
    }

    #[test]
    fn boxed_clone_is_deep() {
        let original = vec![Some(Box::new(String::from("x")))];
        let copy = original.boxed_clone();
        let mut target: Vec<Option<Box<String>>> = Vec::new();
        assert!(target.assign_boxed(copy));
        assert_eq!(target, original);

        if let Some(Some(s)) = target.get_mut(0) {
            s.push('y');
        }
        assert_eq!(original[0].as_deref().map(String::as_str), Some("x"));
    }

    #[test]
    fn boxed_default_matches_type() {
        let v = 3.5_f64;
        let fresh = v.boxed_default();
        assert!(fresh.is_zero());
        assert_eq!(fresh.type_name(), "f64");
    }
}
