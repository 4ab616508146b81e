//! Error types for replica operations
//!
//! Every error aborts the whole call; nothing is written to the destination
//! once one is returned.

use crate::selector::SelectorError;

/// Errors during partial copy and copy-on-change
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicaError {
    /// A selector path could not be compiled
    #[error("malformed selector: {0}")]
    MalformedSelector(#[from] SelectorError),

    /// Destination and source root types differ
    #[error("type mismatch: destination is {expected}, source is {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Destination required but absent
    #[error("destination must be present")]
    MissingDestination,

    /// Selector descends into a value without fields
    #[error("cannot descend into '{path}': {type_name} has no selectable fields")]
    NotTraversable {
        path: String,
        type_name: &'static str,
    },
}

impl ReplicaError {
    /// Create type mismatch error from the two root type names
    #[must_use]
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Create not-traversable error for a walk position
    pub fn not_traversable(path: impl Into<String>, type_name: &'static str) -> Self {
        Self::NotTraversable {
            path: path.into(),
            type_name,
        }
    }
}

/// Convenience result alias
pub type Result<T, E = ReplicaError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_error_converts() {
        let err: ReplicaError = SelectorError::EmptyPath { index: 3 }.into();
        assert!(matches!(
            err,
            ReplicaError::MalformedSelector(SelectorError::EmptyPath { index: 3 })
        ));
        assert_eq!(err.to_string(), "malformed selector: selector #3 is empty");
    }

    #[test]
    fn not_traversable_message() {
        let err = ReplicaError::not_traversable("meta.name", "alloc::string::String");
        assert_eq!(
            err.to_string(),
            "cannot descend into 'meta.name': alloc::string::String has no selectable fields"
        );
    }
}
