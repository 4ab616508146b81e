//! Selector paths for addressing fields within object graphs
//!
//! Provides [`SelectorPath`] for dotted field addressing and [`SelectorSet`]
//! for lists of selectors loaded from configuration.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path of field names selecting one field of an object graph
///
/// Hierarchical structure using string segments, always non-empty and free of
/// empty segments.
///
/// # Examples
/// - `["spec", "containers", "name"]` → `spec.containers.name`
/// - `["metadata", "labels"]` → `metadata.labels`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SelectorPath(Vec<String>);

impl SelectorPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if there are no segments or any segment is empty
    pub fn new(segments: Vec<String>) -> Result<Self, SelectorError> {
        if segments.is_empty() {
            return Err(SelectorError::EmptyPath { index: 0 });
        }
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(SelectorError::EmptySegment {
                path: segments.join("."),
                position,
            });
        }
        Ok(Self(segments))
    }

    /// Parse the `index`th entry of a selector list
    ///
    /// Same as [`FromStr`] but reports the list position of an empty path.
    ///
    /// # Errors
    /// Returns error if the path is empty or contains an empty segment
    pub fn parse_indexed(s: &str, index: usize) -> Result<Self, SelectorError> {
        if s.is_empty() {
            return Err(SelectorError::EmptyPath { index });
        }

        let segments = s
            .split('.')
            .enumerate()
            .map(|(position, seg)| {
                if seg.is_empty() {
                    Err(SelectorError::EmptySegment {
                        path: s.to_string(),
                        position,
                    })
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for SelectorPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for SelectorPath {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_indexed(s, 0)
    }
}

impl TryFrom<String> for SelectorPath {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SelectorPath> for String {
    fn from(path: SelectorPath) -> Self {
        path.to_string()
    }
}

/// Ordered list of selector paths
///
/// Deserializes from a plain list of dotted strings, so selector sets can be
/// kept in JSON or YAML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorSet(Vec<SelectorPath>);

impl SelectorSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse every path of a list
    ///
    /// # Errors
    /// Returns the first malformed path, tagged with its list index
    pub fn parse<S: AsRef<str>>(paths: &[S]) -> Result<Self, SelectorError> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| SelectorPath::parse_indexed(path.as_ref(), index))
            .collect::<Result<_, _>>()
            .map(Self)
    }

    /// Number of paths
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no path is selected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over paths in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SelectorPath> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a SelectorSet {
    type Item = &'a SelectorPath;
    type IntoIter = std::slice::Iter<'a, SelectorPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors related to selector paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// Empty path in a selector list
    #[error("selector #{index} is empty")]
    EmptyPath { index: usize },

    /// Empty segment in path
    #[error("selector '{path}' contains an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    /// Field selected both as a whole and as a prefix of nested fields
    #[error("selector '{path}' is selected both as a whole field and as a prefix of nested fields")]
    Conflict { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_new_and_segments() {
        let path = SelectorPath::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(path.segments(), &["a", "b"]);
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
    }

    #[test]
    fn path_new_rejects_no_segments() {
        let result = SelectorPath::new(Vec::new());
        assert_eq!(result, Err(SelectorError::EmptyPath { index: 0 }));
    }

    #[test]
    fn path_display_round_trips() {
        let path: SelectorPath = "spec.containers.ports.name".parse().unwrap();
        assert_eq!(path.to_string(), "spec.containers.ports.name");
        assert_eq!(path.iter().count(), 4);
    }

    #[test]
    fn path_from_str_empty() {
        let result: Result<SelectorPath, _> = "".parse();
        assert_eq!(result, Err(SelectorError::EmptyPath { index: 0 }));
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<SelectorPath, _> = "a..b".parse();
        assert_eq!(
            result,
            Err(SelectorError::EmptySegment {
                path: "a..b".to_string(),
                position: 1,
            })
        );
        assert!(matches!(
            ".a".parse::<SelectorPath>(),
            Err(SelectorError::EmptySegment { position: 0, .. })
        ));
        assert!(matches!(
            "a.".parse::<SelectorPath>(),
            Err(SelectorError::EmptySegment { position: 1, .. })
        ));
    }

    #[test]
    fn set_parse_reports_index() {
        let result = SelectorSet::parse(&["a", "b.c", ""]);
        assert_eq!(result, Err(SelectorError::EmptyPath { index: 2 }));

        let set = SelectorSet::parse(&["a", "b.c"]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn set_from_json() {
        let set: SelectorSet =
            serde_json::from_str(r#"["metadata.name", "spec.replicas"]"#).unwrap();
        let paths: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["metadata.name", "spec.replicas"]);
    }

    #[test]
    fn set_from_yaml() {
        let yaml = "- metadata.labels\n- spec.init_containers.ports.name\n";
        let set: SelectorSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().nth(1).unwrap().len(), 4);
    }

    #[test]
    fn set_rejects_malformed_entry() {
        let result: Result<SelectorSet, _> = serde_json::from_str(r#"["a", "b..c"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn path_serializes_as_dotted_string() {
        let path: SelectorPath = "a.b".parse().unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""a.b""#);
    }
}
