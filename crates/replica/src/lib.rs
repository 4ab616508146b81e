//! Replica
//!
//! Selective structural copying and change detection over nested data,
//! driven by dotted field selectors such as `"spec.containers.ports.name"`.
//!
//! # Core Concepts
//!
//! - [`SelectorTree`]: Prefix tree compiled from dotted selector paths
//! - [`Node`]: Structural accessor (reference, sequence, record, leaf);
//!   derive it for your structs with `#[derive(Node)]`
//! - [`partial`]: New value holding only the selected fields
//! - [`on_change`]: Copy only the selected fields that differ, reporting
//!   whether anything changed
//! - [`Tracer`]: Optional diagnostic sink for walks
//!
//! # Example
//!
//! ```rust
//! use replica::Node;
//!
//! #[derive(Debug, Clone, Default, PartialEq, Node)]
//! struct Port {
//!     name: String,
//!     host_port: u16,
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq, Node)]
//! struct Container {
//!     name: String,
//!     ports: Vec<Port>,
//! }
//!
//! let src = Container {
//!     name: "web".into(),
//!     ports: vec![Port { name: "http".into(), host_port: 80 }],
//! };
//!
//! let mut dst = Container::default();
//! assert!(replica::partial(&mut dst, &src, &["ports.name"])?);
//! assert_eq!(dst.ports[0].name, "http");
//! assert_eq!(dst.ports[0].host_port, 0);
//! assert!(dst.name.is_empty());
//!
//! // nothing selected differs any more
//! assert!(!replica::on_change(&mut dst, &src, &["ports.name"])?);
//! # Ok::<(), replica::ReplicaError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// generated code names `::replica` paths
extern crate self as replica;

// Core modules
mod error;
mod node;
mod replicator;
mod selector;
mod trace;
mod tree;
mod walk;

// Re-exports
pub use error::{ReplicaError, Result};
pub use node::{Node, RecordNode, ReferenceNode, SequenceNode, Shape, ShapeMut, Value};
pub use replica_derive::Node;
pub use replicator::{
    on_change, on_change_traced, partial, ChangeReplicator, PartialReplicator, ReplicatorBuilder,
};
pub use selector::{SelectorError, SelectorPath, SelectorSet};
pub use trace::{ConsoleTracer, LogTracer, NoopTracer, TracePath, Tracer};
pub use tree::SelectorTree;
pub use walk::{copy_changed, copy_changed_dyn, copy_selected, copy_selected_dyn};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Node)]
    struct Triple {
        a: String,
        b: i64,
        c: f64,
    }

    #[test]
    fn partial_then_on_change_lifecycle() {
        let src = Triple {
            a: "x".into(),
            b: 1,
            c: 1.0,
        };

        let mut dst = Triple::default();
        assert!(partial(&mut dst, &src, &["a"]).unwrap());
        assert_eq!(
            dst,
            Triple {
                a: "x".into(),
                b: 0,
                c: 0.0
            }
        );

        let mut existing = Triple {
            a: "x".into(),
            b: 5,
            c: 5.0,
        };
        let before = existing.clone();
        assert!(!on_change(&mut existing, &src, &["a"]).unwrap());
        assert_eq!(existing, before);
    }

    #[test]
    fn selector_and_tree_integration() {
        let path: SelectorPath = "spec.containers.ports".parse().unwrap();
        assert_eq!(path.len(), 3);

        let tree = SelectorTree::compile(&[path.to_string()]).unwrap();
        assert_eq!(tree.paths(), vec![path]);
    }
}
