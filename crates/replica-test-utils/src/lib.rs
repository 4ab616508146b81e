//! Testing utilities for the replica workspace
//!
//! Shared fixtures, a recording tracer, and pod-shaped object graphs.

#![allow(missing_docs)]

use parking_lot::Mutex;
use replica::{Node, Tracer};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct Simple {
    pub field_a: String,
    pub field_b: i64,
    pub field_c: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct WithSliceOfPointers {
    pub string_a: String,
    pub int_a: i64,
    pub slice_a: Vec<Option<Box<Simple>>>,
    pub replicas: Option<Box<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct Probe {
    pub initial_delay_seconds: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct ContainerPort {
    pub name: String,
    pub host_ip: String,
    pub host_port: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct Container {
    pub name: String,
    pub liveness_probe: Option<Box<Probe>>,
    pub ports: Vec<ContainerPort>,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct PodSecurityContext {
    pub run_as_non_root: Option<Box<bool>>,
    pub run_as_user: Option<Box<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct PodSpec {
    pub init_containers: Vec<Container>,
    pub security_context: Option<Box<PodSecurityContext>>,
}

#[derive(Debug, Clone, Default, PartialEq, Node)]
pub struct Pod {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

pub fn create_simple() -> Simple {
    Simple {
        field_a: "FieldA".to_string(),
        field_b: 101,
        field_c: 9.9,
    }
}

pub fn create_simple_with(field_a: &str, field_b: i64, field_c: f32) -> Simple {
    Simple {
        field_a: field_a.to_string(),
        field_b,
        field_c,
    }
}

pub fn create_with_slice_of_pointers() -> WithSliceOfPointers {
    WithSliceOfPointers {
        string_a: "StringA".to_string(),
        int_a: 101,
        slice_a: vec![
            Some(Box::new(create_simple_with("SliceA", 102, 91.9))),
            Some(Box::new(create_simple_with("SliceB", 101, 9.9))),
        ],
        replicas: Some(Box::new(1)),
    }
}

fn create_container(name: &str, delay: i32, ports: &[(&str, &str, i32)]) -> Container {
    Container {
        name: name.to_string(),
        liveness_probe: Some(Box::new(Probe {
            initial_delay_seconds: delay,
        })),
        ports: ports
            .iter()
            .map(|(name, host_ip, host_port)| ContainerPort {
                name: (*name).to_string(),
                host_ip: (*host_ip).to_string(),
                host_port: *host_port,
            })
            .collect(),
    }
}

pub fn create_pod() -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: "podA".to_string(),
            namespace: "namespaceA".to_string(),
            labels: BTreeMap::from([("A".to_string(), "B".to_string())]),
        },
        spec: PodSpec {
            init_containers: vec![
                create_container("containerA", 121, &[("port-81", "1.1.1.1", 81)]),
                create_container(
                    "containerB",
                    122,
                    &[("port-80", "2.2.2.2", 80), ("port-32767", "2.2.2.2", 32767)],
                ),
                create_container("containerC", 125, &[("port-82", "3.3.3.3", 82)]),
            ],
            security_context: Some(Box::new(PodSecurityContext {
                run_as_non_root: Some(Box::new(false)),
                run_as_user: Some(Box::new(10)),
            })),
        },
    }
}

/// Tracer keeping every line in memory
#[derive(Debug, Default)]
pub struct RecordingTracer {
    lines: Mutex<Vec<String>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl Tracer for RecordingTracer {
    fn println(&self, values: &[&dyn Display]) {
        let line = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.lines.lock().push(line);
    }

    fn printf_ln(&self, args: fmt::Arguments<'_>) {
        self.lines.lock().push(args.to_string());
    }
}
