//! Diagnostic tracing for walks
//!
//! The walker reports progress through a [`Tracer`]. [`NoopTracer`] is the
//! default; [`ConsoleTracer`] writes labelled lines to stderr and
//! [`LogTracer`] forwards lines to `tracing`.

use std::fmt::{self, Display, Formatter, Write as _};

/// Line-oriented diagnostic sink
pub trait Tracer: Send + Sync {
    /// Print values separated by spaces, followed by a newline
    fn println(&self, values: &[&dyn Display]);

    /// Print formatted arguments followed by a newline
    fn printf_ln(&self, args: fmt::Arguments<'_>);

    /// Whether lines are consumed at all
    ///
    /// The walker skips building trace lines when this is false.
    #[inline]
    fn enabled(&self) -> bool {
        true
    }
}

impl<T: Tracer + ?Sized> Tracer for &T {
    fn println(&self, values: &[&dyn Display]) {
        (**self).println(values);
    }

    fn printf_ln(&self, args: fmt::Arguments<'_>) {
        (**self).printf_ln(args);
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }
}

impl<T: Tracer + ?Sized> Tracer for std::sync::Arc<T> {
    fn println(&self, values: &[&dyn Display]) {
        (**self).println(values);
    }

    fn printf_ln(&self, args: fmt::Arguments<'_>) {
        (**self).printf_ln(args);
    }

    fn enabled(&self) -> bool {
        (**self).enabled()
    }
}

/// Tracer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline]
    fn println(&self, _values: &[&dyn Display]) {}

    #[inline]
    fn printf_ln(&self, _args: fmt::Arguments<'_>) {}

    #[inline]
    fn enabled(&self) -> bool {
        false
    }
}

/// Tracer writing labelled lines to stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleTracer {
    label: String,
}

impl ConsoleTracer {
    /// Create tracer prefixing each line with `label`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Line prefix
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label and values, space separated
    fn values_line(&self, values: &[&dyn Display]) -> String {
        let mut line = self.label.clone();
        for value in values {
            line.push(' ');
            let _ = write!(line, "{value}");
        }
        line
    }

    /// Label immediately followed by the formatted arguments
    fn format_line(&self, args: fmt::Arguments<'_>) -> String {
        format!("{}{args}", self.label)
    }
}

impl Tracer for ConsoleTracer {
    fn println(&self, values: &[&dyn Display]) {
        eprintln!("{}", self.values_line(values));
    }

    fn printf_ln(&self, args: fmt::Arguments<'_>) {
        eprintln!("{}", self.format_line(args));
    }
}

/// Tracer forwarding lines to `tracing` at TRACE level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn println(&self, values: &[&dyn Display]) {
        tracing::trace!(target: "replica::walk", "{}", join_values(values));
    }

    fn printf_ln(&self, args: fmt::Arguments<'_>) {
        tracing::trace!(target: "replica::walk", "{}", args);
    }

    fn enabled(&self) -> bool {
        tracing::enabled!(target: "replica::walk", tracing::Level::TRACE)
    }
}

/// Join `values` with single spaces, empty values included
pub(crate) fn join_values(values: &[&dyn Display]) -> String {
    let mut line = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{value}");
    }
    line
}

/// Dotted position of the walker inside an object graph
///
/// Passed by value down the recursion; each descent derives a child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracePath(String);

impl TracePath {
    /// Root position
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Position of a named field below this one
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Position of a sequence element below this one
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Dotted string form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TracePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}
