// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for validity propagation.
//!
//! This module contains message types for logging events related to:
//! * Forward invalidation through an assembly
//! * Backward pulls that copy a source value into a destination
//! * Explicit `set` calls on a variable

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An invalidation pass over one assembly finished.
///
/// # Log Level
/// `debug!` - Summary of a traversal
///
/// # Example
/// ```
/// use the_assembly::observability::messages::propagation::InvalidationCompleted;
///
/// let outputs = vec!["y".to_string()];
/// let msg = InvalidationCompleted {
///     scope: "top",
///     seeds: &["p.out".to_string()],
///     visited: 4,
///     boundary_outputs: &outputs,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Invalidated 4 variables in 'top' from [p.out]; boundary outputs now stale: [y]"
/// );
/// ```
pub struct InvalidationCompleted<'a> {
    pub scope: &'a str,
    pub seeds: &'a [String],
    pub visited: usize,
    pub boundary_outputs: &'a [String],
}

impl Display for InvalidationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invalidated {} variables in '{}' from [{}]; boundary outputs now stale: [{}]",
            self.visited,
            self.scope,
            self.seeds.join(", "),
            self.boundary_outputs.join(", ")
        )
    }
}

impl StructuredLog for InvalidationCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            seeds = self.seeds.join(", "),
            visited = self.visited,
            boundary_outputs = self.boundary_outputs.join(", "),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "invalidate",
            span_name = name,
            scope = self.scope,
            seeds = self.seeds.join(", "),
        )
    }
}

/// A destination received a fresh value from its source during a pull.
///
/// # Log Level
/// `trace!` - One event per copied value
pub struct InputPulled<'a> {
    pub scope: &'a str,
    pub src: &'a str,
    pub dst: &'a str,
}

impl Display for InputPulled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pulled '{}' into '{}' in '{}'",
            self.src, self.dst, self.scope
        )
    }
}

impl StructuredLog for InputPulled<'_> {
    fn log(&self) {
        tracing::trace!(
            scope = self.scope,
            src = self.src,
            dst = self.dst,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "pull",
            span_name = name,
            scope = self.scope,
            src = self.src,
            dst = self.dst,
        )
    }
}

/// A variable was assigned directly by the caller.
///
/// # Log Level
/// `debug!` - External mutation
pub struct ValueSet<'a> {
    pub scope: &'a str,
    pub path: &'a str,
    pub value: &'a serde_json::Value,
}

impl Display for ValueSet<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Set '{}' in '{}' to {}", self.path, self.scope, self.value)
    }
}

impl StructuredLog for ValueSet<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            path = self.path,
            value = %self.value,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "set",
            span_name = name,
            scope = self.scope,
            path = self.path,
        )
    }
}
