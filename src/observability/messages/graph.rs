// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for structural changes to an assembly.
//!
//! This module contains message types for logging events related to:
//! * Connections added and removed
//! * Children added and removed
//! * Passthrough creation
//! * Rejected cycles in the component graph
//! * Child I/O graphs merged into a parent

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A connection was added to an assembly.
///
/// # Log Level
/// `debug!` - Structural change
///
/// # Example
/// ```
/// use the_assembly::observability::messages::graph::ConnectionAdded;
///
/// let msg = ConnectionAdded {
///     scope: "top",
///     src: "p.y",
///     dst: "q.x",
///     expression: false,
/// };
///
/// assert_eq!(msg.to_string(), "Connected 'p.y' to 'q.x' in 'top'");
/// ```
pub struct ConnectionAdded<'a> {
    pub scope: &'a str,
    pub src: &'a str,
    pub dst: &'a str,
    pub expression: bool,
}

impl Display for ConnectionAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.expression {
            write!(
                f,
                "Connected '{}' to '{}' in '{}' (expression)",
                self.src, self.dst, self.scope
            )
        } else {
            write!(
                f,
                "Connected '{}' to '{}' in '{}'",
                self.src, self.dst, self.scope
            )
        }
    }
}

impl StructuredLog for ConnectionAdded<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            src = self.src,
            dst = self.dst,
            expression = self.expression,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "connect",
            span_name = name,
            scope = self.scope,
            src = self.src,
            dst = self.dst,
        )
    }
}

/// A connection was removed from an assembly.
///
/// # Log Level
/// `debug!` - Structural change
pub struct ConnectionRemoved<'a> {
    pub scope: &'a str,
    pub src: &'a str,
    pub dst: &'a str,
}

impl Display for ConnectionRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Disconnected '{}' from '{}' in '{}'",
            self.src, self.dst, self.scope
        )
    }
}

impl StructuredLog for ConnectionRemoved<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            src = self.src,
            dst = self.dst,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "disconnect",
            span_name = name,
            scope = self.scope,
            src = self.src,
            dst = self.dst,
        )
    }
}

/// A leaf component or nested assembly was added to an assembly.
///
/// # Log Level
/// `debug!` - Structural change
///
/// # Example
/// ```
/// use the_assembly::observability::messages::graph::ChildAdded;
///
/// let msg = ChildAdded {
///     scope: "top",
///     name: "sub",
///     kind: "assembly",
/// };
///
/// assert_eq!(msg.to_string(), "Added 'sub' (assembly) to 'top'");
/// ```
pub struct ChildAdded<'a> {
    pub scope: &'a str,
    pub name: &'a str,
    pub kind: &'a str,
}

impl Display for ChildAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Added '{}' ({}) to '{}'",
            self.name, self.kind, self.scope
        )
    }
}

impl StructuredLog for ChildAdded<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            name = self.name,
            kind = self.kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "child_added",
            span_name = name,
            scope = self.scope,
            child = self.name,
            kind = self.kind,
        )
    }
}

/// A child was removed, together with its connections and subtree.
///
/// # Log Level
/// `debug!` - Structural change
pub struct ChildRemoved<'a> {
    pub scope: &'a str,
    pub name: &'a str,
    pub connections_removed: usize,
}

impl Display for ChildRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed '{}' from '{}' ({} connections dropped)",
            self.name, self.scope, self.connections_removed
        )
    }
}

impl StructuredLog for ChildRemoved<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            name = self.name,
            connections_removed = self.connections_removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "child_removed",
            span_name = name,
            scope = self.scope,
            child = self.name,
        )
    }
}

/// A boundary variable forwarding to a child variable was created.
///
/// # Log Level
/// `debug!` - Structural change
///
/// # Example
/// ```
/// use the_assembly::observability::messages::graph::PassthroughCreated;
///
/// let msg = PassthroughCreated {
///     scope: "top",
///     alias: "x",
///     target: "p.x",
///     direction: "in",
/// };
///
/// assert_eq!(msg.to_string(), "Created in passthrough 'x' -> 'p.x' in 'top'");
/// ```
pub struct PassthroughCreated<'a> {
    pub scope: &'a str,
    pub alias: &'a str,
    pub target: &'a str,
    pub direction: &'a str,
}

impl Display for PassthroughCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created {} passthrough '{}' -> '{}' in '{}'",
            self.direction, self.alias, self.target, self.scope
        )
    }
}

impl StructuredLog for PassthroughCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            scope = self.scope,
            alias = self.alias,
            target = self.target,
            direction = self.direction,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "passthrough",
            span_name = name,
            scope = self.scope,
            alias = self.alias,
            target = self.target,
        )
    }
}

/// A connection was refused because it would close a loop between children.
///
/// # Log Level
/// `warn!` - Rejected request, graph left unchanged
///
/// # Example
/// ```
/// use the_assembly::observability::messages::graph::CycleRejected;
///
/// let cycles = vec![vec!["p".to_string(), "q".to_string()]];
/// let msg = CycleRejected {
///     src: "q.out",
///     dst: "p.in",
///     cycles: &cycles,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Rejected connection 'q.out' -> 'p.in': would create cycle {p, q}"
/// );
/// ```
pub struct CycleRejected<'a> {
    pub src: &'a str,
    pub dst: &'a str,
    pub cycles: &'a [Vec<String>],
}

impl CycleRejected<'_> {
    fn members(&self) -> String {
        self.cycles
            .iter()
            .map(|cycle| format!("{{{}}}", cycle.join(", ")))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for CycleRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected connection '{}' -> '{}': would create cycle {}",
            self.src,
            self.dst,
            self.members()
        )
    }
}

impl StructuredLog for CycleRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            src = self.src,
            dst = self.dst,
            cycles = self.members(),
            cycle_count = self.cycles.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "cycle_rejected",
            span_name = name,
            src = self.src,
            dst = self.dst,
            cycles = self.members(),
        )
    }
}

/// A child's internal I/O dependencies were (re)merged into its parent's
/// variable graph after its structural version changed.
///
/// # Log Level
/// `trace!` - High-frequency bookkeeping
pub struct ChildGraphMerged<'a> {
    pub scope: &'a str,
    pub child: &'a str,
    pub version: u64,
    pub edge_count: usize,
}

impl Display for ChildGraphMerged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Merged I/O graph of '{}' into '{}' at version {} ({} edges)",
            self.child, self.scope, self.version, self.edge_count
        )
    }
}

impl StructuredLog for ChildGraphMerged<'_> {
    fn log(&self) {
        tracing::trace!(
            scope = self.scope,
            child = self.child,
            version = self.version,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "child_graph_merged",
            span_name = name,
            scope = self.scope,
            child = self.child,
            version = self.version,
        )
    }
}
