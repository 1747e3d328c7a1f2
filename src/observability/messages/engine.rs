// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow execution.
//!
//! This module contains message types for logging events related to:
//! * Assembly workflow runs (start, completion)
//! * Leaf component execution and skips
//! * Component failures

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An assembly started running its workflow.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_assembly::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     scope: "top",
///     component_count: 5,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub scope: &'a str,
    pub component_count: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running workflow of '{}': {} components",
            self.scope, self.component_count
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            scope = self.scope,
            component_count = self.component_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            scope = self.scope,
            component_count = self.component_count,
        )
    }
}

/// An assembly finished running its workflow.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_assembly::observability::messages::engine::ExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = ExecutionCompleted {
///     scope: "top",
///     executed: 2,
///     duration: Duration::from_millis(3),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionCompleted<'a> {
    pub scope: &'a str,
    pub executed: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow of '{}' completed: {} components executed in {:?}",
            self.scope, self.executed, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            scope = self.scope,
            executed = self.executed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            scope = self.scope,
            executed = self.executed,
            duration = ?self.duration,
        )
    }
}

/// A leaf component ran.
///
/// # Log Level
/// `debug!` - Per-component event
pub struct ComponentExecuted<'a> {
    pub path: &'a str,
    pub kind: &'a str,
    pub duration: std::time::Duration,
}

impl Display for ComponentExecuted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executed '{}' ({}) in {:?}",
            self.path, self.kind, self.duration
        )
    }
}

impl StructuredLog for ComponentExecuted<'_> {
    fn log(&self) {
        tracing::debug!(
            path = self.path,
            kind = self.kind,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "component",
            span_name = name,
            path = self.path,
            kind = self.kind,
        )
    }
}

/// A leaf component was up to date and did not run.
///
/// # Log Level
/// `trace!` - High-frequency event
pub struct ComponentSkipped<'a> {
    pub path: &'a str,
}

impl Display for ComponentSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipped '{}': outputs are valid", self.path)
    }
}

impl StructuredLog for ComponentSkipped<'_> {
    fn log(&self) {
        tracing::trace!(path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("component_skipped", span_name = name, path = self.path)
    }
}

/// A leaf component returned an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_assembly::errors::ComponentError;
/// use the_assembly::observability::messages::engine::ComponentFailed;
///
/// let error = ComponentError::MissingInput("x".into());
/// let msg = ComponentFailed {
///     path: "top.p",
///     error: &error,
/// };
///
/// assert_eq!(msg.to_string(), "Component 'top.p' failed: missing input 'x'");
/// ```
pub struct ComponentFailed<'a> {
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ComponentFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Component '{}' failed: {}", self.path, self.error)
    }
}

impl StructuredLog for ComponentFailed<'_> {
    fn log(&self) {
        tracing::error!(
            path = self.path,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "component_failed",
            span_name = name,
            path = self.path,
            error = %self.error,
        )
    }
}
