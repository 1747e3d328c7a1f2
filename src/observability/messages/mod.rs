// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic the crate emits is a small struct implementing
//! `Display` (the human-readable line) and [`StructuredLog`] (the same event
//! with structured fields, at a fixed level).
//!
//! # Organization
//!
//! * `graph` - structural changes: connections, children, passthroughs, cycles
//! * `propagation` - invalidation and pull traversals
//! * `engine` - workflow execution and component runs
//! * `validation` - model files loaded, validated or rejected
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_assembly::observability::messages::engine::ExecutionStarted;
//! use the_assembly::observability::messages::StructuredLog;
//!
//! let msg = ExecutionStarted {
//!     scope: "top",
//!     component_count: 3,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod graph;
pub mod propagation;
pub mod validation;

/// An event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Open a span carrying the event's fields.
    fn span(&self, name: &str) -> Span;
}
