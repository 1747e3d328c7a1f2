// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational logging goes through the message types in
//! [`messages`]. Each message is a struct with a `Display` implementation, so
//! there are no format strings scattered across the graph and engine code,
//! and a [`messages::StructuredLog`] implementation that fixes its level and
//! structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::graph` - structural changes to an assembly
//! * `messages::propagation` - invalidation and pull
//! * `messages::engine` - workflow and component execution
//! * `messages::validation` - model file loading and validation
//!
//! # Usage
//!
//! ```rust
//! use the_assembly::observability::messages::graph::ConnectionRemoved;
//! use the_assembly::observability::messages::StructuredLog;
//!
//! ConnectionRemoved {
//!     scope: "top",
//!     src: "p.y",
//!     dst: "q.x",
//! }
//! .log();
//! ```
//!
//! Subscribers are installed by the binary only; the library never
//! initialises one.

pub mod messages;
