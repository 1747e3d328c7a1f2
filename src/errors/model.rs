// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors returned by assembly-level operations.
//!
//! Graph-level failures pass through unchanged via [`ModelError::Graph`], so a
//! caller matching on `CyclicDependency` or `DuplicateDestination` does not
//! care whether the rejection happened in the variable graph, the component
//! graph or the assembly's own pre-checks.

use thiserror::Error;

use crate::errors::{ComponentError, GraphError, ValueError};
use crate::model::Direction;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A child-to-child connection used an input as source or an output as
    /// destination.
    #[error("'{path}' must be an {expected} variable")]
    DirectionMismatch { path: String, expected: Direction },

    #[error("can't connect '{src}' to '{dst}': {reason}")]
    IncompatibleTypes {
        src: String,
        dst: String,
        reason: ValueError,
    },

    /// More than one connection feeds a destination. The single-source rule
    /// makes this unreachable through the public API.
    #[error("variable '{path}' has multiple sources {sources:?}")]
    MultipleSources { path: String, sources: Vec<String> },

    #[error("cannot set '{path}': {reason}")]
    TypeOrRangeError { path: String, reason: ValueError },

    #[error("'{scope}' has no child named '{name}'")]
    UnknownComponent { scope: String, name: String },

    #[error("'{scope}' already has a child or variable named '{name}'")]
    NameConflict { scope: String, name: String },

    #[error("'{name}' is not a valid name: names are non-empty and contain no '.'")]
    InvalidName { name: String },

    #[error("'{path}' is not a linkable attribute")]
    NotLinkable { path: String },

    #[error("'{path}' is connected to '{src}' and cannot be set directly")]
    ConnectedInput { path: String, src: String },

    #[error("'{scope}' is not an assembly")]
    NotAnAssembly { scope: String },

    #[error("component '{component}' failed: {reason}")]
    ExecutionFailed {
        component: String,
        reason: ComponentError,
    },
}

impl ModelError {
    /// Shorthand for the graph-level unknown variable error.
    pub fn unknown_variable(path: impl Into<String>) -> Self {
        ModelError::Graph(GraphError::UnknownVariable { path: path.into() })
    }
}
