// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors reported by leaf components while building or executing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// An input the computation needs was not supplied.
    #[error("missing input '{0}'")]
    MissingInput(String),

    /// A declared output was not part of what `execute` returned.
    #[error("output '{0}' was not produced")]
    MissingOutput(String),

    /// An input had a shape the computation cannot use.
    #[error("input '{name}' must be {expected}")]
    BadInput { name: String, expected: &'static str },

    /// A construction option was missing or malformed.
    #[error("option '{name}': {reason}")]
    BadOption { name: String, reason: String },

    /// No built-in component is registered under this kind.
    #[error("unknown component kind '{0}'")]
    UnknownKind(String),

    #[error("{0}")]
    Failed(String),
}
