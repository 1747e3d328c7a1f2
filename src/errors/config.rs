// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

use crate::errors::{ComponentError, ModelError};

/// Problems found while validating a model file, before anything is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two siblings (children or boundary variables) share a name
    DuplicateName {
        /// Dotted path of the assembly holding the duplicates
        scope: String,
        /// The duplicated name
        name: String,
    },
    /// A component names a kind that no factory provides
    UnknownKind {
        scope: String,
        name: String,
        kind: String,
    },
    /// A connection or passthrough endpoint names a child that doesn't exist
    UnresolvedEndpoint {
        scope: String,
        /// The endpoint as written in the file
        path: String,
        /// The first path segment that failed to resolve
        component: String,
    },
    /// Nested content (components, connections, ...) given to a leaf kind
    UnexpectedBody { scope: String, name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateName { scope, name } => {
                write!(f, "Duplicate name '{}' in '{}'", name, scope)
            }
            ValidationError::UnknownKind { scope, name, kind } => {
                write!(
                    f,
                    "Component '{}.{}' has unknown kind '{}'",
                    scope, name, kind
                )
            }
            ValidationError::UnresolvedEndpoint {
                scope,
                path,
                component,
            } => {
                write!(
                    f,
                    "Endpoint '{}' in '{}' refers to '{}' which does not exist",
                    path, scope, component
                )
            }
            ValidationError::UnexpectedBody { scope, name } => {
                write!(
                    f,
                    "Component '{}.{}' is not an assembly but declares nested content",
                    scope, name
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a model file and building a model from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("model validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),

    #[error("failed to create component '{name}': {reason}")]
    Component { name: String, reason: ComponentError },

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
