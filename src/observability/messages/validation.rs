// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for loading and validating model files.
//!
//! This module contains message types for logging events related to:
//! * Model files accepted by validation
//! * Individual validation problems
//! * Model files rejected by validation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A model file was loaded and passed validation.
///
/// # Log Level
/// `info!` - Normal operation
///
/// # Example
/// ```
/// use the_assembly::observability::messages::validation::ModelLoaded;
///
/// let msg = ModelLoaded {
///     path: "configs/chain.yaml",
///     name: "chain",
///     component_count: 3,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Loaded model 'chain' from configs/chain.yaml (3 top-level components)"
/// );
/// ```
pub struct ModelLoaded<'a> {
    pub path: &'a str,
    pub name: &'a str,
    pub component_count: usize,
}

impl Display for ModelLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded model '{}' from {} ({} top-level components)",
            self.name, self.path, self.component_count
        )
    }
}

impl StructuredLog for ModelLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            name = self.name,
            component_count = self.component_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "load_model",
            span_name = name,
            path = self.path,
            model = self.name,
        )
    }
}

/// One problem found while validating a model file.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_assembly::errors::ValidationError;
/// use the_assembly::observability::messages::validation::ValidationIssue;
///
/// let error = ValidationError::DuplicateName {
///     scope: "top".into(),
///     name: "p".into(),
/// };
/// let msg = ValidationIssue { path: "model.yaml", error: &error };
///
/// assert_eq!(msg.to_string(), "model.yaml: Duplicate name 'p' in 'top'");
/// ```
pub struct ValidationIssue<'a> {
    pub path: &'a str,
    pub error: &'a crate::errors::ValidationError,
}

impl Display for ValidationIssue<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

impl StructuredLog for ValidationIssue<'_> {
    fn log(&self) {
        tracing::error!(path = self.path, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "validation_issue",
            span_name = name,
            path = self.path,
        )
    }
}

/// A model file was rejected by validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_assembly::observability::messages::validation::ModelRejected;
///
/// let msg = ModelRejected {
///     path: "model.yaml",
///     error_count: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Model file model.yaml failed validation with 2 error(s)");
/// ```
pub struct ModelRejected<'a> {
    pub path: &'a str,
    pub error_count: usize,
}

impl Display for ModelRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Model file {} failed validation with {} error(s)",
            self.path, self.error_count
        )
    }
}

impl StructuredLog for ModelRejected<'_> {
    fn log(&self) {
        tracing::error!(path = self.path, error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "model_rejected",
            span_name = name,
            path = self.path,
            error_count = self.error_count,
        )
    }
}
