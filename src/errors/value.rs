// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A value was rejected by a variable's type descriptor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("expected {expected}, got {found}")]
    WrongType { expected: String, found: String },

    #[error("{value} is outside [{}, {}]", bound(.low, "-inf"), bound(.high, "inf"))]
    OutOfRange {
        value: f64,
        low: Option<f64>,
        high: Option<f64>,
    },
}

fn bound(limit: &Option<f64>, open: &str) -> String {
    limit.map_or_else(|| open.to_string(), |v| v.to_string())
}
