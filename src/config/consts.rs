// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Name of the root assembly when a model file doesn't give one
pub const DEFAULT_ROOT_NAME: &str = "top";
/// Kind that makes a component entry a nested assembly instead of a leaf
pub const ASSEMBLY_KIND: &str = crate::model::ASSEMBLY_KIND;
