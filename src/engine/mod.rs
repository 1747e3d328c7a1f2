// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod driver;
pub mod workflow;
#[cfg(test)]
pub mod integration_tests;

pub use workflow::Workflow;
