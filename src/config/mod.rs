// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod builder;
mod loader;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use builder::build_model;
pub use loader::{
    load_and_validate_config, load_config, AssemblyConfig, ComponentConfig, ConnectionConfig,
    ModelConfig, PassthroughConfig, TypeName, VariableConfig,
};
pub use validation::validate_model_config;
