// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod component;
mod config;
mod graph;
mod model;
mod value;

pub use component::ComponentError;
pub use config::{ConfigError, ValidationError};
pub use graph::GraphError;
pub use model::ModelError;
pub use value::ValueError;
