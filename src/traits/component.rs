// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::ComponentError;
use crate::model::{Direction, PortSpec};

/// Variable values keyed by variable name.
pub type Values = IndexMap<String, Value>;

/// A leaf computation living inside an assembly.
///
/// The model owns each component and its variable storage; a component only
/// declares its ports and turns a set of input values into output values.
pub trait Component: std::fmt::Debug {
    /// Registry name of this component kind, e.g. `"scale"`.
    fn kind(&self) -> &str;

    /// Every input and output, in declaration order.
    fn ports(&self) -> Vec<PortSpec>;

    /// Internal `(input, output)` dependency pairs. By default every output
    /// depends on every input.
    fn io_dependencies(&self) -> Vec<(String, String)> {
        let ports = self.ports();
        let inputs = ports.iter().filter(|p| p.direction == Direction::In);
        inputs
            .flat_map(|i| {
                ports
                    .iter()
                    .filter(|o| o.direction == Direction::Out)
                    .map(move |o| (i.name.clone(), o.name.clone()))
            })
            .collect()
    }

    /// Structural version of `io_dependencies`. Bump it whenever the
    /// dependency pairs change so the parent re-merges them.
    fn io_version(&self) -> u64 {
        0
    }

    /// Compute outputs from the current input values.
    fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError>;
}

/// Read a numeric input.
pub fn number(inputs: &Values, name: &str) -> Result<f64, ComponentError> {
    inputs
        .get(name)
        .ok_or_else(|| ComponentError::MissingInput(name.to_string()))?
        .as_f64()
        .ok_or_else(|| ComponentError::BadInput {
            name: name.to_string(),
            expected: "a number",
        })
}

/// Read a string input.
pub fn text<'a>(inputs: &'a Values, name: &str) -> Result<&'a str, ComponentError> {
    inputs
        .get(name)
        .ok_or_else(|| ComponentError::MissingInput(name.to_string()))?
        .as_str()
        .ok_or_else(|| ComponentError::BadInput {
            name: name.to_string(),
            expected: "a string",
        })
}
