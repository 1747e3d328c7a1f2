// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::json;

use crate::errors::ComponentError;
use crate::model::{PortSpec, VarType};
use crate::traits::component::{number, Component, Values};

/// Adder component - `sum = a + b`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adder;

impl Adder {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Adder {
    fn kind(&self) -> &str {
        "adder"
    }

    fn ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input("a", VarType::float()),
            PortSpec::input("b", VarType::float()),
            PortSpec::output("sum", VarType::float()),
        ]
    }

    fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
        let sum = number(inputs, "a")? + number(inputs, "b")?;
        Ok(Values::from([("sum".to_string(), json!(sum))]))
    }
}
