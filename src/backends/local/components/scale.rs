// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ComponentError;
use crate::model::{PortSpec, VarType};
use crate::traits::component::{number, Component, Values};

/// Scale component - `y = factor * x`
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    factor: f64,
}

impl Scale {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Component for Scale {
    fn kind(&self) -> &str {
        "scale"
    }

    fn ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input("x", VarType::float()),
            PortSpec::output("y", VarType::float()),
        ]
    }

    fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
        let x = number(inputs, "x")?;
        let mut outputs = Values::new();
        outputs.insert("y".to_string(), serde_json::json!(self.factor * x));
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scale_multiplies() {
        let mut scale = Scale::new(2.5);
        let mut inputs = Values::new();
        inputs.insert("x".into(), json!(4));

        let outputs = scale.execute(&inputs).unwrap();
        assert_eq!(outputs.get("y"), Some(&json!(10.0)));
    }

    #[test]
    fn test_scale_missing_input() {
        let mut scale = Scale::new(1.0);
        let err = scale.execute(&Values::new()).unwrap_err();
        assert_eq!(err, ComponentError::MissingInput("x".into()));
    }
}
