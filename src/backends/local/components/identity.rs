// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ComponentError;
use crate::model::{PortSpec, VarType};
use crate::traits::component::{Component, Values};

/// Identity component - copies `x` to `y` unchanged, any value type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity;

impl Identity {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Identity {
    fn kind(&self) -> &str {
        "identity"
    }

    fn ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input("x", VarType::Any),
            PortSpec::output("y", VarType::Any),
        ]
    }

    fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
        let x = inputs
            .get("x")
            .cloned()
            .ok_or_else(|| ComponentError::MissingInput("x".to_string()))?;
        Ok(Values::from([("y".to_string(), x)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_passes_any_value() {
        for value in [json!(null), json!([1, 2]), json!({"k": "v"}), json!("text")] {
            let inputs = Values::from([("x".to_string(), value.clone())]);
            let outputs = Identity::new().execute(&inputs).unwrap();
            assert_eq!(outputs["y"], value);
        }
    }
}
