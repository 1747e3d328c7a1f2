// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::json;

use crate::errors::ComponentError;
use crate::model::{PortSpec, VarType};
use crate::traits::component::{text, Component, Values};

/// Concat component - `text = left + separator + right`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Concat {
    separator: String,
}

impl Concat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Component for Concat {
    fn kind(&self) -> &str {
        "concat"
    }

    fn ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input("left", VarType::Str),
            PortSpec::input("right", VarType::Str),
            PortSpec::output("text", VarType::Str),
        ]
    }

    fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
        let joined = format!(
            "{}{}{}",
            text(inputs, "left")?,
            self.separator,
            text(inputs, "right")?
        );
        Ok(Values::from([("text".to_string(), json!(joined))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_with_separator() {
        let inputs = Values::from([
            ("left".to_string(), json!("hello")),
            ("right".to_string(), json!("world")),
        ]);
        let outputs = Concat::with_separator(", ").execute(&inputs).unwrap();
        assert_eq!(outputs["text"], json!("hello, world"));
    }

    #[test]
    fn test_concat_rejects_numbers() {
        let inputs = Values::from([
            ("left".to_string(), json!(1)),
            ("right".to_string(), json!("x")),
        ]);
        let err = Concat::new().execute(&inputs).unwrap_err();
        assert!(matches!(err, ComponentError::BadInput { ref name, .. } if name == "left"));
    }
}
