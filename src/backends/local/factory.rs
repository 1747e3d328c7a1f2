// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use serde_json::Value;

use super::components::*;
use crate::errors::ComponentError;
use crate::traits::Component;

/// Construction options for a component, as written in a model file.
pub type Options = IndexMap<String, Value>;

/// Factory for creating local (in-process) component instances
pub struct LocalComponentFactory;

impl LocalComponentFactory {
    /// Create a component instance by kind name
    ///
    /// - "scale" -> Scale (option `factor`, default 1.0)
    /// - "adder" -> Adder
    /// - "identity" -> Identity
    /// - "concat" -> Concat (option `separator`, default "")
    pub fn create(kind: &str, options: &Options) -> Result<Box<dyn Component>, ComponentError> {
        match kind {
            "scale" => {
                let factor = match options.get("factor") {
                    None => 1.0,
                    Some(value) => value.as_f64().ok_or_else(|| ComponentError::BadOption {
                        name: "factor".to_string(),
                        reason: format!("expected a number, got {}", value),
                    })?,
                };
                Ok(Box::new(Scale::new(factor)))
            }
            "adder" => Ok(Box::new(Adder::new())),
            "identity" => Ok(Box::new(Identity::new())),
            "concat" => {
                let separator = match options.get("separator") {
                    None => "",
                    Some(value) => value.as_str().ok_or_else(|| ComponentError::BadOption {
                        name: "separator".to_string(),
                        reason: format!("expected a string, got {}", value),
                    })?,
                };
                Ok(Box::new(Concat::with_separator(separator)))
            }
            _ => Err(ComponentError::UnknownKind(kind.to_string())),
        }
    }

    /// List all available local component kinds
    pub fn list_available_kinds() -> Vec<&'static str> {
        vec!["scale", "adder", "identity", "concat"]
    }

    /// Check if a kind is available
    pub fn is_kind_available(kind: &str) -> bool {
        Self::list_available_kinds().contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Values;
    use serde_json::json;

    #[test]
    fn test_create_every_listed_kind() {
        for kind in LocalComponentFactory::list_available_kinds() {
            let component = LocalComponentFactory::create(kind, &Options::new())
                .unwrap_or_else(|e| panic!("Failed to create component {}: {}", kind, e));
            assert_eq!(component.kind(), kind);
        }
    }

    #[test]
    fn test_create_scale_with_factor() {
        let options = Options::from([("factor".to_string(), json!(3))]);
        let mut scale = LocalComponentFactory::create("scale", &options).unwrap();

        let outputs = scale
            .execute(&Values::from([("x".to_string(), json!(2.0))]))
            .unwrap();
        assert_eq!(outputs["y"], json!(6.0));
    }

    #[test]
    fn test_create_with_bad_option() {
        let options = Options::from([("factor".to_string(), json!("large"))]);
        let err = LocalComponentFactory::create("scale", &options).unwrap_err();
        assert!(matches!(err, ComponentError::BadOption { ref name, .. } if name == "factor"));
    }

    #[test]
    fn test_create_unknown_kind() {
        let err = LocalComponentFactory::create("teleporter", &Options::new()).unwrap_err();
        assert_eq!(err, ComponentError::UnknownKind("teleporter".into()));
    }

    #[test]
    fn test_is_kind_available() {
        assert!(LocalComponentFactory::is_kind_available("adder"));
        assert!(!LocalComponentFactory::is_kind_available("assembly"));
    }
}
