// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{ASSEMBLY_KIND, DEFAULT_ROOT_NAME};
use crate::errors::ConfigError;
use crate::model::{Direction, PortSpec, VarType};
use crate::observability::messages::validation::{ModelLoaded, ModelRejected, ValidationIssue};
use crate::observability::messages::StructuredLog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A complete model file: the root assembly and everything below it.
///
/// The root is described by the same body as any nested assembly, flattened
/// into the top level of the document.
///
/// # Fields
/// * `name` - Name of the root assembly (optional, defaults to `top`)
/// * `body` - Boundary variables, children, connections, passthroughs and values
///
/// # Example
/// ```yaml
/// name: top
/// variables:
///   - { name: gain, direction: in, type: float, low: 0.0 }
/// components:
///   - name: p
///     kind: scale
///     options: { factor: 2.0 }
///   - name: sub
///     kind: assembly
///     components:
///       - { name: inner, kind: identity }
///     passthroughs:
///       - { path: inner.x, alias: x }
/// connections:
///   - { from: p.y, to: sub.x }
///   - { from: p.y, to: report, expression: true }
/// values:
///   p.x: 3.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_root_name")]
    pub name: String,
    #[serde(flatten)]
    pub body: AssemblyConfig,
}

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

/// Contents of one assembly.
///
/// Everything is applied in field order: variables, then components, then
/// passthroughs, then connections, and finally values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AssemblyConfig {
    #[serde(default)]
    pub variables: Vec<VariableConfig>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub passthroughs: Vec<PassthroughConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    /// Initial values keyed by path in this assembly, e.g. `p.x`
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

impl AssemblyConfig {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.components.is_empty()
            && self.passthroughs.is_empty()
            && self.connections.is_empty()
            && self.values.is_empty()
    }

    pub fn component(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// One child of an assembly.
///
/// # Fields
/// * `name` - Name of the child, unique among its siblings
/// * `kind` - A built-in component kind, or `assembly` for a nested assembly
/// * `options` - Construction options handed to the component factory
/// * `body` - Nested content, only allowed when `kind` is `assembly`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComponentConfig {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub options: IndexMap<String, Value>,
    #[serde(flatten)]
    pub body: AssemblyConfig,
}

impl ComponentConfig {
    pub fn is_assembly(&self) -> bool {
        self.kind == ASSEMBLY_KIND
    }
}

/// Scalar type of a declared boundary variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    #[default]
    Any,
    Bool,
    Int,
    Float,
    Str,
}

/// A plain boundary variable of an assembly.
///
/// `low` and `high` are inclusive bounds and only apply to `int` and
/// `float` variables.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VariableConfig {
    pub name: String,
    pub direction: Direction,
    #[serde(rename = "type", default)]
    pub var_type: TypeName,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl VariableConfig {
    pub fn to_port_spec(&self) -> PortSpec {
        let var_type = match self.var_type {
            TypeName::Any => VarType::Any,
            TypeName::Bool => VarType::Bool,
            TypeName::Int => VarType::Int {
                low: self.low.map(|v| v as i64),
                high: self.high.map(|v| v as i64),
            },
            TypeName::Float => VarType::Float {
                low: self.low,
                high: self.high,
            },
            TypeName::Str => VarType::Str,
        };
        PortSpec {
            name: self.name.clone(),
            direction: self.direction,
            var_type,
            default: self.default.clone(),
        }
    }
}

/// A connection between two paths of the enclosing assembly.
///
/// An `expression` link propagates invalidation but is never pulled through
/// and adds no ordering constraint between components.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub expression: bool,
}

/// Promotes a child variable to a boundary variable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PassthroughConfig {
    pub path: String,
    /// Boundary name; defaults to the last segment of `path`
    #[serde(default)]
    pub alias: Option<String>,
}

/// Load a model description from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: ModelConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a model description from a YAML file
///
/// Every validation problem is reported at once in
/// [`ConfigError::Invalid`], not just the first one found.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig, ConfigError> {
    let display = path.as_ref().display().to_string();
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_model_config(&cfg) {
        for error in &errors {
            ValidationIssue {
                path: &display,
                error,
            }
            .log();
        }
        ModelRejected {
            path: &display,
            error_count: errors.len(),
        }
        .log();
        return Err(ConfigError::Invalid(errors));
    }

    ModelLoaded {
        path: &display,
        name: &cfg.name,
        component_count: cfg.body.components.len(),
    }
    .log();
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
name: plant
components:
  - name: p
    kind: scale
    options: { factor: 2.5 }
  - name: q
    kind: identity
connections:
  - { from: p.y, to: q.x }
values:
  p.x: 4
"#;
        let cfg: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.name, "plant");
        assert_eq!(cfg.body.components.len(), 2);
        assert_eq!(cfg.body.components[0].options.get("factor"), Some(&json!(2.5)));
        assert!(cfg.body.components[0].body.is_empty());
        assert_eq!(cfg.body.connections[0].from, "p.y");
        assert!(!cfg.body.connections[0].expression);
        assert_eq!(cfg.body.values.get("p.x"), Some(&json!(4)));
    }

    #[test]
    fn root_name_defaults() {
        let cfg: ModelConfig = serde_yaml::from_str("components: []").unwrap();
        assert_eq!(cfg.name, DEFAULT_ROOT_NAME);
        assert!(cfg.body.is_empty());
    }

    #[test]
    fn parse_nested_assembly() {
        let yaml = r#"
components:
  - name: sub
    kind: assembly
    components:
      - { name: inner, kind: identity }
    passthroughs:
      - { path: inner.x }
      - { path: inner.y, alias: out }
"#;
        let cfg: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        let sub = cfg.body.component("sub").unwrap();
        assert!(sub.is_assembly());
        assert_eq!(sub.body.components[0].name, "inner");
        assert_eq!(sub.body.passthroughs[0].alias, None);
        assert_eq!(sub.body.passthroughs[1].alias.as_deref(), Some("out"));
    }

    #[test]
    fn variable_config_becomes_port_spec() {
        let yaml = "{ name: n, direction: in, type: int, low: 0, high: 10, default: 3 }";
        let var: VariableConfig = serde_yaml::from_str(yaml).unwrap();
        let spec = var.to_port_spec();
        assert_eq!(spec.direction, Direction::In);
        assert_eq!(
            spec.var_type,
            VarType::Int {
                low: Some(0),
                high: Some(10)
            }
        );
        assert_eq!(spec.initial_value(), json!(3));
    }

    #[test]
    fn unknown_direction_is_a_parse_error() {
        let yaml = "{ name: n, direction: sideways }";
        assert!(serde_yaml::from_str::<VariableConfig>(yaml).is_err());
    }
}
