// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Variable declarations: direction, value type and default.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "input"),
            Direction::Out => write!(f, "output"),
        }
    }
}

/// The validator attached to a variable.
///
/// Numeric bounds are inclusive; `None` leaves that side open.
#[derive(Debug, Clone, PartialEq)]
pub enum VarType {
    Any,
    Bool,
    Int { low: Option<i64>, high: Option<i64> },
    Float { low: Option<f64>, high: Option<f64> },
    Str,
}

impl VarType {
    pub fn int() -> Self {
        VarType::Int {
            low: None,
            high: None,
        }
    }

    pub fn float() -> Self {
        VarType::Float {
            low: None,
            high: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VarType::Any => "any",
            VarType::Bool => "bool",
            VarType::Int { .. } => "int",
            VarType::Float { .. } => "float",
            VarType::Str => "str",
        }
    }

    /// Check that `value` is acceptable for a variable of this type.
    ///
    /// ```
    /// use serde_json::json;
    /// use the_assembly::model::VarType;
    ///
    /// let ratio = VarType::Float { low: Some(0.0), high: Some(1.0) };
    /// assert!(ratio.validate(&json!(0.5)).is_ok());
    /// assert!(ratio.validate(&json!(1)).is_ok());
    /// assert!(ratio.validate(&json!(1.5)).is_err());
    /// assert!(ratio.validate(&json!("half")).is_err());
    /// ```
    pub fn validate(&self, value: &Value) -> Result<(), ValueError> {
        match self {
            VarType::Any => Ok(()),
            VarType::Bool => match value {
                Value::Bool(_) => Ok(()),
                other => Err(self.wrong_type(other)),
            },
            VarType::Str => match value {
                Value::String(_) => Ok(()),
                other => Err(self.wrong_type(other)),
            },
            VarType::Int { low, high } => {
                let n = value.as_i64().ok_or_else(|| self.wrong_type(value))?;
                let below = low.map_or(false, |l| n < l);
                let above = high.map_or(false, |h| n > h);
                if below || above {
                    return Err(ValueError::OutOfRange {
                        value: n as f64,
                        low: low.map(|l| l as f64),
                        high: high.map(|h| h as f64),
                    });
                }
                Ok(())
            }
            VarType::Float { low, high } => {
                let n = value.as_f64().ok_or_else(|| self.wrong_type(value))?;
                check_range(n, *low, *high)
            }
        }
    }

    /// Coarse type check between a source and a destination declaration.
    /// Ranges are not compared here; the source value is validated against
    /// the destination separately.
    pub fn compatible_with(&self, dst: &VarType) -> Result<(), ValueError> {
        let ok = match (self, dst) {
            (_, VarType::Any) | (VarType::Any, _) => true,
            (VarType::Int { .. }, VarType::Float { .. }) => true,
            (a, b) => a.name() == b.name(),
        };
        if ok {
            Ok(())
        } else {
            Err(ValueError::WrongType {
                expected: dst.name().to_string(),
                found: self.name().to_string(),
            })
        }
    }

    /// Value a variable of this type starts with when no default is given.
    pub fn default_value(&self) -> Value {
        match self {
            VarType::Any => Value::Null,
            VarType::Bool => Value::Bool(false),
            VarType::Int { low, high } => {
                let v = low.unwrap_or(0).max(0);
                Value::from(high.map_or(v, |h| v.min(h)))
            }
            VarType::Float { low, high } => {
                let v = low.unwrap_or(0.0).max(0.0);
                Value::from(high.map_or(v, |h| v.min(h)))
            }
            VarType::Str => Value::String(String::new()),
        }
    }

    fn wrong_type(&self, found: &Value) -> ValueError {
        ValueError::WrongType {
            expected: self.name().to_string(),
            found: json_type_name(found).to_string(),
        }
    }
}

fn check_range(value: f64, low: Option<f64>, high: Option<f64>) -> Result<(), ValueError> {
    let below = low.map_or(false, |l| value < l);
    let above = high.map_or(false, |h| value > h);
    if below || above {
        Err(ValueError::OutOfRange { value, low, high })
    } else {
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declaration of one input or output of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct PortSpec {
    pub name: String,
    pub direction: Direction,
    pub var_type: VarType,
    /// Starting value; `var_type.default_value()` when `None`.
    pub default: Option<Value>,
}

impl PortSpec {
    pub fn input(name: impl Into<String>, var_type: VarType) -> Self {
        Self {
            name: name.into(),
            direction: Direction::In,
            var_type,
            default: None,
        }
    }

    pub fn output(name: impl Into<String>, var_type: VarType) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Out,
            var_type,
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn initial_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.var_type.default_value())
    }
}
