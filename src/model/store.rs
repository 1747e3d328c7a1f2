// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-component variable storage: value plus valid/invalid flag.

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::ValueError;
use crate::model::{Direction, PortSpec, VarType};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub direction: Direction,
    pub var_type: VarType,
    pub value: Value,
    pub valid: bool,
}

impl Variable {
    /// A fresh variable. Inputs start valid (they hold their default),
    /// outputs start invalid (nothing has computed them yet).
    pub fn from_spec(spec: &PortSpec) -> Self {
        Self {
            direction: spec.direction,
            var_type: spec.var_type.clone(),
            value: spec.initial_value(),
            valid: spec.direction == Direction::In,
        }
    }
}

/// The variables of one component, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarStore {
    vars: IndexMap<String, Variable>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ports(ports: &[PortSpec]) -> Self {
        let mut store = Self::new();
        for port in ports {
            store.declare(port);
        }
        store
    }

    /// Declare a variable, returning false if the name is taken.
    pub fn declare(&mut self, spec: &PortSpec) -> bool {
        if self.vars.contains_key(&spec.name) {
            return false;
        }
        self.vars
            .insert(spec.name.clone(), Variable::from_spec(spec));
        true
    }

    pub fn insert(&mut self, name: &str, variable: Variable) {
        self.vars.insert(name.to_string(), variable);
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.vars.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).map(|v| &v.value)
    }

    pub fn direction(&self, name: &str) -> Option<Direction> {
        self.vars.get(name).map(|v| v.direction)
    }

    pub fn is_valid(&self, name: &str) -> Option<bool> {
        self.vars.get(name).map(|v| v.valid)
    }

    /// Set the validity flag, returning the previous one.
    pub fn set_valid(&mut self, name: &str, valid: bool) -> Option<bool> {
        self.vars
            .get_mut(name)
            .map(|v| std::mem::replace(&mut v.valid, valid))
    }

    /// Store a value after validating it against the variable's type. A
    /// variable that received a value is valid.
    pub fn receive(&mut self, name: &str, value: Value) -> Result<(), ValueError> {
        let Some(var) = self.vars.get_mut(name) else {
            return Ok(());
        };
        var.var_type.validate(&value)?;
        var.value = value;
        var.valid = true;
        Ok(())
    }

    /// Names of every variable with the given direction, optionally filtered
    /// by validity.
    pub fn names(&self, direction: Direction, valid: Option<bool>) -> Vec<String> {
        self.vars
            .iter()
            .filter(|(_, v)| v.direction == direction)
            .filter(|(_, v)| valid.map_or(true, |want| v.valid == want))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> VarStore {
        VarStore::from_ports(&[
            PortSpec::input("x", VarType::float()),
            PortSpec::output("y", VarType::float()),
        ])
    }

    #[test]
    fn inputs_start_valid_outputs_invalid() {
        let store = store();
        assert_eq!(store.is_valid("x"), Some(true));
        assert_eq!(store.is_valid("y"), Some(false));
        assert_eq!(store.is_valid("z"), None);
    }

    #[test]
    fn receive_validates_and_marks_valid() {
        let mut store = store();
        store.receive("y", json!(4.0)).unwrap();
        assert_eq!(store.value("y"), Some(&json!(4.0)));
        assert_eq!(store.is_valid("y"), Some(true));

        store.set_valid("y", false);
        assert!(store.receive("y", json!("four")).is_err());
        assert_eq!(store.value("y"), Some(&json!(4.0)));
        assert_eq!(store.is_valid("y"), Some(false));
    }

    #[test]
    fn names_filter_by_direction_and_validity() {
        let store = store();
        assert_eq!(store.names(Direction::Out, None), vec!["y".to_string()]);
        assert_eq!(store.names(Direction::Out, Some(true)), Vec::<String>::new());
        assert_eq!(store.names(Direction::In, Some(true)), vec!["x".to_string()]);
    }

    #[test]
    fn declare_refuses_duplicates() {
        let mut store = store();
        assert!(!store.declare(&PortSpec::output("x", VarType::Any)));
        assert_eq!(store.direction("x"), Some(Direction::In));
    }
}
