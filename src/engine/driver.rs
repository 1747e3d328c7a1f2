// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The default driver: runs an assembly's workflow in dataflow order.

use std::time::Instant;

use serde_json::Value;

use crate::errors::{ComponentError, ModelError};
use crate::graph::path;
use crate::model::hierarchy::NodeKind;
use crate::model::{ComponentId, Direction, Model};
use crate::observability::messages::engine::{
    ComponentExecuted, ComponentFailed, ComponentSkipped, ExecutionCompleted, ExecutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Values;

impl Model {
    /// Run a leaf or an assembly, returning how many leaf components
    /// actually executed.
    ///
    /// A leaf pulls its invalid inputs, then executes only if it never ran or
    /// one of its outputs is invalid. An assembly pulls its invalid boundary
    /// inputs, runs every child of its workflow, then refreshes its invalid
    /// boundary outputs.
    pub fn run(&mut self, id: ComponentId) -> Result<usize, ModelError> {
        if self.is_assembly(id) {
            self.run_assembly(id)
        } else {
            self.run_leaf(id).map(usize::from)
        }
    }

    pub(crate) fn run_leaf(&mut self, id: ComponentId) -> Result<bool, ModelError> {
        let pathname = self.pathname(id);
        let node = self.node(id)?;
        let invalid_inputs = node.store.names(Direction::In, Some(false));
        let parent = node.parent;
        let name = node.name.clone();

        if let (Some(parent), false) = (parent, invalid_inputs.is_empty()) {
            let in_parent: Vec<String> = invalid_inputs
                .iter()
                .map(|input| path::join(&name, input))
                .collect();
            self.update_inputs(parent, &in_parent)?;
        }

        let node = self.node_mut(id)?;
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return Ok(false);
        };
        let stale = node
            .store
            .iter()
            .any(|(_, var)| var.direction == Direction::Out && !var.valid);
        if leaf.executed && !stale {
            ComponentSkipped { path: &pathname }.log();
            return Ok(false);
        }

        let inputs: Values = node
            .store
            .iter()
            .filter(|(_, var)| var.direction == Direction::In)
            .map(|(name, var)| (name.to_string(), var.value.clone()))
            .collect();

        let started = Instant::now();
        let outputs = match leaf.component.execute(&inputs) {
            Ok(outputs) => outputs,
            Err(reason) => {
                ComponentFailed {
                    path: &pathname,
                    error: &reason,
                }
                .log();
                return Err(ModelError::ExecutionFailed {
                    component: pathname,
                    reason,
                });
            }
        };

        // check everything before storing anything
        let mut produced: Vec<(String, Value)> = Vec::new();
        for (name, value) in outputs {
            let Some(var) = node.store.get(&name) else {
                continue;
            };
            if var.direction != Direction::Out {
                continue;
            }
            var.var_type
                .validate(&value)
                .map_err(|reason| ModelError::TypeOrRangeError {
                    path: path::join(&pathname, &name),
                    reason,
                })?;
            produced.push((name, value));
        }
        let missing = node
            .store
            .names(Direction::Out, None)
            .into_iter()
            .find(|out| !produced.iter().any(|(name, _)| name == out));
        if let Some(missing) = missing {
            let reason = ComponentError::MissingOutput(missing);
            ComponentFailed {
                path: &pathname,
                error: &reason,
            }
            .log();
            return Err(ModelError::ExecutionFailed {
                component: pathname,
                reason,
            });
        }

        for (name, value) in produced {
            node.store
                .receive(&name, value)
                .map_err(|reason| ModelError::TypeOrRangeError {
                    path: path::join(&pathname, &name),
                    reason,
                })?;
        }
        // inputs were consumed
        for name in node.store.names(Direction::In, None) {
            node.store.set_valid(&name, true);
        }
        leaf.executed = true;

        ComponentExecuted {
            path: &pathname,
            kind: leaf.component.kind(),
            duration: started.elapsed(),
        }
        .log();
        Ok(true)
    }

    fn run_assembly(&mut self, scope: ComponentId) -> Result<usize, ModelError> {
        let pathname = self.pathname(scope);
        self.sync_child_io(scope)?;

        let node = self.node(scope)?;
        let invalid_inputs = node.store.names(Direction::In, Some(false));
        if let (Some(parent), false) = (node.parent, invalid_inputs.is_empty()) {
            let name = node.name.clone();
            let in_parent: Vec<String> = invalid_inputs
                .iter()
                .map(|input| path::join(&name, input))
                .collect();
            self.update_inputs(parent, &in_parent)?;
        }

        let order = self.workflow_order(scope)?;
        let start_msg = ExecutionStarted {
            scope: &pathname,
            component_count: order.len(),
        };
        let span = start_msg.span("assembly_run");
        let _guard = span.enter();
        start_msg.log();

        let started = Instant::now();
        let mut executed = 0;
        for child in &order {
            let cid = self.child_id(scope, child)?;
            executed += self.run(cid)?;
        }

        let invalid_outputs = self.node(scope)?.store.names(Direction::Out, Some(false));
        if !invalid_outputs.is_empty() {
            self.update_inputs(scope, &invalid_outputs)?;
        }

        ExecutionCompleted {
            scope: &pathname,
            executed,
            duration: started.elapsed(),
        }
        .log();
        Ok(executed)
    }
}
