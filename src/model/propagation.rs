// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validity propagation.
//!
//! Invalidation walks forward from changed variables, marking everything
//! downstream stale and descending into children whose inputs were hit.
//! Pull walks backward from a variable that is about to be read, forcing
//! stale producers to run first. Both go through the same two entry points
//! for leaves and nested assemblies: [`Model::invalidate_deps`] and
//! [`Model::update_outputs`].

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::errors::ModelError;
use crate::graph::path;
use crate::model::hierarchy::NodeKind;
use crate::model::{ComponentId, Direction, Model};
use crate::observability::messages::propagation::{InputPulled, InvalidationCompleted};
use crate::observability::messages::StructuredLog;

impl Model {
    /// Mark everything depending on `names` invalid and return the outputs
    /// of `id` that became invalid.
    ///
    /// For an assembly, `names` are paths in its own scope and the returned
    /// names are its boundary outputs. For a leaf, `names` are its own
    /// variables: an input stands for every output depending on it, an
    /// output for itself. With `notify_parent` the parent then invalidates
    /// whatever it has connected to those outputs.
    pub fn invalidate_deps(
        &mut self,
        id: ComponentId,
        names: &[String],
        notify_parent: bool,
    ) -> Result<Vec<String>, ModelError> {
        let outs = if self.is_assembly(id) {
            self.invalidate_assembly(id, names)?
        } else {
            self.invalidate_leaf(id, names)?
        };

        if notify_parent && !outs.is_empty() {
            if let Some(parent) = self.parent(id) {
                let name = self.node(id)?.name.clone();
                let in_parent: Vec<String> = outs.iter().map(|o| path::join(&name, o)).collect();
                self.sync_child_io(parent)?;
                self.invalidate_deps(parent, &in_parent, true)?;
            }
        }
        Ok(outs)
    }

    /// Make the named variables of `scope` valid by copying in the value of
    /// their source, first forcing an invalid source to become valid.
    ///
    /// Expression-fed destinations are skipped, as are destinations with no
    /// source, except an invalid child output, whose child is brought up to
    /// date instead. Returns whether any destination was refreshed.
    pub fn update_inputs(&mut self, scope: ComponentId, paths: &[String]) -> Result<bool, ModelError> {
        self.sync_child_io(scope)?;
        let scope_name = self.pathname(scope);
        let mut updated = false;

        for dst in paths {
            let sources: Vec<(String, bool)> = self
                .assembly(scope)?
                .graph
                .sources(dst)
                .map(|(src, link)| (src.to_string(), link.expression))
                .collect();

            if sources.iter().any(|(_, expression)| *expression) {
                continue;
            }
            if sources.len() > 1 {
                return Err(ModelError::MultipleSources {
                    path: dst.clone(),
                    sources: sources.into_iter().map(|(src, _)| src).collect(),
                });
            }
            let Some((src, _)) = sources.into_iter().next() else {
                self.refresh_child_output(scope, dst)?;
                continue;
            };

            updated = true;
            if !self.valid_at(scope, &src)? {
                self.validate_source(scope, &src)?;
            }

            let value = self.value_at(scope, &src)?;
            self.receive_at(scope, dst, value)?;
            InputPulled {
                scope: &scope_name,
                src: &src,
                dst,
            }
            .log();
        }
        Ok(updated)
    }

    /// Make the named outputs of `id` valid. A leaf runs; an assembly pulls
    /// each output from its source.
    pub fn update_outputs(&mut self, id: ComponentId, names: &[String]) -> Result<(), ModelError> {
        if self.is_assembly(id) {
            self.update_inputs(id, names)?;
        } else {
            self.run_leaf(id)?;
        }
        Ok(())
    }

    fn invalidate_assembly(
        &mut self,
        scope: ComponentId,
        names: &[String],
    ) -> Result<Vec<String>, ModelError> {
        self.sync_child_io(scope)?;

        let mut stack: IndexSet<String> = names.iter().cloned().collect();
        let mut visited: HashSet<String> = HashSet::new();
        let mut outs: IndexSet<String> = IndexSet::new();

        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if !self.assembly(scope)?.graph.contains(&name) {
                return Err(ModelError::unknown_variable(name));
            }
            self.set_valid_at(scope, &name, false)?;

            let successors: Vec<String> = self
                .assembly(scope)?
                .graph
                .successors(&name)
                .map(str::to_string)
                .collect();
            for next in successors {
                match path::split(&next) {
                    (None, var) => {
                        if self.node(scope)?.store.direction(var) == Some(Direction::Out) {
                            outs.insert(var.to_string());
                        }
                    }
                    (Some(child), var) => {
                        let cid = self.child_id(scope, child)?;
                        if self.node(cid)?.store.is_valid(var) != Some(true) {
                            continue;
                        }
                        let newly = self.invalidate_deps(cid, &[var.to_string()], false)?;
                        for out in newly {
                            stack.insert(path::join(child, &out));
                        }
                        stack.insert(next.clone());
                    }
                }
            }
        }

        let node = self.node_mut(scope)?;
        for out in &outs {
            node.store.set_valid(out, false);
        }
        let outs: Vec<String> = outs.into_iter().collect();

        InvalidationCompleted {
            scope: &self.pathname(scope),
            seeds: names,
            visited: visited.len(),
            boundary_outputs: &outs,
        }
        .log();
        Ok(outs)
    }

    fn invalidate_leaf(&mut self, id: ComponentId, names: &[String]) -> Result<Vec<String>, ModelError> {
        let node = self.node_mut(id)?;
        let NodeKind::Leaf(leaf) = &node.kind else {
            return Ok(Vec::new());
        };
        let dependencies = leaf.component.io_dependencies();

        let mut targets: IndexSet<String> = IndexSet::new();
        for name in names {
            match node.store.direction(name) {
                Some(Direction::In) => targets.extend(
                    dependencies
                        .iter()
                        .filter(|(input, _)| input == name)
                        .map(|(_, output)| output.clone()),
                ),
                Some(Direction::Out) => {
                    targets.insert(name.clone());
                }
                None => return Err(ModelError::unknown_variable(name.as_str())),
            }
        }

        Ok(targets
            .into_iter()
            .filter(|out| node.store.set_valid(out, false) == Some(true))
            .collect())
    }

    /// Force an invalid source in `scope` to become valid.
    fn validate_source(&mut self, scope: ComponentId, src: &str) -> Result<(), ModelError> {
        match path::split(src) {
            (None, var) => match self.parent(scope) {
                Some(parent) => {
                    let in_parent = path::join(&self.node(scope)?.name, var);
                    if !self.update_inputs(parent, &[in_parent])? {
                        self.set_valid_at(scope, src, true)?;
                    }
                }
                None => {
                    self.set_valid_at(scope, src, true)?;
                }
            },
            (Some(child), var) => {
                let cid = self.child_id(scope, child)?;
                self.update_outputs(cid, &[var.to_string()])?;
            }
        }
        Ok(())
    }

    /// A child output nobody feeds from this scope can only be refreshed by
    /// the child itself.
    fn refresh_child_output(&mut self, scope: ComponentId, path: &str) -> Result<(), ModelError> {
        let (Some(child), var) = path::split(path) else {
            return Ok(());
        };
        let cid = self.child_id(scope, child)?;
        let store = &self.node(cid)?.store;
        if store.direction(var) == Some(Direction::Out) && store.is_valid(var) == Some(false) {
            self.update_outputs(cid, &[var.to_string()])?;
        }
        Ok(())
    }
}
