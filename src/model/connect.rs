// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Connecting and disconnecting variables inside an assembly.
//!
//! A connection is checked completely before anything is mutated. Inserting
//! into the component graph rolls itself back on a cycle; a connection that
//! also has to create passthroughs restores a snapshot of the model when any
//! step fails, so a rejected `connect` leaves the model as it was.

use serde_json::Value;

use crate::errors::{GraphError, ModelError};
use crate::graph::path;
use crate::model::{ComponentId, Direction, Model, VarType, Variable};
use crate::observability::messages::graph::{ConnectionAdded, ConnectionRemoved, PassthroughCreated};
use crate::observability::messages::StructuredLog;

/// One resolved side of a connection.
#[derive(Debug, Clone)]
struct Endpoint {
    /// Path in the scope, rewritten to `child.alias` for nested targets.
    path: String,
    owner: Option<String>,
    direction: Direction,
    var_type: VarType,
    value: Value,
    pending: Option<Pending>,
}

/// Boundary variables a connection needs but that don't exist yet.
#[derive(Debug, Clone)]
enum Pending {
    /// A boundary variable of the scope itself.
    Boundary,
    /// A passthrough inside child assembly `child` exposing `inner` as `alias`.
    Nested {
        child: ComponentId,
        inner: String,
        alias: String,
    },
}

impl Endpoint {
    fn existing(path: String, owner: Option<&str>, var: &Variable) -> Self {
        Self {
            path,
            owner: owner.map(str::to_string),
            direction: var.direction,
            var_type: var.var_type.clone(),
            value: var.value.clone(),
            pending: None,
        }
    }

    /// A new boundary variable mirroring the child variable on the other side.
    fn boundary(name: &str, other: &Endpoint) -> Self {
        Self {
            path: name.to_string(),
            owner: None,
            direction: other.direction,
            var_type: other.var_type.clone(),
            value: other.value.clone(),
            pending: Some(Pending::Boundary),
        }
    }
}

impl Model {
    /// Connect `src` to `dst` inside `scope`.
    ///
    /// Paths are either boundary names of `scope` or `child.var`. A bare name
    /// that doesn't exist yet becomes a passthrough mirroring the child
    /// variable on the other side; a path reaching into a nested assembly
    /// (`sub.inner.x`) creates or reuses a passthrough inside `sub`.
    pub fn connect(&mut self, scope: ComponentId, src: &str, dst: &str) -> Result<(), ModelError> {
        self.connect_link(scope, src, dst, false)
    }

    /// Connect through an expression link. The edge takes part in
    /// invalidation but never in pull, and adds no component dependency.
    pub fn connect_expression(
        &mut self,
        scope: ComponentId,
        src: &str,
        dst: &str,
    ) -> Result<(), ModelError> {
        self.connect_link(scope, src, dst, true)
    }

    /// Remove connections.
    ///
    /// With `other`, the single edge between `path` and `other` (either
    /// direction). Without it, every connection touching variable `path`, or,
    /// when `path` names a child, every connection of every child variable.
    pub fn disconnect(
        &mut self,
        scope: ComponentId,
        path: &str,
        other: Option<&str>,
    ) -> Result<(), ModelError> {
        self.sync_child_io(scope)?;

        if !self.assembly(scope)?.graph.contains(path) {
            let child = match path::owner(path) {
                None => self.child(scope, path),
                Some(_) => None,
            };
            let Some(cid) = child else {
                return Err(ModelError::NotLinkable {
                    path: path.to_string(),
                });
            };
            let vars: Vec<String> = self
                .node(cid)?
                .store
                .iter()
                .map(|(var, _)| path::join(path, var))
                .collect();
            for var in vars {
                self.disconnect(scope, &var, None)?;
            }
            return Ok(());
        }

        let graph = &self.assembly(scope)?.graph;
        let edges = match other {
            Some(other) => {
                let edge = if graph.has_edge(path, other) {
                    (path.to_string(), other.to_string())
                } else if graph.has_edge(other, path) {
                    (other.to_string(), path.to_string())
                } else {
                    return Err(not_connected(path, other));
                };
                if path::is_internal_edge(&edge.0, &edge.1) {
                    return Err(not_connected(path, other));
                }
                vec![edge]
            }
            None => graph.connections_of(path),
        };

        for (src, dst) in &edges {
            self.remove_connection(scope, src, dst)?;
        }
        Ok(())
    }

    /// Promote child variable `path` to a boundary variable named `alias`
    /// (by default the last segment of `path`) and connect the two. Returns
    /// the boundary name.
    pub fn create_passthrough(
        &mut self,
        scope: ComponentId,
        path: &str,
        alias: Option<&str>,
    ) -> Result<String, ModelError> {
        let alias = alias.unwrap_or_else(|| path::leaf(path)).to_string();
        self.check_new_name(scope, &alias)?;
        if path::owner(path).is_none() {
            return Err(ModelError::NotLinkable {
                path: path.to_string(),
            });
        }
        self.sync_child_io(scope)?;
        let (direction, var_type, value) = self.describe(scope, path)?;

        self.node_mut(scope)?.store.insert(
            &alias,
            Variable {
                direction,
                var_type,
                value,
                valid: true,
            },
        );
        self.assembly_mut(scope)?.graph.add_node(&alias);

        let connected = match direction {
            Direction::In => self.connect(scope, &alias, path),
            Direction::Out => self.connect(scope, path, &alias),
        };
        if let Err(err) = connected {
            self.node_mut(scope)?.store.remove(&alias);
            self.assembly_mut(scope)?.graph.remove_nodes([alias.as_str()]);
            return Err(err);
        }

        let asm = self.assembly_mut(scope)?;
        let target = match direction {
            Direction::In => asm.graph.successors(&alias).next().map(str::to_string),
            Direction::Out => asm.graph.source(&alias).map(str::to_string),
        }
        .unwrap_or_else(|| path.to_string());
        asm.passthroughs.register(&alias, &target);
        asm.structure_version += 1;

        PassthroughCreated {
            scope: &self.pathname(scope),
            alias: &alias,
            target: &target,
            direction: direction.as_str(),
        }
        .log();
        Ok(alias)
    }

    /// Connections of `scope` as `(src, dst)` pairs. Internal edges of
    /// children never appear; without `show_passthrough` only connections
    /// between two children are listed.
    pub fn list_connections(
        &mut self,
        scope: ComponentId,
        show_passthrough: bool,
    ) -> Result<Vec<(String, String)>, ModelError> {
        self.sync_child_io(scope)?;
        let connections = self.assembly(scope)?.graph.connections();
        Ok(connections
            .into_iter()
            .filter(|(src, dst)| {
                show_passthrough || (path::owner(src).is_some() && path::owner(dst).is_some())
            })
            .collect())
    }

    /// Remove one edge, releasing its component-graph reference. The
    /// destination keeps its last value and is valid again.
    pub(crate) fn remove_connection(
        &mut self,
        scope: ComponentId,
        src: &str,
        dst: &str,
    ) -> Result<(), ModelError> {
        let asm = self.assembly_mut(scope)?;
        let link = asm.graph.disconnect(src, dst)?;
        if !link.expression {
            if let (Some(a), Some(b)) = (path::owner(src), path::owner(dst)) {
                if a != b {
                    asm.comp_graph.disconnect(a, b)?;
                    asm.workflow.config_changed();
                }
            }
        }
        asm.structure_version += 1;
        let orphaned_input = path::owner(src).is_none()
            && asm.graph.successors(src).next().is_none()
            && self.node(scope)?.store.direction(src) == Some(Direction::In)
            && !self.fed_from_parent(scope, src)?;
        self.set_valid_at(scope, dst, true)?;
        if orphaned_input {
            // a boundary input feeding nothing is its own source again
            self.set_valid_at(scope, src, true)?;
        }

        ConnectionRemoved {
            scope: &self.pathname(scope),
            src,
            dst,
        }
        .log();
        Ok(())
    }

    fn connect_link(
        &mut self,
        scope: ComponentId,
        src: &str,
        dst: &str,
        expression: bool,
    ) -> Result<(), ModelError> {
        self.sync_child_io(scope)?;

        let (s, d) = match (self.resolve(scope, src)?, self.resolve(scope, dst)?) {
            (Some(s), Some(d)) => (s, d),
            (None, Some(d)) if d.owner.is_some() => (Endpoint::boundary(src, &d), d),
            (Some(s), None) if s.owner.is_some() => {
                let d = Endpoint::boundary(dst, &s);
                (s, d)
            }
            (None, _) => return Err(not_linkable(src)),
            (_, None) => return Err(not_linkable(dst)),
        };

        if let (Some(a), Some(b)) = (&s.owner, &d.owner) {
            if a == b {
                return Err(GraphError::SameComponent {
                    src: src.to_string(),
                    dst: dst.to_string(),
                    component: a.clone(),
                }
                .into());
            }
        }

        if let Some(existing) = self.assembly(scope)?.graph.source(&d.path) {
            return Err(GraphError::DuplicateDestination {
                dst: dst.to_string(),
                existing: existing.to_string(),
            }
            .into());
        }

        if s.owner.is_some() && d.owner.is_some() {
            if s.direction != Direction::Out {
                return Err(ModelError::DirectionMismatch {
                    path: src.to_string(),
                    expected: Direction::Out,
                });
            }
            if d.direction != Direction::In {
                return Err(ModelError::DirectionMismatch {
                    path: dst.to_string(),
                    expected: Direction::In,
                });
            }
        }

        // an untyped source holds no checkable value until it has run
        s.var_type
            .compatible_with(&d.var_type)
            .and_then(|_| match s.var_type {
                VarType::Any => Ok(()),
                _ => d.var_type.validate(&s.value),
            })
            .map_err(|reason| ModelError::IncompatibleTypes {
                src: src.to_string(),
                dst: dst.to_string(),
                reason,
            })?;

        // passthroughs are created one level at a time; undo all of them
        // if a later step is refused
        let saved = (s.pending.is_some() || d.pending.is_some()).then(|| self.snapshot());
        if let Err(err) = self.link(scope, &s, &d, expression) {
            if let Some(saved) = saved {
                self.restore(saved);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Apply a fully checked connection: passthroughs, both graphs, then
    /// invalidation of the destination.
    fn link(
        &mut self,
        scope: ComponentId,
        s: &Endpoint,
        d: &Endpoint,
        expression: bool,
    ) -> Result<(), ModelError> {
        let crossing = match (&s.owner, &d.owner) {
            (Some(a), Some(b)) if !expression && a != b => Some((a.clone(), b.clone())),
            _ => None,
        };
        if crossing.is_some() {
            self.assembly_mut(scope)?
                .comp_graph
                .connect(&s.path, &d.path)?;
        }

        for endpoint in [s, d] {
            if let Some(Pending::Nested {
                child,
                inner,
                alias,
            }) = &endpoint.pending
            {
                self.create_passthrough(*child, inner, Some(alias.as_str()))?;
            }
        }
        for (endpoint, other) in [(s, d), (d, s)] {
            if matches!(endpoint.pending, Some(Pending::Boundary)) {
                self.declare_passthrough(scope, endpoint, &other.path)?;
            }
        }

        let scope_name = self.pathname(scope);
        let asm = self.assembly_mut(scope)?;
        asm.graph.connect(&s.path, &d.path, expression)?;
        if crossing.is_some() {
            asm.workflow.config_changed();
        }
        asm.structure_version += 1;

        ConnectionAdded {
            scope: &scope_name,
            src: &s.path,
            dst: &d.path,
            expression,
        }
        .log();

        self.sync_child_io(scope)?;

        if d.owner.is_none() {
            let was_valid = self.set_valid_at(scope, &d.path, false)?;
            if let (true, Some(parent)) = (was_valid, self.parent(scope)) {
                let in_parent = path::join(&self.node(scope)?.name, &d.path);
                self.sync_child_io(parent)?;
                self.invalidate_deps(parent, &[in_parent], true)?;
            }
        } else {
            if s.owner.is_none() && s.direction == Direction::In {
                self.set_valid_at(scope, &s.path, false)?;
            }
            let (owner, var) = self.owner_of(scope, &d.path)?;
            if self.is_assembly(owner) {
                // invalidate inside the child so its internals see the new source
                let var = var.to_string();
                self.invalidate_deps(owner, &[var], true)?;
            } else {
                self.invalidate_deps(scope, &[d.path.clone()], true)?;
            }
        }
        Ok(())
    }

    /// Resolve one side of a connection. `Ok(None)` is a bare name that
    /// doesn't exist yet.
    fn resolve(&self, scope: ComponentId, path: &str) -> Result<Option<Endpoint>, ModelError> {
        let (child, rest) = match path::split(path) {
            (None, name) => {
                return match self.node(scope)?.store.get(name) {
                    Some(var) => Ok(Some(Endpoint::existing(path.to_string(), None, var))),
                    None if self.check_new_name(scope, name).is_ok() => Ok(None),
                    None => Err(not_linkable(path)),
                };
            }
            (Some(child), rest) => (child, rest),
        };

        let cid = self.child_id(scope, child)?;
        if let Some(var) = self.node(cid)?.store.get(rest) {
            return Ok(Some(Endpoint::existing(path.to_string(), Some(child), var)));
        }
        if !self.is_assembly(cid) || path::owner(rest).is_none() {
            return Err(not_linkable(path));
        }

        let reuse = self
            .canonical(cid, rest)
            .and_then(|target| {
                self.assembly(cid)
                    .ok()?
                    .passthroughs
                    .alias_for(&target)
                    .map(str::to_string)
            });
        if let Some(alias) = reuse {
            if let Some(var) = self.node(cid)?.store.get(&alias) {
                return Ok(Some(Endpoint::existing(
                    path::join(child, &alias),
                    Some(child),
                    var,
                )));
            }
        }

        let (direction, var_type, value) = self.describe(cid, rest)?;
        let alias = self.nested_alias(cid, rest)?;
        Ok(Some(Endpoint {
            path: path::join(child, &alias),
            owner: Some(child.to_string()),
            direction,
            var_type,
            value,
            pending: Some(Pending::Nested {
                child: cid,
                inner: rest.to_string(),
                alias,
            }),
        }))
    }

    /// Direction, type and value of a variable anywhere below `scope`.
    fn describe(
        &self,
        scope: ComponentId,
        path: &str,
    ) -> Result<(Direction, VarType, Value), ModelError> {
        let (owner, var) = match path::split(path) {
            (None, name) => (scope, name),
            (Some(child), rest) => {
                let cid = self.child_id(scope, child)?;
                match self.node(cid)?.store.get(rest) {
                    Some(_) => (cid, rest),
                    None if self.is_assembly(cid) && path::owner(rest).is_some() => {
                        return self.describe(cid, rest);
                    }
                    None => return Err(not_linkable(path)),
                }
            }
        };
        let var = self
            .node(owner)?
            .store
            .get(var)
            .ok_or_else(|| not_linkable(path))?;
        Ok((var.direction, var.var_type.clone(), var.value.clone()))
    }

    /// The `child.var` path a deep path ends up at once every intermediate
    /// passthrough is followed, or `None` if some level has no passthrough.
    fn canonical(&self, scope: ComponentId, path: &str) -> Option<String> {
        match path::split(path) {
            (None, _) => None,
            (Some(_), rest) if path::owner(rest).is_none() => Some(path.to_string()),
            (Some(child), rest) => {
                let cid = self.child(scope, child)?;
                let inner = self.canonical(cid, rest)?;
                let alias = self.assembly(cid).ok()?.passthroughs.alias_for(&inner)?;
                Some(path::join(child, alias))
            }
        }
    }

    /// A free boundary name inside `scope` for a passthrough to `inner`.
    fn nested_alias(&self, scope: ComponentId, inner: &str) -> Result<String, ModelError> {
        let short = path::leaf(inner).to_string();
        let long = inner.replace('.', "_");
        for candidate in [&short, &long] {
            if self.check_new_name(scope, candidate).is_ok() {
                return Ok(candidate.clone());
            }
        }
        Err(ModelError::NameConflict {
            scope: self.pathname(scope),
            name: short,
        })
    }

    /// Whether boundary variable `name` of `scope` has a source in the parent.
    fn fed_from_parent(&self, scope: ComponentId, name: &str) -> Result<bool, ModelError> {
        let Some(parent) = self.parent(scope) else {
            return Ok(false);
        };
        let in_parent = path::join(&self.node(scope)?.name, name);
        Ok(self.assembly(parent)?.graph.source(&in_parent).is_some())
    }

    fn declare_passthrough(
        &mut self,
        scope: ComponentId,
        endpoint: &Endpoint,
        target: &str,
    ) -> Result<(), ModelError> {
        self.check_new_name(scope, &endpoint.path)?;
        self.node_mut(scope)?.store.insert(
            &endpoint.path,
            Variable {
                direction: endpoint.direction,
                var_type: endpoint.var_type.clone(),
                value: endpoint.value.clone(),
                valid: true,
            },
        );
        let asm = self.assembly_mut(scope)?;
        asm.graph.add_node(&endpoint.path);
        asm.passthroughs.register(&endpoint.path, target);

        PassthroughCreated {
            scope: &self.pathname(scope),
            alias: &endpoint.path,
            target,
            direction: endpoint.direction.as_str(),
        }
        .log();
        Ok(())
    }
}

fn not_linkable(path: &str) -> ModelError {
    ModelError::NotLinkable {
        path: path.to_string(),
    }
}

fn not_connected(a: &str, b: &str) -> ModelError {
    GraphError::NotConnected {
        src: a.to_string(),
        dst: b.to_string(),
    }
    .into()
}
