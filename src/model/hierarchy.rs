// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The component arena.
//!
//! Every leaf and nested assembly lives in one map owned by [`Model`], with a
//! link to its parent. Walking up (notify the parent) and down (delegate to a
//! child) is a lookup by id, so no node ever holds a reference to another.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::engine::Workflow;
use crate::errors::ModelError;
use crate::graph::{path, ComponentGraph, VariableGraph};
use crate::model::{ComponentId, Direction, PassthroughRegistry, PortSpec, VarStore};
use crate::observability::messages::graph::{ChildAdded, ChildGraphMerged, ChildRemoved};
use crate::observability::messages::propagation::ValueSet;
use crate::observability::messages::StructuredLog;
use crate::traits::Component;

/// Child name taken by every assembly's implicit driver.
pub const DRIVER_NAME: &str = "driver";

/// Kind reported for nested assemblies.
pub const ASSEMBLY_KIND: &str = "assembly";

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) store: VarStore,
    pub(crate) kind: NodeKind,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Leaf(LeafState),
    Assembly(AssemblyState),
}

#[derive(Debug)]
pub(crate) struct LeafState {
    pub(crate) component: Box<dyn Component>,
    pub(crate) executed: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AssemblyState {
    pub(crate) graph: VariableGraph,
    pub(crate) comp_graph: ComponentGraph,
    pub(crate) children: IndexMap<String, ComponentId>,
    /// Structural version of each child at the time its I/O graph was merged.
    pub(crate) io_versions: IndexMap<String, u64>,
    pub(crate) structure_version: u64,
    pub(crate) workflow: Workflow,
    pub(crate) passthroughs: PassthroughRegistry,
}

/// Variables and graphs of every node, taken before a multi-step mutation.
/// Components themselves are not part of it; nothing that restores a
/// snapshot runs them in between.
#[derive(Debug)]
pub(crate) struct Snapshot {
    nodes: Vec<(ComponentId, VarStore, Option<AssemblyState>)>,
}

/// A hierarchy of components rooted at one assembly.
#[derive(Debug)]
pub struct Model {
    nodes: IndexMap<ComponentId, Node>,
    next_id: usize,
    root: ComponentId,
}

impl Model {
    /// An empty model whose root assembly is called `name`.
    pub fn new(name: &str) -> Self {
        let root = ComponentId(0);
        let mut nodes = IndexMap::new();
        nodes.insert(
            root,
            Node {
                name: name.to_string(),
                parent: None,
                store: VarStore::new(),
                kind: NodeKind::Assembly(AssemblyState::default()),
            },
        );
        Self {
            nodes,
            next_id: 1,
            root,
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Dotted path from the root, root name included.
    pub fn pathname(&self, id: ComponentId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names.join(".")
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn is_assembly(&self, id: ComponentId) -> bool {
        matches!(
            self.nodes.get(&id).map(|n| &n.kind),
            Some(NodeKind::Assembly(_))
        )
    }

    /// Registry kind of a leaf, or `"assembly"`.
    pub fn kind(&self, id: ComponentId) -> Option<&str> {
        self.nodes.get(&id).map(|n| match &n.kind {
            NodeKind::Leaf(leaf) => leaf.component.kind(),
            NodeKind::Assembly(_) => ASSEMBLY_KIND,
        })
    }

    pub fn child(&self, scope: ComponentId, name: &str) -> Option<ComponentId> {
        self.assembly(scope)
            .ok()
            .and_then(|a| a.children.get(name).copied())
    }

    pub fn children(&self, scope: ComponentId) -> Vec<String> {
        self.assembly(scope)
            .map(|a| a.children.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up a component by its dotted path below the root, e.g. `"sub.p"`.
    pub fn find(&self, path: &str) -> Option<ComponentId> {
        path.split('.')
            .try_fold(self.root, |scope, name| self.child(scope, name))
    }

    pub fn store(&self, id: ComponentId) -> Option<&VarStore> {
        self.nodes.get(&id).map(|n| &n.store)
    }

    pub fn variable_graph(&self, scope: ComponentId) -> Result<&VariableGraph, ModelError> {
        Ok(&self.assembly(scope)?.graph)
    }

    pub fn component_graph(&self, scope: ComponentId) -> Result<&ComponentGraph, ModelError> {
        Ok(&self.assembly(scope)?.comp_graph)
    }

    pub fn passthroughs(&self, scope: ComponentId) -> Result<&PassthroughRegistry, ModelError> {
        Ok(&self.assembly(scope)?.passthroughs)
    }

    /// Children of `scope` in the order its driver runs them.
    pub fn workflow_order(&mut self, scope: ComponentId) -> Result<Vec<String>, ModelError> {
        let asm = self.assembly_mut(scope)?;
        Ok(asm.workflow.order(&asm.comp_graph))
    }

    pub fn add_component(
        &mut self,
        scope: ComponentId,
        name: &str,
        component: Box<dyn Component>,
    ) -> Result<ComponentId, ModelError> {
        let store = VarStore::from_ports(&component.ports());
        let kind = NodeKind::Leaf(LeafState {
            component,
            executed: false,
        });
        self.insert_child(scope, name, store, kind)
    }

    pub fn add_assembly(&mut self, scope: ComponentId, name: &str) -> Result<ComponentId, ModelError> {
        let kind = NodeKind::Assembly(AssemblyState::default());
        self.insert_child(scope, name, VarStore::new(), kind)
    }

    /// Declare a plain boundary variable on an assembly.
    pub fn add_variable(&mut self, scope: ComponentId, spec: PortSpec) -> Result<(), ModelError> {
        self.check_new_name(scope, &spec.name)?;
        self.node_mut(scope)?.store.declare(&spec);
        let asm = self.assembly_mut(scope)?;
        asm.graph.add_node(&spec.name);
        asm.structure_version += 1;
        Ok(())
    }

    /// Remove a child and everything that refers to it: its connections,
    /// its variable-graph nodes, its component-graph node, passthroughs
    /// targeting it, and its whole subtree.
    pub fn remove(&mut self, scope: ComponentId, name: &str) -> Result<(), ModelError> {
        let cid = self.child_id(scope, name)?;
        self.sync_child_io(scope)?;
        let removed_version = self.io_version(cid);

        let edges: Vec<(String, String)> = self
            .assembly(scope)?
            .graph
            .connections()
            .into_iter()
            .filter(|(s, d)| path::owner(s) == Some(name) || path::owner(d) == Some(name))
            .collect();
        for (src, dst) in &edges {
            self.remove_connection(scope, src, dst)?;
        }

        let asm = self.assembly_mut(scope)?;
        let stale: Vec<String> = asm
            .graph
            .nodes()
            .filter(|n| path::owner(n) == Some(name))
            .map(str::to_string)
            .collect();
        asm.graph.remove_nodes(stale.iter().map(String::as_str));
        asm.comp_graph.remove(name);
        asm.workflow.remove(name);
        asm.io_versions.shift_remove(name);
        asm.children.shift_remove(name);
        asm.passthroughs.remove_targeting(name);
        // keep the summed version strictly increasing
        asm.structure_version = asm
            .structure_version
            .wrapping_add(removed_version)
            .wrapping_add(1);

        self.remove_subtree(cid);

        ChildRemoved {
            scope: &self.pathname(scope),
            name,
            connections_removed: edges.len(),
        }
        .log();
        Ok(())
    }

    /// Value of a variable anywhere below `scope`.
    pub fn get(&self, scope: ComponentId, path: &str) -> Result<&Value, ModelError> {
        match path::split(path) {
            (None, name) => self
                .node(scope)?
                .store
                .value(name)
                .ok_or_else(|| ModelError::unknown_variable(path)),
            (Some(child), rest) => {
                let cid = self.child_id(scope, child)?;
                if self.is_assembly(cid) {
                    self.get(cid, rest)
                } else {
                    self.node(cid)?
                        .store
                        .value(rest)
                        .ok_or_else(|| ModelError::unknown_variable(path))
                }
            }
        }
    }

    /// Assign a variable directly.
    ///
    /// The value is validated first; a variable fed by a connection is
    /// refused with `ConnectedInput`. Everything depending on the variable is
    /// invalidated (the parent included) before the value is stored, and the
    /// variable itself ends up valid.
    pub fn set(&mut self, scope: ComponentId, path: &str, value: Value) -> Result<(), ModelError> {
        let (owner, name) = match path::split(path) {
            (Some(child), rest) => {
                let cid = self.child_id(scope, child)?;
                if self.is_assembly(cid) {
                    return self.set(cid, rest, value);
                }
                (cid, rest)
            }
            (None, name) => (scope, name),
        };

        let var = self
            .node(owner)?
            .store
            .get(name)
            .ok_or_else(|| ModelError::unknown_variable(path))?;
        var.var_type
            .validate(&value)
            .map_err(|reason| ModelError::TypeOrRangeError {
                path: path.to_string(),
                reason,
            })?;
        let direction = var.direction;

        if let Some(src) = self.assembly(scope)?.graph.source(path) {
            return Err(ModelError::ConnectedInput {
                path: path.to_string(),
                src: src.to_string(),
            });
        }
        let parent = self.parent(scope);
        let in_parent = path::join(&self.node(scope)?.name, path);
        if let (Some(parent), None) = (parent, path::owner(path)) {
            if let Some(src) = self.assembly(parent)?.graph.source(&in_parent) {
                return Err(ModelError::ConnectedInput {
                    path: path.to_string(),
                    src: src.to_string(),
                });
            }
        }

        ValueSet {
            scope: &self.pathname(scope),
            path,
            value: &value,
        }
        .log();

        self.sync_child_io(scope)?;
        self.invalidate_deps(scope, &[path.to_string()], true)?;
        if let (Some(parent), None, Direction::Out) = (parent, path::owner(path), direction) {
            // a boundary output has no successors here, only in the parent
            self.invalidate_deps(parent, &[in_parent], true)?;
        }
        self.receive_at(scope, path, value)
    }

    /// Validity of variables of `scope` itself or of its direct children.
    pub fn get_valids(&self, scope: ComponentId, names: &[&str]) -> Result<Vec<bool>, ModelError> {
        names
            .iter()
            .map(|name| {
                let (owner, var) = match path::split(name) {
                    (None, var) => (scope, var),
                    (Some(child), var) => (self.child_id(scope, child)?, var),
                };
                self.node(owner)?
                    .store
                    .is_valid(var)
                    .ok_or_else(|| ModelError::unknown_variable(*name))
            })
            .collect()
    }

    /// Bring the merged I/O graph of every child of `scope` up to date,
    /// re-merging only children whose structural version moved.
    pub(crate) fn sync_child_io(&mut self, scope: ComponentId) -> Result<(), ModelError> {
        let children: Vec<(String, ComponentId)> = self
            .assembly(scope)?
            .children
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();

        for (name, cid) in children {
            if self.is_assembly(cid) {
                self.sync_child_io(cid)?;
            }
            let version = self.io_version(cid);
            if self.assembly(scope)?.io_versions.get(&name) == Some(&version) {
                continue;
            }

            let edges = self.io_graph(cid);
            let vars: Vec<String> = self
                .node(cid)?
                .store
                .iter()
                .map(|(var, _)| var.to_string())
                .collect();
            let scope_name = self.pathname(scope);

            let asm = self.assembly_mut(scope)?;
            asm.graph.remove_internal_edges(&name);
            for var in &vars {
                asm.graph.add_node(&path::join(&name, var));
            }
            for (input, output) in &edges {
                asm.graph
                    .add_internal_edge(&path::join(&name, input), &path::join(&name, output));
            }
            asm.io_versions.insert(name.clone(), version);

            ChildGraphMerged {
                scope: &scope_name,
                child: &name,
                version,
                edge_count: edges.len(),
            }
            .log();
        }
        Ok(())
    }

    /// Structural version of a node's I/O graph.
    ///
    /// A leaf reports its own; an assembly adds its counter to the sum of its
    /// children's, so a change anywhere below moves every ancestor.
    pub(crate) fn io_version(&self, id: ComponentId) -> u64 {
        match self.nodes.get(&id).map(|n| &n.kind) {
            Some(NodeKind::Leaf(leaf)) => leaf.component.io_version(),
            Some(NodeKind::Assembly(asm)) => asm
                .children
                .values()
                .fold(asm.structure_version, |acc, child| {
                    acc.wrapping_add(self.io_version(*child))
                }),
            None => 0,
        }
    }

    /// Internal `(input, output)` dependency pairs of a node.
    ///
    /// For an assembly these are the boundary outputs reachable from each
    /// boundary input through its variable graph.
    pub(crate) fn io_graph(&self, id: ComponentId) -> Vec<(String, String)> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let asm = match &node.kind {
            NodeKind::Leaf(leaf) => return leaf.component.io_dependencies(),
            NodeKind::Assembly(asm) => asm,
        };

        let mut pairs = Vec::new();
        for input in node.store.names(Direction::In, None) {
            let mut seen: IndexSet<String> = IndexSet::new();
            let mut queue: VecDeque<String> = VecDeque::from([input.clone()]);
            while let Some(current) = queue.pop_front() {
                for next in asm.graph.successors(&current) {
                    if seen.insert(next.to_string()) {
                        queue.push_back(next.to_string());
                    }
                }
            }
            for reached in seen {
                if path::owner(&reached).is_none()
                    && node.store.direction(&reached) == Some(Direction::Out)
                {
                    pairs.push((input.clone(), reached));
                }
            }
        }
        pairs
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, node)| {
                let asm = match &node.kind {
                    NodeKind::Assembly(asm) => Some(asm.clone()),
                    NodeKind::Leaf(_) => None,
                };
                (*id, node.store.clone(), asm)
            })
            .collect();
        Snapshot { nodes }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        for (id, store, saved) in snapshot.nodes {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            node.store = store;
            if let (NodeKind::Assembly(asm), Some(saved)) = (&mut node.kind, saved) {
                *asm = saved;
            }
        }
    }

    pub(crate) fn node(&self, id: ComponentId) -> Result<&Node, ModelError> {
        self.nodes.get(&id).ok_or_else(|| missing(id))
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node, ModelError> {
        self.nodes.get_mut(&id).ok_or_else(|| missing(id))
    }

    pub(crate) fn assembly(&self, id: ComponentId) -> Result<&AssemblyState, ModelError> {
        match &self.node(id)?.kind {
            NodeKind::Assembly(asm) => Ok(asm),
            NodeKind::Leaf(_) => Err(ModelError::NotAnAssembly {
                scope: self.pathname(id),
            }),
        }
    }

    pub(crate) fn assembly_mut(&mut self, id: ComponentId) -> Result<&mut AssemblyState, ModelError> {
        if !self.is_assembly(id) {
            self.node(id)?;
            return Err(ModelError::NotAnAssembly {
                scope: self.pathname(id),
            });
        }
        match &mut self.node_mut(id)?.kind {
            NodeKind::Assembly(asm) => Ok(asm),
            NodeKind::Leaf(_) => Err(missing(id)),
        }
    }

    pub(crate) fn child_id(&self, scope: ComponentId, name: &str) -> Result<ComponentId, ModelError> {
        self.assembly(scope)?
            .children
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownComponent {
                scope: self.pathname(scope),
                name: name.to_string(),
            })
    }

    /// The node storing `path` (a boundary name or `child.var`) and the
    /// variable's name there.
    pub(crate) fn owner_of<'p>(
        &self,
        scope: ComponentId,
        path: &'p str,
    ) -> Result<(ComponentId, &'p str), ModelError> {
        match path::split(path) {
            (None, name) => Ok((scope, name)),
            (Some(child), var) => Ok((self.child_id(scope, child)?, var)),
        }
    }

    pub(crate) fn valid_at(&self, scope: ComponentId, path: &str) -> Result<bool, ModelError> {
        let (owner, var) = self.owner_of(scope, path)?;
        self.node(owner)?
            .store
            .is_valid(var)
            .ok_or_else(|| ModelError::unknown_variable(path))
    }

    /// Set a validity flag, returning the previous one.
    pub(crate) fn set_valid_at(
        &mut self,
        scope: ComponentId,
        path: &str,
        valid: bool,
    ) -> Result<bool, ModelError> {
        let (owner, var) = self.owner_of(scope, path)?;
        self.node_mut(owner)?
            .store
            .set_valid(var, valid)
            .ok_or_else(|| ModelError::unknown_variable(path))
    }

    pub(crate) fn value_at(&self, scope: ComponentId, path: &str) -> Result<Value, ModelError> {
        let (owner, var) = self.owner_of(scope, path)?;
        self.node(owner)?
            .store
            .value(var)
            .cloned()
            .ok_or_else(|| ModelError::unknown_variable(path))
    }

    pub(crate) fn receive_at(
        &mut self,
        scope: ComponentId,
        path: &str,
        value: Value,
    ) -> Result<(), ModelError> {
        let (owner, var) = self.owner_of(scope, path)?;
        let store = &mut self.node_mut(owner)?.store;
        if !store.contains(var) {
            return Err(ModelError::unknown_variable(path));
        }
        store
            .receive(var, value)
            .map_err(|reason| ModelError::TypeOrRangeError {
                path: path.to_string(),
                reason,
            })
    }

    pub(crate) fn check_new_name(&self, scope: ComponentId, name: &str) -> Result<(), ModelError> {
        if !path::is_valid_name(name) {
            return Err(ModelError::InvalidName {
                name: name.to_string(),
            });
        }
        let taken = name == DRIVER_NAME
            || self.assembly(scope)?.children.contains_key(name)
            || self.node(scope)?.store.contains(name);
        if taken {
            return Err(ModelError::NameConflict {
                scope: self.pathname(scope),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert_child(
        &mut self,
        scope: ComponentId,
        name: &str,
        store: VarStore,
        kind: NodeKind,
    ) -> Result<ComponentId, ModelError> {
        self.check_new_name(scope, name)?;

        let id = ComponentId(self.next_id);
        self.next_id += 1;
        let kind_name = match &kind {
            NodeKind::Leaf(leaf) => leaf.component.kind().to_string(),
            NodeKind::Assembly(_) => ASSEMBLY_KIND.to_string(),
        };
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent: Some(scope),
                store,
                kind,
            },
        );

        let asm = self.assembly_mut(scope)?;
        asm.children.insert(name.to_string(), id);
        asm.comp_graph.add(name);
        asm.workflow.add(name);
        asm.structure_version += 1;

        ChildAdded {
            scope: &self.pathname(scope),
            name,
            kind: &kind_name,
        }
        .log();
        Ok(id)
    }

    fn remove_subtree(&mut self, id: ComponentId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.shift_remove(&current) {
                if let NodeKind::Assembly(asm) = node.kind {
                    pending.extend(asm.children.values().copied());
                }
            }
        }
    }
}

fn missing(id: ComponentId) -> ModelError {
    ModelError::UnknownComponent {
        scope: String::new(),
        name: format!("#{}", id.0),
    }
}
