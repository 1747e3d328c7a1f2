// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component Graph
//!
//! Coarse dependency graph over the children of one assembly. Every variable
//! connection between two distinct children adds one reference to the edge
//! between their components; the edge disappears when the last reference is
//! removed. The graph is kept acyclic: an insertion that closes a loop is
//! rolled back before the error is returned.

use std::collections::VecDeque;

use indexmap::IndexMap;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction::{Incoming, Outgoing};

use crate::errors::GraphError;
use crate::graph::path;
use crate::observability::messages::graph::CycleRejected;
use crate::observability::messages::StructuredLog;

/// Node weights are component names, edge weights are reference counts.
#[derive(Debug, Clone, Default)]
pub struct ComponentGraph {
    graph: StableDiGraph<String, usize>,
    nodes: IndexMap<String, NodeIndex>,
}

impl ComponentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component node. Adding an existing name is a no-op.
    pub fn add(&mut self, name: &str) {
        self.ensure_node(name);
    }

    /// Remove a component together with all of its edges.
    pub fn remove(&mut self, name: &str) {
        if let Some(idx) = self.nodes.shift_remove(name) {
            self.graph.remove_node(idx);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Reference count of the edge `a -> b`, or 0 when there is no edge.
    pub fn refcount(&self, a: &str, b: &str) -> usize {
        self.edge_between(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
            .unwrap_or(0)
    }

    /// Record a connection from variable `src_path` to variable `dst_path`.
    ///
    /// Both paths must be owned by children (`comp.var`). The component edge
    /// is created with a count of one or incremented. If the result is
    /// cyclic, the insertion is undone and `CyclicDependency` lists every
    /// strongly connected component of size > 1.
    pub fn connect(&mut self, src_path: &str, dst_path: &str) -> Result<(), GraphError> {
        let (src, dst) = match (path::owner(src_path), path::owner(dst_path)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(()),
        };
        if src == dst {
            return Err(GraphError::SameComponent {
                src: src_path.to_string(),
                dst: dst_path.to_string(),
                component: src.to_string(),
            });
        }

        let src_existed = self.contains(src);
        let dst_existed = self.contains(dst);
        let a = self.ensure_node(src);
        let b = self.ensure_node(dst);

        let edge = match self.graph.find_edge(a, b) {
            Some(edge) => {
                if let Some(count) = self.graph.edge_weight_mut(edge) {
                    *count += 1;
                }
                // an existing edge cannot introduce a new cycle
                return Ok(());
            }
            None => self.graph.add_edge(a, b, 1),
        };

        if !is_cyclic_directed(&self.graph) {
            return Ok(());
        }

        let cycles = self.cycles();
        self.graph.remove_edge(edge);
        if !dst_existed {
            self.remove(dst);
        }
        if !src_existed {
            self.remove(src);
        }

        CycleRejected {
            src: src_path,
            dst: dst_path,
            cycles: &cycles,
        }
        .log();

        Err(GraphError::CyclicDependency {
            cycles,
            src: src_path.to_string(),
            dst: dst_path.to_string(),
        })
    }

    /// Drop one reference from the edge `a -> b`, deleting it at zero.
    pub fn disconnect(&mut self, a: &str, b: &str) -> Result<(), GraphError> {
        let edge = self
            .edge_between(a, b)
            .ok_or_else(|| GraphError::NotConnected {
                src: a.to_string(),
                dst: b.to_string(),
            })?;
        let remaining = match self.graph.edge_weight_mut(edge) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            self.graph.remove_edge(edge);
        }
        Ok(())
    }

    /// All edges as `(src, dst, refcount)`, sorted for stable comparison.
    pub fn edges(&self) -> Vec<(String, String, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some((
                    self.graph[a].clone(),
                    self.graph[b].clone(),
                    self.graph[e],
                ))
            })
            .collect();
        edges.sort();
        edges
    }

    /// Component names ordered so every source comes before its sinks.
    ///
    /// Kahn's algorithm, evaluated lazily. Ties are broken by insertion
    /// order so the sequence is stable for a given construction history.
    pub fn topological_order(&self) -> TopologicalOrder<'_> {
        let in_degree: IndexMap<NodeIndex, usize> = self
            .nodes
            .values()
            .map(|&idx| (idx, self.graph.neighbors_directed(idx, Incoming).count()))
            .collect();
        let ready = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&idx, _)| idx)
            .collect();
        TopologicalOrder {
            graph: self,
            in_degree,
            ready,
        }
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    fn edge_between(&self, a: &str, b: &str) -> Option<petgraph::stable_graph::EdgeIndex> {
        let a = *self.nodes.get(a)?;
        let b = *self.nodes.get(b)?;
        self.graph.find_edge(a, b)
    }

    fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl PartialEq for ComponentGraph {
    fn eq(&self, other: &Self) -> bool {
        let mut mine: Vec<&String> = self.nodes.keys().collect();
        let mut theirs: Vec<&String> = other.nodes.keys().collect();
        mine.sort();
        theirs.sort();
        mine == theirs && self.edges() == other.edges()
    }
}

/// Lazy topological walk over a [`ComponentGraph`].
pub struct TopologicalOrder<'a> {
    graph: &'a ComponentGraph,
    in_degree: IndexMap<NodeIndex, usize>,
    ready: VecDeque<NodeIndex>,
}

impl<'a> Iterator for TopologicalOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.ready.pop_front()?;
        let graph = &self.graph.graph;
        for next in graph.neighbors_directed(current, Outgoing) {
            if let Some(degree) = self.in_degree.get_mut(&next) {
                *degree -= 1;
                if *degree == 0 {
                    self.ready.push_back(next);
                }
            }
        }
        graph.node_weight(current).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ComponentGraph {
        let mut graph = ComponentGraph::new();
        graph.connect("p.out", "q.in").unwrap();
        graph.connect("q.out", "r.in").unwrap();
        graph
    }

    #[test]
    fn repeated_connections_share_one_edge() {
        let mut graph = ComponentGraph::new();
        graph.connect("a.x", "b.x").unwrap();
        graph.connect("a.y", "b.y").unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.refcount("a", "b"), 2);

        graph.disconnect("a", "b").unwrap();
        assert_eq!(graph.refcount("a", "b"), 1);
        graph.disconnect("a", "b").unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains("a"));
    }

    #[test]
    fn cycle_is_rejected_and_rolled_back() {
        let mut graph = chain();
        let before = graph.clone();

        let err = graph.connect("r.out", "p.in").unwrap_err();
        assert_eq!(
            err,
            GraphError::CyclicDependency {
                cycles: vec![vec!["p".into(), "q".into(), "r".into()]],
                src: "r.out".into(),
                dst: "p.in".into(),
            }
        );
        assert_eq!(graph, before);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn two_node_cycle_rolls_back_new_node() {
        let mut graph = ComponentGraph::new();
        graph.connect("a.out", "b.in").unwrap();
        let err = graph.connect("b.out", "a.in").unwrap_err();
        assert!(matches!(err, GraphError::CyclicDependency { ref cycles, .. } if cycles == &vec![vec!["a".to_string(), "b".to_string()]]));
        assert_eq!(graph.refcount("a", "b"), 1);
        assert_eq!(graph.refcount("b", "a"), 0);
    }

    #[test]
    fn same_component_is_rejected() {
        let mut graph = ComponentGraph::new();
        let err = graph.connect("a.out", "a.in").unwrap_err();
        assert!(matches!(err, GraphError::SameComponent { .. }));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn disconnect_without_edge_fails() {
        let mut graph = chain();
        assert_eq!(
            graph.disconnect("r", "p").unwrap_err(),
            GraphError::NotConnected {
                src: "r".into(),
                dst: "p".into()
            }
        );
    }

    #[test]
    fn connect_then_disconnect_restores_graph() {
        let mut graph = chain();
        let before = graph.clone();

        graph.connect("p.out2", "r.in2").unwrap();
        graph.connect("p.out", "q.in2").unwrap();
        graph.disconnect("p", "r").unwrap();
        graph.disconnect("p", "q").unwrap();

        assert_eq!(graph, before);
    }

    #[test]
    fn topological_order_puts_sources_first() {
        let mut graph = ComponentGraph::new();
        graph.add("lonely");
        graph.connect("c.out", "d.in").unwrap();
        graph.connect("a.out", "c.in").unwrap();
        graph.connect("b.out", "c.in2").unwrap();

        let order: Vec<&str> = graph.topological_order().collect();
        assert_eq!(order.len(), 5);

        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(position("a") < position("c"));
        assert!(position("b") < position("c"));
        assert!(position("c") < position("d"));
    }

    #[test]
    fn topological_order_is_lazy() {
        let graph = chain();
        let mut order = graph.topological_order();
        assert_eq!(order.next(), Some("p"));
        assert_eq!(order.next(), Some("q"));
        assert_eq!(order.next(), Some("r"));
        assert_eq!(order.next(), None);
    }

    #[test]
    fn remove_drops_incident_edges() {
        let mut graph = chain();
        graph.remove("q");
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.topological_order().count(), 2);
    }
}
