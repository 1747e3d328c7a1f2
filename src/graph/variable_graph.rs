// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Variable Graph
//!
//! A directed graph over variable paths. Edges come in two flavours:
//!
//! - **connections** between variables of different owners (or boundary
//!   variables), created by `connect` and subject to the single-source rule;
//! - **internal edges** between an input and an output of the same child,
//!   merged in from the child's own I/O dependencies. They carry validity
//!   forward but never show up in connection listings and do not count
//!   toward the single-source rule.
//!
//! Both adjacency directions are stored so invalidation (forward) and pull
//! (backward) are each a single lookup.

use indexmap::IndexMap;

use crate::errors::GraphError;
use crate::graph::path;

/// Data carried by an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link {
    /// The destination is computed from an expression rather than copied
    /// from the source. Pull never resolves through such an edge.
    pub expression: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableGraph {
    succ: IndexMap<String, IndexMap<String, Link>>,
    pred: IndexMap<String, IndexMap<String, Link>>,
}

impl VariableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, path: &str) {
        if !self.succ.contains_key(path) {
            self.succ.insert(path.to_string(), IndexMap::new());
            self.pred.insert(path.to_string(), IndexMap::new());
        }
    }

    /// Remove nodes together with every edge touching them.
    pub fn remove_nodes<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for path in paths {
            let Some(outgoing) = self.succ.shift_remove(path) else {
                continue;
            };
            let incoming = self.pred.shift_remove(path).unwrap_or_default();
            for dst in outgoing.keys() {
                if let Some(preds) = self.pred.get_mut(dst) {
                    preds.shift_remove(path);
                }
            }
            for src in incoming.keys() {
                if let Some(succs) = self.succ.get_mut(src) {
                    succs.shift_remove(path);
                }
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.succ.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.succ.len()
    }

    /// Number of edges, internal ones included.
    pub fn edge_count(&self) -> usize {
        self.succ.values().map(|s| s.len()).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.succ.keys().map(String::as_str)
    }

    /// Insert a connection from `src` to `dst`.
    ///
    /// Fails with `SameComponent` when both paths belong to one child and with
    /// `DuplicateDestination` when `dst` is already fed by a connection.
    /// Missing nodes are created.
    pub fn connect(&mut self, src: &str, dst: &str, expression: bool) -> Result<(), GraphError> {
        if let (Some(a), Some(b)) = (path::owner(src), path::owner(dst)) {
            if a == b {
                return Err(GraphError::SameComponent {
                    src: src.to_string(),
                    dst: dst.to_string(),
                    component: a.to_string(),
                });
            }
        }
        if let Some(existing) = self.source(dst) {
            return Err(GraphError::DuplicateDestination {
                dst: dst.to_string(),
                existing: existing.to_string(),
            });
        }
        self.insert_edge(src, dst, Link { expression });
        Ok(())
    }

    /// Insert an edge between two variables of the same child.
    pub fn add_internal_edge(&mut self, src: &str, dst: &str) {
        self.insert_edge(src, dst, Link::default());
    }

    /// Drop every internal edge of child `owner`, keeping its nodes and its
    /// connections to the outside.
    pub fn remove_internal_edges(&mut self, owner: &str) {
        let internal: Vec<(String, String)> = self
            .succ
            .iter()
            .filter(|(src, _)| path::owner(src) == Some(owner))
            .flat_map(|(src, succs)| {
                succs
                    .keys()
                    .filter(|dst| path::owner(dst) == Some(owner))
                    .map(move |dst| (src.clone(), dst.clone()))
            })
            .collect();
        for (src, dst) in internal {
            self.remove_edge(&src, &dst);
        }
    }

    /// Remove the edge `src -> dst`, returning its link data.
    pub fn disconnect(&mut self, src: &str, dst: &str) -> Result<Link, GraphError> {
        self.remove_edge(src, dst)
            .ok_or_else(|| GraphError::NotConnected {
                src: src.to_string(),
                dst: dst.to_string(),
            })
    }

    pub fn has_edge(&self, src: &str, dst: &str) -> bool {
        self.link(src, dst).is_some()
    }

    pub fn link(&self, src: &str, dst: &str) -> Option<Link> {
        self.succ.get(src).and_then(|s| s.get(dst)).copied()
    }

    /// Every node with an edge into `path`, internal edges included.
    pub fn predecessors<'a>(&'a self, path: &str) -> impl Iterator<Item = (&'a str, Link)> + 'a {
        self.pred
            .get(path)
            .into_iter()
            .flat_map(|preds| preds.iter().map(|(p, l)| (p.as_str(), *l)))
    }

    /// Every node `path` has an edge into, internal edges included.
    pub fn successors<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.succ
            .get(path)
            .into_iter()
            .flat_map(|succs| succs.keys().map(String::as_str))
    }

    /// Connections feeding `path`, i.e. predecessors outside its own owner.
    /// The single-source rule keeps this at most one long.
    pub fn sources<'a>(&'a self, path: &'a str) -> impl Iterator<Item = (&'a str, Link)> + 'a {
        self.predecessors(path)
            .filter(move |(src, _)| !path::is_internal_edge(src, path))
    }

    pub fn source<'a>(&'a self, path: &'a str) -> Option<&'a str> {
        self.sources(path).next().map(|(src, _)| src)
    }

    /// True if `path` is fed from outside its own owning scope: either an input
    /// connected to an output, or the destination half of a passthrough.
    pub fn is_destination(&self, path: &str) -> bool {
        self.source(path).is_some()
    }

    /// Connections touching `path`: outgoing first, then incoming.
    pub fn connections_of(&self, path: &str) -> Vec<(String, String)> {
        let outgoing = self
            .successors(path)
            .filter(|dst| !path::is_internal_edge(path, dst))
            .map(|dst| (path.to_string(), dst.to_string()));
        let incoming = self
            .sources(path)
            .map(|(src, _)| (src.to_string(), path.to_string()));
        outgoing.chain(incoming).collect()
    }

    /// All connections, internal edges filtered out.
    pub fn connections(&self) -> Vec<(String, String)> {
        self.succ
            .iter()
            .flat_map(|(src, succs)| {
                succs
                    .keys()
                    .filter(move |dst| !path::is_internal_edge(src, dst))
                    .map(move |dst| (src.clone(), dst.clone()))
            })
            .collect()
    }

    fn insert_edge(&mut self, src: &str, dst: &str, link: Link) {
        self.add_node(src);
        self.add_node(dst);
        if let Some(succs) = self.succ.get_mut(src) {
            succs.insert(dst.to_string(), link);
        }
        if let Some(preds) = self.pred.get_mut(dst) {
            preds.insert(src.to_string(), link);
        }
    }

    fn remove_edge(&mut self, src: &str, dst: &str) -> Option<Link> {
        let link = self.succ.get_mut(src)?.shift_remove(dst)?;
        if let Some(preds) = self.pred.get_mut(dst) {
            preds.shift_remove(src);
        }
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> VariableGraph {
        let mut graph = VariableGraph::new();
        graph.add_internal_edge("p.in", "p.out");
        graph.add_internal_edge("q.in", "q.out");
        graph.connect("p.out", "q.in", false).unwrap();
        graph
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = VariableGraph::new();
        graph.add_node("x");
        graph.add_node("x");
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn second_source_is_rejected() {
        let mut graph = chain();
        graph.add_node("r.out");

        let err = graph.connect("r.out", "q.in", false).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateDestination {
                dst: "q.in".into(),
                existing: "p.out".into(),
            }
        );
        assert_eq!(graph.source("q.in"), Some("p.out"));
        assert!(!graph.has_edge("r.out", "q.in"));
    }

    #[test]
    fn same_component_is_rejected() {
        let mut graph = VariableGraph::new();
        let err = graph.connect("p.out", "p.in", false).unwrap_err();
        assert!(matches!(err, GraphError::SameComponent { ref component, .. } if component == "p"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn boundary_to_boundary_is_allowed() {
        let mut graph = VariableGraph::new();
        graph.connect("x", "y", false).unwrap();
        assert!(graph.is_destination("y"));
    }

    #[test]
    fn internal_edges_are_not_connections() {
        let graph = chain();
        assert!(!graph.is_destination("q.out"));
        assert!(graph.is_destination("q.in"));
        assert_eq!(graph.connections(), vec![("p.out".to_string(), "q.in".to_string())]);
        assert_eq!(graph.predecessors("q.out").count(), 1);
    }

    #[test]
    fn internal_edges_do_not_block_a_connection() {
        let mut graph = VariableGraph::new();
        graph.add_internal_edge("q.a", "q.b");
        graph.connect("x", "q.b", false).unwrap();
        assert_eq!(graph.source("q.b"), Some("x"));
    }

    #[test]
    fn disconnect_missing_edge_fails() {
        let mut graph = chain();
        let err = graph.disconnect("q.in", "p.out").unwrap_err();
        assert!(matches!(err, GraphError::NotConnected { .. }));

        let link = graph.disconnect("p.out", "q.in").unwrap();
        assert!(!link.expression);
        assert!(!graph.is_destination("q.in"));
    }

    #[test]
    fn remove_nodes_drops_incident_edges() {
        let mut graph = chain();
        graph.remove_nodes(["q.in", "q.out"]);

        assert!(!graph.contains("q.in"));
        assert_eq!(graph.successors("p.out").count(), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn remove_internal_edges_keeps_connections() {
        let mut graph = chain();
        graph.remove_internal_edges("q");

        assert!(graph.contains("q.out"));
        assert!(!graph.has_edge("q.in", "q.out"));
        assert!(graph.has_edge("p.out", "q.in"));
    }

    #[test]
    fn expression_flag_is_kept_on_the_edge() {
        let mut graph = VariableGraph::new();
        graph.connect("p.out", "total", true).unwrap();
        assert_eq!(graph.link("p.out", "total"), Some(Link { expression: true }));
    }

    #[test]
    fn connections_of_lists_both_directions() {
        let mut graph = chain();
        graph.connect("q.out", "r.in", false).unwrap();

        let edges = graph.connections_of("q.in");
        assert_eq!(edges, vec![("p.out".to_string(), "q.in".to_string())]);

        let edges = graph.connections_of("p.out");
        assert_eq!(edges, vec![("p.out".to_string(), "q.in".to_string())]);
    }
}
