// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The ordered list of children an assembly's driver runs.

use crate::graph::ComponentGraph;

/// Members in dataflow order. The order is derived from the component graph
/// and cached until [`Workflow::config_changed`] is called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    members: Vec<String>,
    cached: Option<Vec<String>>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        if !self.members.iter().any(|m| m == name) {
            self.members.push(name.to_string());
            self.cached = None;
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.members.retain(|m| m != name);
        self.cached = None;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop the cached order; the next call to `order` recomputes it.
    pub fn config_changed(&mut self) {
        self.cached = None;
    }

    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// Members sources-first according to `graph`. Members the graph does
    /// not know follow in insertion order.
    pub fn order(&mut self, graph: &ComponentGraph) -> Vec<String> {
        if let Some(order) = &self.cached {
            return order.clone();
        }
        let mut order: Vec<String> = graph
            .topological_order()
            .filter(|name| self.contains(name))
            .map(str::to_string)
            .collect();
        for member in &self.members {
            if !order.contains(member) {
                order.push(member.clone());
            }
        }
        self.cached = Some(order.clone());
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_graph_and_appends_unknown_members() {
        let mut graph = ComponentGraph::new();
        graph.connect("b.out", "a.in").unwrap();

        let mut workflow = Workflow::new();
        workflow.add("a");
        workflow.add("loose");
        workflow.add("b");

        assert_eq!(workflow.order(&graph), vec!["b", "a", "loose"]);
    }

    #[test]
    fn order_is_cached_until_config_changes() {
        let mut graph = ComponentGraph::new();
        graph.add("a");
        graph.add("b");

        let mut workflow = Workflow::new();
        workflow.add("a");
        workflow.add("b");
        assert_eq!(workflow.order(&graph), vec!["a", "b"]);

        graph.connect("b.out", "a.in").unwrap();
        assert_eq!(workflow.order(&graph), vec!["a", "b"]);

        workflow.config_changed();
        assert!(workflow.is_stale());
        assert_eq!(workflow.order(&graph), vec!["b", "a"]);
    }

    #[test]
    fn removed_members_are_not_ordered() {
        let graph = ComponentGraph::new();
        let mut workflow = Workflow::new();
        workflow.add("a");
        workflow.add("b");
        workflow.remove("a");
        assert_eq!(workflow.order(&graph), vec!["b"]);
    }
}
