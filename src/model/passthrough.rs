// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use crate::graph::path;

/// Boundary variables of an assembly that forward to or from a child
/// variable, keyed by boundary name. Targets are relative to the assembly,
/// always `child.var`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassthroughRegistry {
    entries: IndexMap<String, String>,
}

impl PassthroughRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, alias: &str, target: &str) {
        self.entries.insert(alias.to_string(), target.to_string());
    }

    pub fn target(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// The boundary name already forwarding `target`, if any.
    pub fn alias_for(&self, target: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| t.as_str() == target)
            .map(|(alias, _)| alias.as_str())
    }

    /// Forget every passthrough whose target lives on `child`. The boundary
    /// variables themselves are left in place.
    pub fn remove_targeting(&mut self, child: &str) -> Vec<String> {
        let aliases: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, t)| path::owner(t) == Some(child))
            .map(|(alias, _)| alias.clone())
            .collect();
        for alias in &aliases {
            self.entries.shift_remove(alias);
        }
        aliases
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_both_ways() {
        let mut registry = PassthroughRegistry::new();
        registry.register("x", "p.x");
        assert_eq!(registry.target("x"), Some("p.x"));
        assert_eq!(registry.alias_for("p.x"), Some("x"));
        assert_eq!(registry.alias_for("p.y"), None);
    }

    #[test]
    fn remove_targeting_only_drops_that_child() {
        let mut registry = PassthroughRegistry::new();
        registry.register("x", "p.x");
        registry.register("y", "q.y");
        registry.register("z", "p.z");

        let removed = registry.remove_targeting("p");
        assert_eq!(removed, vec!["x".to_string(), "z".to_string()]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.target("y"), Some("q.y"));
    }
}
