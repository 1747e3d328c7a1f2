// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the variable graph and the component graph.

use thiserror::Error;

/// Structural failures of the two dependency graphs.
///
/// None of these leave a graph partially mutated: every operation that
/// returns one of them has either not touched the graph or rolled back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The destination already has an incoming connection.
    #[error("'{dst}' is already connected to '{existing}'")]
    DuplicateDestination { dst: String, existing: String },

    /// Both endpoints belong to the same child component.
    #[error("cannot connect '{src}' to '{dst}': both are on component '{component}'")]
    SameComponent {
        src: String,
        dst: String,
        component: String,
    },

    /// There is no edge between the two endpoints.
    #[error("'{src}' is not connected to '{dst}'")]
    NotConnected { src: String, dst: String },

    /// Inserting the edge would close a loop in the component graph.
    ///
    /// `cycles` holds every strongly connected component of size > 1 that
    /// the tentative insertion produced, with member names sorted.
    #[error(
        "circular dependency ({}) would be created by connecting '{src}' to '{dst}'",
        format_cycles(.cycles)
    )]
    CyclicDependency {
        cycles: Vec<Vec<String>>,
        src: String,
        dst: String,
    },

    /// The path is not a node of the graph.
    #[error("'{path}' is not a variable in this scope")]
    UnknownVariable { path: String },
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|members| format!("{{{}}}", members.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_dependency_names_every_member() {
        let err = GraphError::CyclicDependency {
            cycles: vec![vec!["p".into(), "q".into(), "r".into()]],
            src: "r.out".into(),
            dst: "p.in".into(),
        };
        assert_eq!(
            err.to_string(),
            "circular dependency ({p, q, r}) would be created by connecting 'r.out' to 'p.in'"
        );
    }

    #[test]
    fn duplicate_destination_mentions_existing_source() {
        let err = GraphError::DuplicateDestination {
            dst: "b.in".into(),
            existing: "a.out".into(),
        };
        assert!(err.to_string().contains("a.out"));
    }
}
