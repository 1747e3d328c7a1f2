// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The two dependency graphs every assembly keeps.
//!
//! * [`VariableGraph`] - fine-grained edges between variable paths, used for
//!   invalidation and pull
//! * [`ComponentGraph`] - ref-counted edges between children, kept acyclic
//!   and used to order execution

pub mod component_graph;
pub mod path;
pub mod variable_graph;

pub use component_graph::{ComponentGraph, TopologicalOrder};
pub use variable_graph::{Link, VariableGraph};
