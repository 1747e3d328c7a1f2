// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency tracking and validity propagation for hierarchical component
//! assemblies.
//!
//! An assembly holds child components (leaves or nested assemblies) and
//! connects their variables. When a value changes, everything downstream is
//! marked invalid; when a stale value is read, its producers run first.
//!
//! ```
//! use serde_json::json;
//! use the_assembly::backends::local::Scale;
//! use the_assembly::model::Model;
//!
//! let mut model = Model::new("top");
//! let root = model.root();
//! model.add_component(root, "p", Box::new(Scale::new(2.0)))?;
//! model.add_component(root, "q", Box::new(Scale::new(10.0)))?;
//! model.connect(root, "p.y", "q.x")?;
//!
//! model.set(root, "p.x", json!(1.5))?;
//! model.run(root)?;
//! assert_eq!(model.get(root, "q.y")?, &json!(30.0));
//! # Ok::<(), the_assembly::errors::ModelError>(())
//! ```

pub mod backends;   // built-in leaf components
pub mod config;     // model files
pub mod engine;     // drivers and workflows
pub mod errors;     // error handling
pub mod graph;      // variable and component graphs
pub mod model;      // assemblies, connections, propagation
pub mod observability;
pub mod traits;     // component abstraction
