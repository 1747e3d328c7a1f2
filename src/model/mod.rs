// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The component hierarchy and its validity engine.
//!
//! A [`Model`] owns every leaf component and nested assembly in one arena,
//! addressed by [`ComponentId`]. Each assembly keeps a variable graph and a
//! component graph over its direct children. Operations take the id of the
//! assembly they act in (the *scope*) and paths relative to it.
//!
//! * `hierarchy` - the arena, adding and removing children, `get`/`set`,
//!   merging child I/O graphs
//! * `connect` - connect, disconnect, passthroughs, connection listings
//! * `propagation` - forward invalidation and backward pull
//! * `store` - per-component values and validity flags
//! * `ports` - variable declarations and value validation

pub mod connect;
pub mod hierarchy;
pub mod passthrough;
pub mod ports;
pub mod propagation;
pub mod store;


pub use hierarchy::{Model, ASSEMBLY_KIND, DRIVER_NAME};
pub use passthrough::PassthroughRegistry;
pub use ports::{Direction, PortSpec, VarType};
pub use store::{VarStore, Variable};

/// Handle to a component or assembly inside a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);
