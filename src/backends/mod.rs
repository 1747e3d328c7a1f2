// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component backends.
//!
//! ## Local Backend
//! In-process Rust components for arithmetic and text:
//! - **Arithmetic**: `scale`, `adder`
//! - **Plumbing**: `identity`
//! - **Text**: `concat`
//!
//! Components are created by kind name through a factory, the same way a
//! model file refers to them:
//! ```text
//! Model file → LocalComponentFactory → Box<dyn Component> → Model
//! ```
//!
//! # Examples
//!
//! ```rust
//! use the_assembly::backends::local::{LocalComponentFactory, Options};
//!
//! let component = LocalComponentFactory::create("adder", &Options::new())?;
//! assert_eq!(component.kind(), "adder");
//! # Ok::<(), the_assembly::errors::ComponentError>(())
//! ```

pub mod local;
