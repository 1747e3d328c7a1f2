// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod adder;
pub mod concat;
pub mod identity;
pub mod scale;

pub use adder::*;
pub use concat::*;
pub use identity::*;
pub use scale::*;
