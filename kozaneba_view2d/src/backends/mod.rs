// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index backends.

mod flat;
mod grid;

pub use flat::FlatBackend;
pub use grid::GridBackend;
