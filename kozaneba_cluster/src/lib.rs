// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kozaneba Cluster: grid-connectivity clustering of placed notes.
//!
//! After placement every note owns a unique grid cell. Notes whose cells touch
//! along an edge (north, south, east or west) belong to the same connected
//! component. This crate finds those components with a breadth-first search,
//! keeps the ones that reach a minimum size, and describes each as a
//! [`Cluster`]: a bounding rectangle plus the member ids and texts.
//!
//! Components partition the notes, so clusters never overlap. Discovery order
//! follows the note order, which makes the `C1`, `C2`, … ids reproducible.
//!
//! [`ClusterSet`] holds the current clusters under a generation counter so
//! that summaries computed asynchronously for an earlier extraction can be
//! recognized and dropped.
//!
//! ## Minimal example
//!
//! ```rust
//! use kozaneba_cluster::{ClusterSet, extract_clusters};
//! use kozaneba_layout::{LayoutParams, RawNote, layout_notes};
//! use kurbo::Point;
//!
//! let raw = (0..12)
//!     .map(|i| RawNote {
//!         id: format!("n{i}"),
//!         text: format!("note {i}"),
//!         position: Point::new(f64::from(i) / 32.0, 0.0),
//!     })
//!     .collect();
//! let layout = layout_notes(raw, LayoutParams::default()).unwrap();
//!
//! let mut set = ClusterSet::new();
//! let generation = set.replace(extract_clusters(&layout.notes, 10));
//! assert_eq!(set.len(), 1);
//!
//! let id = set.clusters()[0].id;
//! assert!(set.attach_summary(generation, id, "a row of notes".into()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cluster;
mod extract;

pub use cluster::{Cluster, ClusterId, ClusterSet, ParseClusterIdError};
pub use extract::{DEFAULT_MIN_CLUSTER_SIZE, connected_components, extract_clusters};
