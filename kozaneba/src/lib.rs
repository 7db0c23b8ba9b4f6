// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kozaneba: notes laid out on a zoomable canvas, clustered and summarized.
//!
//! This crate ties the pieces together:
//!
//! - [`Dataset`] reads the input notes and places them on the grid.
//! - [`Config`] holds every tunable, loaded from JSON.
//! - [`ClusterService`] extracts clusters and summarizes them in the
//!   background.
//! - [`Session`] owns one canvas, its clusters and their summaries, and is
//!   what a host drives frame by frame.
//! - [`ClustersArtifact`], [`SelectionExport`] and [`ClustersExport`] are the
//!   JSON files read and written around a session.
//!
//! The building blocks are re-exported as [`layout`], [`cluster`],
//! [`summary`] and [`view2d`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kozaneba::{Config, Dataset, Session};
//! use kozaneba::summary::SummaryProvider;
//! use kozaneba::view2d::{CanvasEvent, ClusterStyle, ColumnMeasure, Modifiers};
//! use kurbo::{Point, Rect};
//!
//! let json = r#"{ "arguments": [
//!     { "arg_id": "a", "argument": "Fewer cars downtown.", "x": 0.0, "y": 0.0 },
//!     { "arg_id": "b", "argument": "More bike lanes.", "x": 0.031, "y": 0.0 }
//! ] }"#;
//! let config = Config::default();
//! let layout = Dataset::from_json(json)?.layout(config.layout_params())?;
//!
//! let mut session = Session::new(
//!     layout,
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//!     &config,
//!     ClusterStyle::Outline,
//!     ColumnMeasure::default(),
//!     SummaryProvider::local(),
//! );
//! session.extract_clusters(Some(2));
//! assert_eq!(session.clusters().len(), 1);
//!
//! // Select everything with a shift-drag.
//! session.handle(CanvasEvent::PointerDown {
//!     position: Point::new(0.0, 0.0),
//!     modifiers: Modifiers::SHIFT,
//! });
//! session.handle(CanvasEvent::PointerUp { position: Point::new(800.0, 600.0) });
//! assert_eq!(session.selection_export().texts.len(), 2);
//!
//! let scene = session.tick().unwrap();
//! assert_eq!(scene.visible_count(), 2);
//! # Ok::<(), kozaneba::Error>(())
//! ```

mod artifact;
mod config;
mod dataset;
mod error;
mod service;
mod session;

pub use kozaneba_cluster as cluster;
pub use kozaneba_layout as layout;
pub use kozaneba_summary as summary;
pub use kozaneba_view2d as view2d;

pub use artifact::{
    ClusterRecord, ClustersArtifact, ClustersExport, RectRecord, SelectionExport, WorldRecord,
};
pub use config::{
    ClusterConfig, Config, LayoutConfig, SelectionModifier, SummaryConfig, ViewConfig,
};
pub use dataset::{Dataset, DatasetRecord};
pub use error::{Error, Result};
pub use service::ClusterService;
pub use session::Session;
