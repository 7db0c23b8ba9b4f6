// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kozaneba View 2D: a headless pan/zoom canvas for placed notes.
//!
//! This crate models everything between input events and pixels without
//! owning a window or a renderer:
//! - [`Viewport`]: world-to-view transform with an eased target state and a
//!   clamped zoom range.
//! - [`Gesture`]: the idle / panning / selecting state machine.
//! - [`NoteIndex`]: a spatial index that answers culling and rectangle
//!   selection queries, backed by a hash grid ([`GridBackend`]) or a flat
//!   list ([`FlatBackend`]).
//! - Text layout: greedy word wrapping with character breaking and ellipsis
//!   truncation, measured through the [`TextMeasure`] trait.
//! - [`CanvasView`]: ties the above together behind a dirty-flag frame loop
//!   and records each frame as a [`Scene`] that can be exported as SVG.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kozaneba_layout::{LayoutParams, RawNote, layout_notes};
//! use kozaneba_view2d::{CanvasEvent, CanvasOptions, CanvasView, ColumnMeasure};
//! use kurbo::{Point, Rect};
//!
//! let raw = (0..20)
//!     .map(|i| RawNote {
//!         id: format!("n{i}"),
//!         text: format!("note number {i}"),
//!         position: Point::new(f64::from(i % 5) / 30.0, f64::from(i / 5) / 30.0),
//!     })
//!     .collect();
//! let layout = layout_notes(raw, LayoutParams::default()).unwrap();
//! let notes: Arc<[_]> = layout.notes.into();
//!
//! let mut canvas = CanvasView::new(
//!     notes,
//!     layout.world,
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//!     CanvasOptions::default(),
//!     ColumnMeasure::default(),
//! );
//!
//! // The first frame shows every note.
//! let frame = canvas.tick().unwrap();
//! assert_eq!(frame.visible_count(), 20);
//! assert!(canvas.tick().is_none());
//!
//! // Wheel zoom marks the view dirty again.
//! canvas.handle(CanvasEvent::Wheel { position: Point::new(400.0, 300.0), delta_y: -1.0 });
//! assert!(canvas.tick().is_some());
//! ```
//!
//! ## Culling
//!
//! Every frame queries the index with the visible world rectangle. Notes
//! outside it cost nothing beyond the index lookup, and wrapped note text is
//! computed only the first time a note is drawn with text.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backends;

mod canvas;
mod gesture;
mod index;
mod scene;
mod svg;
mod text;
mod viewport;

pub use backends::{FlatBackend, GridBackend};
pub use canvas::{
    CanvasEvent, CanvasOptions, CanvasView, ClusterOverlay, ClusterStyle, EventOutcome,
    RegionSelection,
};
pub use gesture::{Gesture, GestureEnd, GestureUpdate, Modifiers};
pub use index::{Backend, NoteIndex, contains_rect, intersects_closed};
pub use scene::{
    BACKGROUND, CLUSTER_OUTLINE, CLUSTER_STICKY_FILL, CLUSTER_STICKY_STROKE, CLUSTER_TITLE,
    DrawOp, HUD_FILL, HUD_TEXT, NOTE_TEXT, SELECTION_FILL, SELECTION_STROKE, Scene,
};
pub use text::{
    ColumnMeasure, ELLIPSIS, Font, FontFamily, NoteTextStyle, TextBox, TextMeasure, wrap_chars,
    wrap_words,
};
pub use viewport::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, Easing, Viewport, ViewportDebugInfo};
