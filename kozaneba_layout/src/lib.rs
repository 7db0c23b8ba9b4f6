// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kozaneba Layout: deterministic grid placement for embedded notes.
//!
//! Each note carries a continuous 2D embedding coordinate. This crate turns a
//! dataset of such notes into a collision-free discrete layout:
//!
//! 1. [`normalize`] shifts coordinates so the minimum corner is the origin and
//!    scales them by a fixed position scale.
//! 2. [`place`] snaps every position to a square cell grid and, when the cell
//!    is taken, walks concentric rings around it until a free cell turns up.
//! 3. [`layout_notes`] runs both steps and emits [`Note`]s with their final
//!    cell, pixel rectangle and display color, plus the [`World`] extent.
//!
//! The result depends only on the dataset order and the [`LayoutParams`]:
//! ring candidates are visited in a fixed order and earlier notes win ties.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use kozaneba_layout::{LayoutParams, RawNote, layout_notes};
//!
//! let raw = vec![
//!     RawNote { id: "a".into(), text: "first".into(), position: Point::new(0.0, 0.0) },
//!     RawNote { id: "b".into(), text: "second".into(), position: Point::new(0.001, 0.0) },
//! ];
//! let layout = layout_notes(raw, LayoutParams::default()).unwrap();
//!
//! // Both snap to cell (0, 0); the second moves to the first free ring cell.
//! assert_ne!(layout.notes[0].cell, layout.notes[1].cell);
//! assert_eq!(layout.overflowed, 0);
//! ```
//!
//! ## Density bound
//!
//! The ring search is bounded by [`SEARCH_RADIUS_LIMIT`]. A note that finds
//! no free cell within the bound keeps its original cell and shares it with an
//! earlier note. Under realistic densities this never happens; the count is
//! reported as [`Layout::overflowed`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod normalize;
mod note;
mod placement;

pub use normalize::{Normalized, POSITION_SCALE, normalize};
pub use note::{Layout, LayoutParams, Note, NoteColor, RawNote, World, layout_notes};
pub use placement::{
    GridCell, NOTE_SIZE, Occupancy, Placement, PlacementParams, Placements, SEARCH_RADIUS_LIMIT,
    place, ring_offsets,
};
