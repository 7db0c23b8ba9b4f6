// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notes, the world extent, and the end-to-end layout pipeline.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use peniko::color::{AlphaColor, Hsl, Srgb};

use crate::normalize::{POSITION_SCALE, normalize};
use crate::placement::{GridCell, NOTE_SIZE, PlacementParams, SEARCH_RADIUS_LIMIT, place};

/// Hue step between consecutive notes, in degrees (the golden angle).
const HUE_STEP: f32 = 137.5;
const NOTE_SATURATION: f32 = 70.0;
const NOTE_LIGHTNESS: f32 = 80.0;

/// A dataset entry before layout: identity, text and embedding coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNote {
    /// Stable identifier.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Embedding coordinate.
    pub position: Point,
}

/// Display color of a note, stored as a hue on a fixed pastel HSL ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteColor {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f32,
}

impl NoteColor {
    /// Color assigned to the note at `index` in dataset order.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "only the fractional hue matters and dataset sizes stay far below 2^24"
    )]
    pub fn for_index(index: usize) -> Self {
        Self {
            hue: (index as f32 * HUE_STEP) % 360.0,
        }
    }

    /// Converts to an sRGB paint color.
    #[must_use]
    pub fn to_color(self) -> Color {
        AlphaColor::<Hsl>::new([self.hue, NOTE_SATURATION, NOTE_LIGHTNESS, 1.0]).convert::<Srgb>()
    }

    /// CSS notation, e.g. `hsl(137.5 70% 80%)`.
    #[must_use]
    pub fn css(self) -> String {
        format!("hsl({} {NOTE_SATURATION}% {NOTE_LIGHTNESS}%)", self.hue)
    }
}

/// A placed note.
///
/// Everything except the grid and pixel fields comes straight from the
/// dataset; the placement fields are written once by [`layout_notes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    /// Stable identifier.
    pub id: String,
    /// Display text.
    pub text: String,
    /// Raw embedding coordinate.
    pub embedding: Point,
    /// Display color.
    pub color: NoteColor,
    /// Final grid cell.
    pub cell: GridCell,
    /// Final pixel rectangle in world space.
    pub rect: Rect,
}

/// Size of the world plane: the normalized extent of the notes plus a margin.
///
/// The extent comes from the snapped positions, not the final cells. A note
/// moved by the ring search can land on a negative cell or past the far edge,
/// so its rectangle may fall outside `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
}

impl World {
    /// World rectangle anchored at the origin.
    #[must_use]
    pub fn rect(self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, Size::new(self.width, self.height))
    }
}

/// Parameters of [`layout_notes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Multiplier applied to embedding coordinates after shifting.
    pub position_scale: f64,
    /// Cell size and search bound.
    pub placement: PlacementParams,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            position_scale: POSITION_SCALE,
            placement: PlacementParams {
                cell_size: NOTE_SIZE,
                search_radius_limit: SEARCH_RADIUS_LIMIT,
            },
        }
    }
}

/// A complete layout.
#[derive(Clone, Debug)]
pub struct Layout {
    /// Placed notes, in dataset order.
    pub notes: Vec<Note>,
    /// World extent.
    pub world: World,
    /// Number of notes left sharing their original cell.
    pub overflowed: usize,
}

/// Normalizes, snaps and de-collides every note, in dataset order.
///
/// The world extent is the normalized extent plus one cell of margin on each
/// axis side (`extent + 2 * cell_size`). Returns `None` for an empty dataset.
#[must_use]
pub fn layout_notes(raw: Vec<RawNote>, params: LayoutParams) -> Option<Layout> {
    let coords: Vec<Point> = raw.iter().map(|n| n.position).collect();
    let normalized = normalize(&coords, params.position_scale)?;
    let placements = place(&normalized.positions, params.placement);
    let cell_size = params.placement.cell_size;

    let notes: Vec<Note> = raw
        .into_iter()
        .zip(&placements.items)
        .enumerate()
        .map(|(index, (n, placement))| Note {
            id: n.id,
            text: n.text,
            embedding: n.position,
            color: NoteColor::for_index(index),
            cell: placement.cell,
            rect: placement.cell.rect(cell_size),
        })
        .collect();

    let world = World {
        width: normalized.extent_width() + cell_size * 2.0,
        height: normalized.extent_height() + cell_size * 2.0,
    };
    let overflowed = placements.overflow_count();
    tracing::debug!(
        notes = notes.len(),
        overflowed,
        world_width = world.width,
        world_height = world.height,
        "placed notes on grid"
    );
    Some(Layout {
        notes,
        world,
        overflowed,
    })
}
