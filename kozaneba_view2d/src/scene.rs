// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded frames: backend-neutral draw operations in two layers.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};
use peniko::Color;

use crate::text::Font;

/// Canvas background.
pub const BACKGROUND: Color = Color::from_rgba8(0xfa, 0xfa, 0xfa, 0xff);
/// Note text.
pub const NOTE_TEXT: Color = Color::from_rgba8(0x3a, 0x3a, 0x3a, 0xff);
/// Selection rectangle outline.
pub const SELECTION_STROKE: Color = Color::from_rgba8(0, 128, 255, 230);
/// Selection rectangle fill.
pub const SELECTION_FILL: Color = Color::from_rgba8(0, 128, 255, 38);
/// Cluster outline in [`ClusterStyle::Outline`](crate::ClusterStyle::Outline).
pub const CLUSTER_OUTLINE: Color = Color::from_rgba8(255, 0, 0, 230);
/// Cluster fill in [`ClusterStyle::Sticky`](crate::ClusterStyle::Sticky).
pub const CLUSTER_STICKY_FILL: Color = Color::from_rgba8(255, 247, 153, 217);
/// Cluster border in [`ClusterStyle::Sticky`](crate::ClusterStyle::Sticky).
pub const CLUSTER_STICKY_STROKE: Color = Color::from_rgba8(0, 0, 0, 38);
/// Cluster title text.
pub const CLUSTER_TITLE: Color = Color::from_rgba8(0x1f, 0x29, 0x37, 0xff);
/// HUD panel.
pub const HUD_FILL: Color = Color::from_rgba8(0, 0, 0, 128);
/// HUD text.
pub const HUD_TEXT: Color = Color::WHITE;

/// A single draw operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Filled axis-aligned rectangle.
    FillRect {
        /// Rectangle in layer coordinates.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Stroked axis-aligned rectangle.
    StrokeRect {
        /// Rectangle in layer coordinates.
        rect: Rect,
        /// Stroke color.
        color: Color,
        /// Line width in layer units.
        width: f64,
        /// Dashed outline.
        dashed: bool,
    },
    /// One line of text, positioned by the top-left of its line box.
    Text {
        /// Top-left corner in layer coordinates.
        origin: Point,
        /// Text to draw.
        text: String,
        /// Font.
        font: Font,
        /// Text color.
        color: Color,
    },
}

/// One rendered frame.
///
/// `world` operations are in world coordinates and must be drawn under
/// `world_to_view`; `overlay` operations are already in view coordinates and
/// are drawn on top.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// View rectangle the frame was rendered for.
    pub view_rect: Rect,
    /// Background fill.
    pub background: Color,
    /// Zoom at which the frame was rendered.
    pub zoom: f64,
    /// Transform for the world layer.
    pub world_to_view: Affine,
    /// World-space operations (notes and their text).
    pub world: Vec<DrawOp>,
    /// View-space operations (clusters, selection, HUD).
    pub overlay: Vec<DrawOp>,
    /// Indices of the notes that passed culling, ascending.
    pub visible_notes: Vec<usize>,
}

impl Scene {
    /// Number of notes drawn.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_notes.len()
    }

    /// All text strings in the frame, world layer first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.world.iter().chain(&self.overlay).filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
