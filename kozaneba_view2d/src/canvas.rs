// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactive canvas: input handling, the dirty-flag frame loop and
//! scene recording.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kozaneba_layout::{NOTE_SIZE, Note, World};
use kurbo::{Point, Rect, Vec2};

use crate::gesture::{Gesture, GestureEnd, GestureUpdate, Modifiers};
use crate::index::NoteIndex;
use crate::scene::{
    BACKGROUND, CLUSTER_OUTLINE, CLUSTER_STICKY_FILL, CLUSTER_STICKY_STROKE, CLUSTER_TITLE,
    DrawOp, HUD_FILL, HUD_TEXT, NOTE_TEXT, SELECTION_FILL, SELECTION_STROKE, Scene,
};
use crate::text::{ColumnMeasure, Font, NoteTextStyle, TextBox, TextMeasure, wrap_chars, wrap_words};
use crate::viewport::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, Easing, Viewport};

const TITLE_FONT: Font = Font::new(18.0).bold();
const TITLE_LINE_STEP: f64 = 22.0;
const TITLE_MAX_LINES: usize = 2;
const HUD_FONT: Font = Font::new(12.0).monospace();
const HUD_HEIGHT: f64 = 24.0;
const HUD_MARGIN: f64 = 12.0;
const HUD_INSET: f64 = 8.0;

/// How cluster rectangles are drawn over the notes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClusterStyle {
    /// Thin red outline.
    #[default]
    Outline,
    /// Translucent yellow sticky with the cluster title.
    Sticky,
}

/// A cluster as the canvas draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterOverlay {
    /// Bounding rectangle in world space.
    pub rect: Rect,
    /// Title shown in [`ClusterStyle::Sticky`].
    pub title: Option<String>,
}

/// A committed rectangular selection.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSelection {
    /// Normalized world-space rectangle.
    pub world_rect: Rect,
    /// Indices of the notes fully inside `world_rect`, ascending.
    pub notes: Vec<usize>,
}

impl RegionSelection {
    /// Texts of the selected notes, in note order.
    pub fn texts<'a>(&self, notes: &'a [Note]) -> Vec<&'a str> {
        self.notes
            .iter()
            .filter_map(|&i| notes.get(i).map(|n| n.text.as_str()))
            .collect()
    }
}

/// Tunables of a [`CanvasView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasOptions {
    /// Note text layout, in world units.
    pub note_text: NoteTextStyle,
    /// Note text is drawn once a note is at least this wide on screen.
    pub text_min_screen_width: f64,
    /// Wheel factor for scrolling up.
    pub wheel_zoom_in: f64,
    /// Wheel factor for scrolling down.
    pub wheel_zoom_out: f64,
    /// Target zoom factor of [`CanvasView::zoom_in`] and [`CanvasView::zoom_out`].
    pub button_zoom_factor: f64,
    /// Fraction of the view the world fills after a reset.
    pub fit_margin: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Lower zoom bound before the first fit.
    pub initial_min_zoom: f64,
    /// Easing toward programmatic zoom targets.
    pub easing: Easing,
    /// Modifiers that turn a drag into a selection.
    pub selection_modifier: Modifiers,
    /// Cluster overlay style.
    pub cluster_style: ClusterStyle,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            note_text: NoteTextStyle::default(),
            text_min_screen_width: 80.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            button_zoom_factor: 2.0,
            fit_margin: 0.92,
            max_zoom: DEFAULT_MAX_ZOOM,
            initial_min_zoom: DEFAULT_MIN_ZOOM,
            easing: Easing::default(),
            selection_modifier: Modifiers::SHIFT,
            cluster_style: ClusterStyle::Outline,
        }
    }
}

/// Host input, already translated to view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed.
    PointerDown {
        /// Pointer position.
        position: Point,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// Pointer moved.
    PointerMove {
        /// Pointer position.
        position: Point,
    },
    /// Primary button released.
    PointerUp {
        /// Pointer position.
        position: Point,
    },
    /// Wheel scrolled; negative `delta_y` zooms in.
    Wheel {
        /// Pointer position, the zoom anchor.
        position: Point,
        /// Vertical scroll delta.
        delta_y: f64,
    },
    /// Double click anywhere on the canvas.
    DoubleClick,
    /// Character key pressed.
    Key(char),
    /// The canvas was resized to this rectangle.
    Resize(Rect),
}

/// Result of [`CanvasView::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event had no effect.
    Ignored,
    /// View state changed; a frame is pending.
    Updated,
    /// A selection was committed; see [`CanvasView::selection`].
    SelectionCommitted,
}

/// A pannable, zoomable view of placed notes.
///
/// The view owns interaction state and a dirty flag; the host calls
/// [`CanvasView::handle`] for input and [`CanvasView::tick`] once per display
/// refresh, drawing whatever [`Scene`] comes back.
pub struct CanvasView<M: TextMeasure = ColumnMeasure> {
    notes: Arc<[Note]>,
    world: World,
    note_size: f64,
    index: NoteIndex,
    viewport: Viewport,
    gesture: Gesture,
    selection: Option<RegionSelection>,
    overlays: Vec<ClusterOverlay>,
    options: CanvasOptions,
    measure: M,
    wrap_cache: Vec<Option<Box<[String]>>>,
    dirty: bool,
}

impl<M: TextMeasure> core::fmt::Debug for CanvasView<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasView")
            .field("notes", &self.notes.len())
            .field("world", &self.world)
            .field("viewport", &self.viewport)
            .field("gesture", &self.gesture)
            .field("selection", &self.selection)
            .field("overlays", &self.overlays.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<M: TextMeasure> CanvasView<M> {
    /// Creates a view of `notes` inside `world`, fitted to `view_rect`.
    pub fn new(
        notes: Arc<[Note]>,
        world: World,
        view_rect: Rect,
        options: CanvasOptions,
        measure: M,
    ) -> Self {
        let note_size = notes.first().map_or(NOTE_SIZE, |n| n.rect.width());
        let index = NoteIndex::grid(note_size, notes.iter().map(|n| n.rect));
        let mut viewport = Viewport::new(view_rect);
        viewport.set_zoom_limits(options.initial_min_zoom, options.max_zoom);
        viewport.set_easing(options.easing);
        viewport.fit_world(world.rect(), options.fit_margin);
        let wrap_cache = vec![None; notes.len()];
        Self {
            notes,
            world,
            note_size,
            index,
            viewport,
            gesture: Gesture::Idle,
            selection: None,
            overlays: Vec::new(),
            options,
            measure,
            wrap_cache,
            dirty: true,
        }
    }

    /// The notes, in dataset order.
    #[must_use]
    pub fn notes(&self) -> &Arc<[Note]> {
        &self.notes
    }

    /// World extent.
    #[must_use]
    pub fn world(&self) -> World {
        self.world
    }

    /// Viewport state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Gesture in progress.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Options the view was created with.
    #[must_use]
    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Returns `true` if a frame is pending.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The committed selection, kept until [`CanvasView::clear_selection`].
    #[must_use]
    pub fn selection(&self) -> Option<&RegionSelection> {
        self.selection.as_ref()
    }

    /// Texts of the committed selection.
    #[must_use]
    pub fn selection_texts(&self) -> Vec<&str> {
        self.selection
            .as_ref()
            .map(|s| s.texts(&self.notes))
            .unwrap_or_default()
    }

    /// Cluster overlays currently drawn.
    #[must_use]
    pub fn cluster_overlays(&self) -> &[ClusterOverlay] {
        &self.overlays
    }

    /// Applies one input event.
    pub fn handle(&mut self, event: CanvasEvent) -> EventOutcome {
        match event {
            CanvasEvent::PointerDown {
                position,
                modifiers,
            } => {
                self.gesture
                    .begin(position, modifiers, self.options.selection_modifier);
                if self.gesture.is_selecting() {
                    self.dirty = true;
                }
                EventOutcome::Updated
            }
            CanvasEvent::PointerMove { position } => match self.gesture.update(position) {
                GestureUpdate::None => EventOutcome::Ignored,
                GestureUpdate::Pan(delta) => {
                    self.viewport.pan_by_view(delta);
                    self.dirty = true;
                    EventOutcome::Updated
                }
                GestureUpdate::Select(_) => {
                    self.dirty = true;
                    EventOutcome::Updated
                }
            },
            CanvasEvent::PointerUp { position } => match self.gesture.end(position) {
                GestureEnd::None => EventOutcome::Ignored,
                GestureEnd::Panned => EventOutcome::Updated,
                GestureEnd::Selected(view_rect) => {
                    let world_rect = self.viewport.view_to_world_rect(view_rect);
                    self.select_region(world_rect);
                    EventOutcome::SelectionCommitted
                }
            },
            CanvasEvent::Wheel { position, delta_y } => {
                let factor = if delta_y < 0.0 {
                    self.options.wheel_zoom_in
                } else if delta_y > 0.0 {
                    self.options.wheel_zoom_out
                } else {
                    return EventOutcome::Ignored;
                };
                self.viewport.zoom_about_view_point(position, factor);
                self.dirty = true;
                EventOutcome::Updated
            }
            CanvasEvent::DoubleClick | CanvasEvent::Key('r' | 'R') => {
                self.reset_view();
                EventOutcome::Updated
            }
            CanvasEvent::Key(_) => EventOutcome::Ignored,
            CanvasEvent::Resize(rect) => {
                self.set_view_rect(rect);
                EventOutcome::Updated
            }
        }
    }

    /// Eases the target zoom up by the button factor.
    pub fn zoom_in(&mut self) {
        self.viewport
            .scale_target_zoom(self.options.button_zoom_factor);
        self.dirty = true;
    }

    /// Eases the target zoom down by the button factor.
    pub fn zoom_out(&mut self) {
        if self.options.button_zoom_factor > 0.0 {
            self.viewport
                .scale_target_zoom(1.0 / self.options.button_zoom_factor);
        }
        self.dirty = true;
    }

    /// Fits the whole world into the view, centered, without easing.
    pub fn reset_view(&mut self) {
        self.viewport
            .fit_world(self.world.rect(), self.options.fit_margin);
        self.dirty = true;
        tracing::trace!(zoom = self.viewport.zoom(), "view reset");
    }

    /// Moves the canvas to a new rectangle. Zoom and pan are kept.
    pub fn set_view_rect(&mut self, rect: Rect) {
        self.viewport.set_view_rect(rect);
        self.dirty = true;
    }

    /// Commits a selection of the notes fully inside `world_rect`.
    pub fn select_region(&mut self, world_rect: Rect) -> &RegionSelection {
        let world_rect = world_rect.abs();
        let notes = self.index.contained(world_rect);
        tracing::debug!(selected = notes.len(), "selection committed");
        self.dirty = true;
        self.selection.insert(RegionSelection { world_rect, notes })
    }

    /// Drops the committed selection.
    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.dirty = true;
        }
    }

    /// Replaces the cluster overlays.
    pub fn set_cluster_overlays(&mut self, overlays: Vec<ClusterOverlay>) {
        self.overlays = overlays;
        self.dirty = true;
    }

    /// Switches the cluster overlay style.
    pub fn set_cluster_style(&mut self, style: ClusterStyle) {
        if self.options.cluster_style != style {
            self.options.cluster_style = style;
            self.dirty = true;
        }
    }

    /// Indices of the notes intersecting the visible world rectangle.
    #[must_use]
    pub fn visible_notes(&self) -> Vec<usize> {
        self.index.visible(self.viewport.visible_world_rect())
    }

    /// HUD line for a frame showing `visible` notes.
    #[must_use]
    pub fn hud_text(&self, visible: usize) -> String {
        let mut hud = format!("zoom {:.2} | visible {visible}", self.viewport.zoom());
        if !self.overlays.is_empty() {
            hud.push_str(&format!(" | clusters {}", self.overlays.len()));
        }
        hud
    }

    /// Runs one display refresh.
    ///
    /// Returns `None` when nothing changed since the last frame. Otherwise
    /// advances the easing one step and returns the frame; while easing is in
    /// progress the view stays dirty so the next tick draws again.
    pub fn tick(&mut self) -> Option<Scene> {
        if !self.dirty {
            return None;
        }
        self.dirty = self.viewport.advance();
        Some(self.render())
    }

    fn render(&mut self) -> Scene {
        let view_rect = self.viewport.view_rect();
        let zoom = self.viewport.zoom();
        let visible = self.visible_notes();
        let show_text = self.note_size * zoom >= self.options.text_min_screen_width;

        let notes = Arc::clone(&self.notes);
        let style = self.options.note_text;
        let mut world = Vec::with_capacity(visible.len() * if show_text { 4 } else { 1 });
        for &slot in &visible {
            let note = &notes[slot];
            world.push(DrawOp::FillRect {
                rect: note.rect,
                color: note.color.to_color(),
            });
            if !show_text {
                continue;
            }
            let origin = note.rect.origin() + Vec2::new(style.padding, style.padding);
            for (i, line) in self.note_lines(slot).iter().enumerate() {
                world.push(DrawOp::Text {
                    origin: origin + Vec2::new(0.0, i as f64 * style.line_height),
                    text: line.clone(),
                    font: style.font,
                    color: NOTE_TEXT,
                });
            }
        }

        let mut overlay = Vec::new();
        self.draw_clusters(&mut overlay);
        self.draw_selection(&mut overlay);
        self.draw_hud(&mut overlay, visible.len());

        Scene {
            view_rect,
            background: BACKGROUND,
            zoom,
            world_to_view: self.viewport.world_to_view(),
            world,
            overlay,
            visible_notes: visible,
        }
    }

    /// Wrapped lines of note `slot`, computed on first use.
    fn note_lines(&mut self, slot: usize) -> &[String] {
        let note = &self.notes[slot];
        let bx = self.options.note_text.text_box(note.rect.width());
        let measure = &self.measure;
        self.wrap_cache[slot].get_or_insert_with(|| wrap_words(&note.text, &bx, measure).into_boxed_slice())
    }

    fn draw_clusters(&self, out: &mut Vec<DrawOp>) {
        for cluster in &self.overlays {
            let rect = self.viewport.world_to_view_rect(cluster.rect);
            match self.options.cluster_style {
                ClusterStyle::Outline => out.push(DrawOp::StrokeRect {
                    rect,
                    color: CLUSTER_OUTLINE,
                    width: 2.0,
                    dashed: false,
                }),
                ClusterStyle::Sticky => {
                    out.push(DrawOp::FillRect {
                        rect,
                        color: CLUSTER_STICKY_FILL,
                    });
                    out.push(DrawOp::StrokeRect {
                        rect,
                        color: CLUSTER_STICKY_STROKE,
                        width: 1.0,
                        dashed: false,
                    });
                    if let Some(title) = &cluster.title {
                        self.draw_title(out, rect, title);
                    }
                }
            }
        }
    }

    fn draw_title(&self, out: &mut Vec<DrawOp>, rect: Rect, title: &str) {
        let pad = (rect.width() * 0.03).clamp(8.0, 24.0);
        let bx = TextBox {
            max_width: (rect.width() - pad * 2.0).max(10.0),
            max_lines: TITLE_MAX_LINES,
            font: TITLE_FONT,
        };
        for (i, line) in wrap_chars(title, &bx, &self.measure).into_iter().enumerate() {
            let ty = rect.y0 + pad + i as f64 * TITLE_LINE_STEP;
            if ty > rect.y1 - pad {
                break;
            }
            out.push(DrawOp::Text {
                origin: Point::new(rect.x0 + pad, ty),
                text: line,
                font: TITLE_FONT,
                color: CLUSTER_TITLE,
            });
        }
    }

    fn draw_selection(&self, out: &mut Vec<DrawOp>) {
        let rect = match (self.gesture.selection_rect(), &self.selection) {
            (Some(provisional), _) => provisional,
            (None, Some(committed)) => self.viewport.world_to_view_rect(committed.world_rect),
            (None, None) => return,
        };
        out.push(DrawOp::StrokeRect {
            rect,
            color: SELECTION_STROKE,
            width: 1.5,
            dashed: true,
        });
        out.push(DrawOp::FillRect {
            rect,
            color: SELECTION_FILL,
        });
    }

    fn draw_hud(&self, out: &mut Vec<DrawOp>, visible: usize) {
        let view = self.viewport.view_rect();
        let text = self.hud_text(visible);
        let width = self.measure.measure(&text, &HUD_FONT) + 2.0 * HUD_INSET;
        let x = (view.x1 - width - HUD_MARGIN).max(view.x0 + HUD_INSET);
        let y = (view.y1 - HUD_HEIGHT - HUD_MARGIN).max(view.y0 + HUD_INSET);
        out.push(DrawOp::FillRect {
            rect: Rect::new(x, y, x + width, y + HUD_HEIGHT),
            color: HUD_FILL,
        });
        out.push(DrawOp::Text {
            origin: Point::new(x + HUD_INSET, y + (HUD_HEIGHT - HUD_FONT.size) / 2.0),
            text,
            font: HUD_FONT,
            color: HUD_TEXT,
        });
    }
}
