// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture state: idle, panning, or rubber-band selecting.
//!
//! ## Usage
//!
//! 1) On pointer-down, call [`Gesture::begin`] with the position and held
//!    modifiers. The selection modifier starts a selection, anything else a pan.
//! 2) On each move, [`Gesture::update`] reports the pan delta since the last
//!    move, or the provisional selection rectangle.
//! 3) On pointer-up, [`Gesture::end`] returns to idle and reports whether a
//!    selection rectangle was committed.
//!
//! ## Minimal example
//!
//! ```
//! use kozaneba_view2d::{Gesture, GestureEnd, GestureUpdate, Modifiers};
//! use kurbo::{Point, Rect, Vec2};
//!
//! let mut gesture = Gesture::Idle;
//! gesture.begin(Point::new(10.0, 20.0), Modifiers::empty(), Modifiers::SHIFT);
//! assert_eq!(
//!     gesture.update(Point::new(15.0, 25.0)),
//!     GestureUpdate::Pan(Vec2::new(5.0, 5.0))
//! );
//! assert_eq!(gesture.end(Point::new(15.0, 25.0)), GestureEnd::Panned);
//!
//! gesture.begin(Point::new(50.0, 50.0), Modifiers::SHIFT, Modifiers::SHIFT);
//! assert_eq!(
//!     gesture.end(Point::new(10.0, 30.0)),
//!     GestureEnd::Selected(Rect::new(10.0, 30.0, 50.0, 50.0))
//! );
//! assert!(gesture.is_idle());
//! ```

use kurbo::{Point, Rect, Vec2};

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT   = 0b0000_0001;
        /// Control key.
        const CONTROL = 0b0000_0010;
        /// Alt / Option key.
        const ALT     = 0b0000_0100;
        /// Meta / Command key.
        const META    = 0b0000_1000;
    }
}

/// The active pointer interaction. The three modes are mutually exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    /// No pointer button held.
    #[default]
    Idle,
    /// Dragging the canvas.
    Panning {
        /// Pointer position at the previous event, in view coordinates.
        last: Point,
    },
    /// Dragging out a selection rectangle.
    Selecting {
        /// Pointer-down position in view coordinates.
        start: Point,
        /// Latest pointer position in view coordinates.
        current: Point,
    },
}

/// What a pointer move means for the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureUpdate {
    /// Not in a gesture; nothing to do.
    None,
    /// Pan by this view-space delta.
    Pan(Vec2),
    /// The provisional selection rectangle changed (view coordinates).
    Select(Rect),
}

/// How a gesture finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEnd {
    /// There was no gesture.
    None,
    /// A pan finished.
    Panned,
    /// A selection finished with this normalized view-space rectangle.
    Selected(Rect),
}

impl Gesture {
    /// Starts a gesture at `pos`, replacing any gesture in progress.
    ///
    /// If `modifiers` contains all of `select_with` (and `select_with` is not
    /// empty) a selection starts; otherwise a pan.
    pub fn begin(&mut self, pos: Point, modifiers: Modifiers, select_with: Modifiers) {
        *self = if !select_with.is_empty() && modifiers.contains(select_with) {
            Self::Selecting {
                start: pos,
                current: pos,
            }
        } else {
            Self::Panning { last: pos }
        };
    }

    /// Feeds a pointer move.
    pub fn update(&mut self, pos: Point) -> GestureUpdate {
        match self {
            Self::Idle => GestureUpdate::None,
            Self::Panning { last } => {
                let delta = pos - *last;
                *last = pos;
                GestureUpdate::Pan(delta)
            }
            Self::Selecting { start, current } => {
                *current = pos;
                GestureUpdate::Select(Rect::from_points(*start, pos))
            }
        }
    }

    /// Feeds the pointer-up at `pos` and returns to [`Gesture::Idle`].
    pub fn end(&mut self, pos: Point) -> GestureEnd {
        let ended = match *self {
            Self::Idle => GestureEnd::None,
            Self::Panning { .. } => GestureEnd::Panned,
            Self::Selecting { start, .. } => GestureEnd::Selected(Rect::from_points(start, pos)),
        };
        *self = Self::Idle;
        ended
    }

    /// Abandons any gesture in progress.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Returns `true` when no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` while panning.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Returns `true` while selecting.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        matches!(self, Self::Selecting { .. })
    }

    /// The provisional selection rectangle in view coordinates, if selecting.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect> {
        match *self {
            Self::Selecting { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }
}
