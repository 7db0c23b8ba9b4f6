// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index over note rectangles for culling and region selection.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::backends::GridBackend;

/// Closed rectangle intersection: touching edges count as intersecting.
#[inline]
#[must_use]
pub fn intersects_closed(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Returns `true` if `inner` lies entirely within `outer`, edges included.
#[inline]
#[must_use]
pub fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Spatial backend abstraction used by [`NoteIndex`].
///
/// Slots are dense note indices. Rectangles are world-space and never change
/// after insertion, since placed notes are immutable.
pub trait Backend: Debug {
    /// Insert a slot with its rectangle.
    fn insert(&mut self, slot: usize, rect: Rect);

    /// Remove every slot.
    fn clear(&mut self);

    /// Visit each slot whose rectangle intersects `rect` (closed test) exactly
    /// once, in unspecified order.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Rect, f: F);

    /// Slots intersecting `rect`, in ascending slot order.
    fn query_rect(&self, rect: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_rect(rect, |slot| out.push(slot));
        out.sort_unstable();
        out
    }
}

/// Note rectangles plus a spatial backend.
///
/// Queries return note indices in ascending order, so painter's order matches
/// the input order of the notes.
#[derive(Clone, Debug, Default)]
pub struct NoteIndex<B: Backend = GridBackend> {
    rects: Vec<Rect>,
    backend: B,
}

impl<B: Backend> NoteIndex<B> {
    /// Builds an index over `rects` using `backend`, which is cleared first.
    pub fn with_backend(mut backend: B, rects: impl IntoIterator<Item = Rect>) -> Self {
        backend.clear();
        let rects: Vec<Rect> = rects.into_iter().collect();
        for (slot, rect) in rects.iter().enumerate() {
            backend.insert(slot, *rect);
        }
        Self { rects, backend }
    }

    /// Number of indexed rectangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Rectangle of slot `slot`.
    #[must_use]
    pub fn rect(&self, slot: usize) -> Option<Rect> {
        self.rects.get(slot).copied()
    }

    /// Indices of rectangles intersecting `view` (closed test), ascending.
    #[must_use]
    pub fn visible(&self, view: Rect) -> Vec<usize> {
        self.backend.query_rect(view)
    }

    /// Indices of rectangles lying fully inside `region`, ascending.
    #[must_use]
    pub fn contained(&self, region: Rect) -> Vec<usize> {
        let mut out = self.backend.query_rect(region);
        out.retain(|&slot| contains_rect(region, self.rects[slot]));
        out
    }
}

impl NoteIndex<GridBackend> {
    /// Builds a hash-grid index whose cell size matches the note size.
    pub fn grid(cell_size: f64, rects: impl IntoIterator<Item = Rect>) -> Self {
        Self::with_backend(GridBackend::new(cell_size), rects)
    }
}
