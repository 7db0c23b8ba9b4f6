// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform hash-grid backend.
//!
//! Each rectangle is registered in every grid bucket its closed extent
//! touches. A query walks the buckets under the query rectangle, or every
//! occupied bucket when that is cheaper, and reports each slot from a single
//! canonical bucket so no slot is visited twice.

use alloc::vec::Vec;

use hashbrown::HashMap;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use kurbo::Rect;
use smallvec::SmallVec;

use crate::index::{Backend, intersects_closed};

/// Rectangles spanning more buckets than this are kept on a side list.
const MAX_BUCKETS_PER_RECT: u128 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRange {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl CellRange {
    fn count(self) -> u128 {
        let w = (i128::from(self.x1) - i128::from(self.x0) + 1).max(0);
        let h = (i128::from(self.y1) - i128::from(self.y0) + 1).max(0);
        w.unsigned_abs() * h.unsigned_abs()
    }

    fn contains(self, (x, y): (i64, i64)) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Hash-grid backend with square buckets of a fixed world size.
#[derive(Clone)]
pub struct GridBackend {
    cell_size: f64,
    rects: Vec<Option<Rect>>,
    buckets: HashMap<(i64, i64), SmallVec<[usize; 4]>>,
    oversized: Vec<usize>,
}

impl GridBackend {
    /// Creates an empty grid. Non-positive or non-finite sizes fall back to `1.0`.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            rects: Vec::new(),
            buckets: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    /// Bucket edge length in world units.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "bucket coordinates saturate for out-of-range values, which only widens the range"
    )]
    fn cell_range(&self, rect: Rect) -> CellRange {
        let s = self.cell_size;
        CellRange {
            x0: (rect.x0.min(rect.x1) / s).floor() as i64,
            y0: (rect.y0.min(rect.y1) / s).floor() as i64,
            x1: (rect.x0.max(rect.x1) / s).floor() as i64,
            y1: (rect.y0.max(rect.y1) / s).floor() as i64,
        }
    }

    fn report<F: FnMut(usize)>(&self, cell: (i64, i64), query: Rect, q: CellRange, f: &mut F) {
        let Some(slots) = self.buckets.get(&cell) else {
            return;
        };
        for &slot in slots {
            let Some(rect) = self.rects[slot] else {
                continue;
            };
            let s = self.cell_range(rect);
            let canonical = (s.x0.max(q.x0), s.y0.max(q.y0));
            if cell == canonical && intersects_closed(rect, query) {
                f(slot);
            }
        }
    }
}

impl Default for GridBackend {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl core::fmt::Debug for GridBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridBackend")
            .field("cell_size", &self.cell_size)
            .field("slots", &self.rects.len())
            .field("buckets", &self.buckets.len())
            .field("oversized", &self.oversized.len())
            .finish()
    }
}

impl Backend for GridBackend {
    fn insert(&mut self, slot: usize, rect: Rect) {
        if self.rects.len() <= slot {
            self.rects.resize_with(slot + 1, || None);
        }
        self.rects[slot] = Some(rect);
        let range = self.cell_range(rect);
        if range.count() > MAX_BUCKETS_PER_RECT {
            self.oversized.push(slot);
            return;
        }
        for x in range.x0..=range.x1 {
            for y in range.y0..=range.y1 {
                self.buckets.entry((x, y)).or_default().push(slot);
            }
        }
    }

    fn clear(&mut self) {
        self.rects.clear();
        self.buckets.clear();
        self.oversized.clear();
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Rect, mut f: F) {
        let q = self.cell_range(rect);
        if q.count() > self.buckets.len() as u128 {
            for &cell in self.buckets.keys() {
                if q.contains(cell) {
                    self.report(cell, rect, q, &mut f);
                }
            }
        } else {
            for x in q.x0..=q.x1 {
                for y in q.y0..=q.y1 {
                    self.report((x, y), rect, q, &mut f);
                }
            }
        }
        for &slot in &self.oversized {
            if let Some(r) = self.rects[slot]
                && intersects_closed(r, rect)
            {
                f(slot);
            }
        }
    }
}
