// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate normalization: shift raw embedding coordinates to a zero origin
//! and scale them into layout units.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

/// Default multiplier applied to embedding coordinates before grid snapping.
///
/// Larger values spread notes further apart.
pub const POSITION_SCALE: f64 = 4000.0;

/// Result of normalizing a non-empty set of embedding coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    /// Bounding box of the raw coordinates (`min_x`, `min_y`, `max_x`, `max_y`).
    pub bounds: Rect,
    /// Scale that was applied after shifting.
    pub scale: f64,
    /// Shifted and scaled positions, one per input coordinate, in input order.
    pub positions: Vec<Point>,
}

impl Normalized {
    /// Width of the normalized plane (`(max_x - min_x) * scale`).
    #[must_use]
    pub fn extent_width(&self) -> f64 {
        self.bounds.width() * self.scale
    }

    /// Height of the normalized plane (`(max_y - min_y) * scale`).
    #[must_use]
    pub fn extent_height(&self) -> f64 {
        self.bounds.height() * self.scale
    }
}

/// Maps raw coordinates into a plane whose origin is the minimum corner of
/// the input and whose units are `scale` times the embedding units.
///
/// Returns `None` for an empty input; callers are expected to reject empty
/// datasets before layout.
///
/// ```rust
/// use kurbo::Point;
/// use kozaneba_layout::normalize;
///
/// let n = normalize(&[Point::new(0.5, -1.0), Point::new(1.0, 1.0)], 10.0).unwrap();
/// assert_eq!(n.positions[0], Point::new(0.0, 0.0));
/// assert_eq!(n.positions[1], Point::new(5.0, 20.0));
/// ```
#[must_use]
pub fn normalize(coords: &[Point], scale: f64) -> Option<Normalized> {
    let first = *coords.first()?;
    let bounds = coords.iter().skip(1).fold(
        Rect::from_points(first, first),
        |acc, p| Rect::new(acc.x0.min(p.x), acc.y0.min(p.y), acc.x1.max(p.x), acc.y1.max(p.y)),
    );
    let positions = coords
        .iter()
        .map(|p| Point::new((p.x - bounds.x0) * scale, (p.y - bounds.y0) * scale))
        .collect();
    Some(Normalized {
        bounds,
        scale,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::normalize;

    #[test]
    fn empty_input_has_no_normalization() {
        assert!(normalize(&[], 4000.0).is_none());
    }

    #[test]
    fn single_point_maps_to_origin() {
        let n = normalize(&[Point::new(3.25, -7.5)], 4000.0).unwrap();
        assert_eq!(n.positions, [Point::ORIGIN]);
        assert_eq!(n.extent_width(), 0.0);
        assert_eq!(n.extent_height(), 0.0);
    }

    #[test]
    fn bounds_cover_all_points_and_extent_is_scaled() {
        let coords = [
            Point::new(0.1, 0.4),
            Point::new(-0.2, 0.9),
            Point::new(0.3, -0.1),
        ];
        let n = normalize(&coords, 100.0).unwrap();
        assert_eq!(n.bounds, Rect::new(-0.2, -0.1, 0.3, 0.9));
        assert!((n.extent_width() - 50.0).abs() < 1e-9);
        assert!((n.extent_height() - 100.0).abs() < 1e-9);
        for p in &n.positions {
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.x <= n.extent_width() + 1e-9);
            assert!(p.y <= n.extent_height() + 1e-9);
        }
    }
}
