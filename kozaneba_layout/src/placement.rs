// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid placement: snap continuous positions onto a square cell grid and
//! resolve collisions with a bounded ring search.
//!
//! Placement is a left fold over the input positions. Each step owns the
//! occupancy set produced by the previous step, so the outcome depends only on
//! the input order and the parameters.

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use hashbrown::HashSet;
use kurbo::{Point, Rect};

/// Default side length of a grid cell (and of every note), in world units.
pub const NOTE_SIZE: f64 = 120.0;

/// Default exclusive upper bound on the ring radius searched on collision.
///
/// Radius `0` is the original cell itself, so the outermost ring visited has
/// Chebyshev radius `SEARCH_RADIUS_LIMIT - 1`. When every cell up to that ring
/// is taken, the note stays on its original cell and shares it. This is a
/// deliberate density bound, not an error path.
pub const SEARCH_RADIUS_LIMIT: u32 = 20;

/// Integer cell coordinates on the placement grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCell {
    /// Creates a cell from its column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell shifted by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the cell containing `p` for the given cell size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "layout positions are bounded by the dataset extent, far inside i32 cell range"
    )]
    pub fn containing(p: Point, cell_size: f64) -> Self {
        Self {
            x: (p.x / cell_size).floor() as i32,
            y: (p.y / cell_size).floor() as i32,
        }
    }

    /// Pixel rectangle covered by this cell.
    #[must_use]
    pub fn rect(self, cell_size: f64) -> Rect {
        let x = f64::from(self.x) * cell_size;
        let y = f64::from(self.y) * cell_size;
        Rect::new(x, y, x + cell_size, y + cell_size)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Parameters of the placement fold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementParams {
    /// Side length of a square cell.
    pub cell_size: f64,
    /// Exclusive bound on the searched ring radius (see [`SEARCH_RADIUS_LIMIT`]).
    pub search_radius_limit: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            cell_size: NOTE_SIZE,
            search_radius_limit: SEARCH_RADIUS_LIMIT,
        }
    }
}

/// Where a single item ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Cell the item's position snapped to before collision resolution.
    pub original: GridCell,
    /// Final cell.
    pub cell: GridCell,
    /// `true` if no free cell was found within the search bound and the item
    /// shares its original cell with an earlier item.
    pub overflowed: bool,
}

/// Offsets on the perimeter of the square ring with Chebyshev `radius`.
///
/// The order is fixed: `dx` outer from `-radius` to `radius`, `dy` inner from
/// `-radius` to `radius`, keeping only perimeter points. Radius `0` yields the
/// single offset `(0, 0)`.
pub fn ring_offsets(radius: u32) -> impl Iterator<Item = (i32, i32)> {
    #[allow(
        clippy::cast_possible_wrap,
        reason = "radius is bounded by the search limit, which is tiny"
    )]
    let r = radius as i32;
    (-r..=r).flat_map(move |dx| {
        (-r..=r).filter_map(move |dy| (dx.abs() == r || dy.abs() == r).then_some((dx, dy)))
    })
}

/// Set of claimed grid cells.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashSet<GridCell>,
}

impl Occupancy {
    /// Creates an empty occupancy set with room for `capacity` cells.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashSet::with_capacity(capacity),
        }
    }

    /// Returns `true` if `cell` has been claimed.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if nothing has been claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Claims the first free cell around `origin`, scanning rings of radius
    /// `0..radius_limit` in [`ring_offsets`] order.
    ///
    /// Returns `None` (and claims nothing) when every searched cell is taken.
    pub fn claim_near(&mut self, origin: GridCell, radius_limit: u32) -> Option<GridCell> {
        let free = (0..radius_limit)
            .flat_map(ring_offsets)
            .map(|(dx, dy)| origin.offset(dx, dy))
            .find(|cell| !self.cells.contains(cell))?;
        self.cells.insert(free);
        Some(free)
    }
}

/// Output of [`place`].
#[derive(Clone, Debug, Default)]
pub struct Placements {
    /// One entry per input position, in input order.
    pub items: Vec<Placement>,
    /// Final occupancy after all items were placed.
    pub occupancy: Occupancy,
}

impl Placements {
    /// Number of items that kept a colliding original cell.
    #[must_use]
    pub fn overflow_count(&self) -> usize {
        self.items.iter().filter(|p| p.overflowed).count()
    }
}

/// Places every position on the grid, in input order.
///
/// Each position snaps to `floor(p / cell_size)`. If that cell is taken, the
/// rings around it are searched (see [`Occupancy::claim_near`]) and the first
/// free cell wins. Earlier items therefore always keep their snapped cell in
/// preference to later ones.
///
/// ```rust
/// use kurbo::Point;
/// use kozaneba_layout::{GridCell, PlacementParams, place};
///
/// let params = PlacementParams { cell_size: 10.0, ..Default::default() };
/// let placed = place(&[Point::new(25.0, 25.0), Point::new(21.0, 29.0)], params);
/// assert_eq!(placed.items[0].cell, GridCell::new(2, 2));
/// // Second item collides and takes the first free cell on ring 1.
/// assert_eq!(placed.items[1].cell, GridCell::new(1, 1));
/// ```
#[must_use]
pub fn place(positions: &[Point], params: PlacementParams) -> Placements {
    let seed = Placements {
        items: Vec::with_capacity(positions.len()),
        occupancy: Occupancy::with_capacity(positions.len()),
    };
    positions.iter().fold(seed, |mut acc, &p| {
        let original = GridCell::containing(p, params.cell_size);
        let placement = match acc
            .occupancy
            .claim_near(original, params.search_radius_limit)
        {
            Some(cell) => Placement {
                original,
                cell,
                overflowed: false,
            },
            None => Placement {
                original,
                cell: original,
                overflowed: true,
            },
        };
        acc.items.push(placement);
        acc
    })
}
