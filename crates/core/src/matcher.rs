//! Match finder - detects runs of 3+ identical tokens
//!
//! # Scan order
//!
//! Origins are visited on a checkerboard: rows bottom to top, and in row `y`
//! the column starts at `y % 2` and advances by 2.
//!
//! ```text
//! y=5  # . # . # .
//! y=4  . # . # . #
//! y=3  # . # . # .
//! y=2  . # . # . #
//! y=1  # . # . # .
//! y=0  . # . # . #      (# = origin at x = y % 2 ...)
//! ```
//!
//! Any run of length 3 holds at least one cell of each colour, so scanning one
//! colour class finds every run, provided each origin expands in both
//! directions along each axis. At every origin the vertical run is considered
//! before the horizontal one.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Axis, Coord, Token, MAX_GRID_DIM, MIN_MATCH_LEN};

/// Parity of the first visited column in row `y` is `(y + SCAN_PARITY) % 2`.
pub const SCAN_PARITY: i8 = 0;

/// Per-origin evaluation order.
pub const AXIS_PRIORITY: [Axis; 2] = [Axis::Vertical, Axis::Horizontal];

/// A run of at least [`MIN_MATCH_LEN`] identical tokens along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub axis: Axis,
    pub token: Token,
    /// Sorted ascending along `axis`.
    pub cells: ArrayVec<Coord, MAX_GRID_DIM>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell along the axis (bottom for vertical, left for horizontal).
    pub fn start(&self) -> Coord {
        self.cells[0]
    }

    /// Last cell along the axis (top for vertical, right for horizontal).
    pub fn end(&self) -> Coord {
        self.cells[self.cells.len() - 1]
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }
}

/// Origins visited by one sweep, in order.
pub fn scan_origins(width: u8, height: u8) -> impl Iterator<Item = Coord> {
    (0..height as i8).flat_map(move |y| {
        let first = (y + SCAN_PARITY).rem_euclid(2);
        (first..width as i8).step_by(2).map(move |x| Coord::new(x, y))
    })
}

/// Maximal run through `origin` along `axis`, if it qualifies as a match.
///
/// An EMPTY or out-of-bounds origin never matches.
pub fn run_at(grid: &Grid, origin: Coord, axis: Axis) -> Option<Match> {
    let token = grid.try_get(origin.x, origin.y)??;
    let (dx, dy) = axis.step();

    let same = |c: Coord| grid.try_get(c.x, c.y) == Some(Some(token));

    let mut start = origin;
    while let Some(prev) = start.offset(-dx, -dy) {
        if !same(prev) {
            break;
        }
        start = prev;
    }

    let mut cells = ArrayVec::new();
    let mut cur = Some(start);
    while let Some(c) = cur {
        if !same(c) {
            break;
        }
        // Runs are bounded by the grid, which is bounded by MAX_GRID_DIM.
        if cells.try_push(c).is_err() {
            break;
        }
        cur = c.offset(dx, dy);
    }

    (cells.len() >= MIN_MATCH_LEN).then_some(Match { axis, token, cells })
}

/// Every match on the grid, in scan order, vertical before horizontal at
/// each origin. A run reachable from two origins is reported once.
pub fn find_matches(grid: &Grid) -> Vec<Match> {
    let mut found: Vec<Match> = Vec::new();
    for origin in scan_origins(grid.width(), grid.height()) {
        for axis in AXIS_PRIORITY {
            if let Some(m) = run_at(grid, origin, axis) {
                if !found.contains(&m) {
                    found.push(m);
                }
            }
        }
    }
    found
}
