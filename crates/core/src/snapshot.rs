//! Snapshot module - serializable view of a round for renderers and tooling
//!
//! A snapshot is meant to be refilled every frame through
//! `GameState::snapshot_into`; row buffers keep their allocations between
//! fills as long as the board size does not change.

use serde::Serialize;

use crate::grid::Grid;
use crate::types::Coord;

/// Read-only copy of the round state for renderers and tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Top row first; `None` is an EMPTY cell.
    pub rows: Vec<Vec<Option<u8>>>,
    pub points: u64,
    pub round_goal: u64,
    pub timer_ms: u32,
    pub running: bool,
    pub rush: bool,
    pub resolving: bool,
    pub selected: Option<[i8; 2]>,
    pub round_id: u32,
}

impl GameSnapshot {
    /// Copy the board into `rows`, overwriting the existing buffers in place.
    pub fn write_grid(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();
        self.rows.resize_with(grid.height() as usize, Vec::new);

        let top = grid.height() as i8 - 1;
        for (i, row) in self.rows.iter_mut().enumerate() {
            let y = top - i as i8;
            row.resize(grid.width() as usize, None);
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = grid.try_get(x as i8, y).flatten().map(|t| t.index());
            }
        }
    }

    /// Token at `(x, y)` in board coordinates (`y = 0` is the bottom row).
    pub fn cell(&self, x: i8, y: i8) -> Option<u8> {
        if x < 0 || y < 0 || y as u8 >= self.height {
            return None;
        }
        let row = self.height as usize - 1 - y as usize;
        self.rows.get(row)?.get(x as usize).copied().flatten()
    }

    pub fn selected_coord(&self) -> Option<Coord> {
        self.selected.map(|[x, y]| Coord::new(x, y))
    }

    /// A click would be accepted: the round runs and no cascade is pending.
    pub fn playable(&self) -> bool {
        self.running && !self.resolving
    }
}
