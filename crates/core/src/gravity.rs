//! Gravity resolver - column compaction and refill after a clear
//!
//! Clearing marks the matched cells EMPTY. Every affected column is then
//! compacted: tokens above a gap shift down by the number of EMPTY cells
//! beneath them, which is the run length for a vertical clear and 1 for each
//! column of a horizontal clear. The top cells left EMPTY become refill
//! targets and receive uniform random tokens.
//!
//! Each call builds fresh `falls` and `vacated` lists. Nothing is reused
//! between the fall phase and the refill phase.

use crate::error::GridError;
use crate::grid::Grid;
use crate::rng::TokenSource;
use crate::types::{Coord, Token};

/// One token moving down within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub from: Coord,
    pub to: Coord,
    pub token: Token,
}

impl Fall {
    /// Rows travelled.
    pub fn distance(&self) -> u8 {
        (self.from.y - self.to.y) as u8
    }
}

/// Result of compacting the columns touched by a clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settle {
    /// Per column (ascending x), in upward walk order.
    pub falls: Vec<Fall>,
    /// Cells left EMPTY at the top of each column, column order, bottom to top.
    pub vacated: Vec<Coord>,
}

/// Clear `cleared` and compact every column it touches.
///
/// All coordinates are checked before anything is written, so an
/// out-of-bounds entry leaves the grid untouched.
pub fn collapse(grid: &mut Grid, cleared: &[Coord]) -> Result<Settle, GridError> {
    for &c in cleared {
        grid.at(c)?;
    }
    for &c in cleared {
        grid.set_at(c, None)?;
    }

    let mut columns: Vec<i8> = cleared.iter().map(|c| c.x).collect();
    columns.sort_unstable();
    columns.dedup();

    let mut settle = Settle::default();
    for x in columns {
        compact_column(grid, x, &mut settle)?;
    }
    Ok(settle)
}

fn compact_column(grid: &mut Grid, x: i8, settle: &mut Settle) -> Result<(), GridError> {
    let height = grid.height() as i8;
    let mut write_y: i8 = 0;

    for read_y in 0..height {
        let Some(token) = grid.get(x, read_y)? else {
            continue;
        };
        if read_y != write_y {
            grid.set(x, write_y, Some(token))?;
            grid.set(x, read_y, None)?;
            settle.falls.push(Fall {
                from: Coord::new(x, read_y),
                to: Coord::new(x, write_y),
                token,
            });
        }
        write_y += 1;
    }

    settle
        .vacated
        .extend((write_y..height).map(|y| Coord::new(x, y)));
    Ok(())
}

/// Draw a new token for every cell in `targets`, in order.
pub fn refill(
    grid: &mut Grid,
    targets: &[Coord],
    piece_count: u8,
    source: &mut impl TokenSource,
) -> Result<(), GridError> {
    for &c in targets {
        grid.at(c)?;
    }
    for &c in targets {
        let token = source.next_token(piece_count);
        grid.set_at(c, Some(token))?;
    }
    Ok(())
}

/// True when no EMPTY cell sits below a token in column `x`.
pub fn is_compact(grid: &Grid, x: i8) -> bool {
    let mut seen_empty = false;
    for y in 0..grid.height() as i8 {
        match grid.try_get(x, y) {
            Some(None) => seen_empty = true,
            Some(Some(_)) if seen_empty => return false,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::rng::ScriptedTokens;

    #[test]
    fn test_vertical_clear_shifts_by_run_length() {
        let mut grid = Grid::from_rows(&[
            "5", //
            "4", //
            "1", //
            "1", //
            "1", //
            "2", //
        ]);
        let m = &find_matches(&grid)[0];
        let settle = collapse(&mut grid, &m.cells).unwrap();

        assert_eq!(grid.to_rows(), vec![".", ".", ".", "5", "4", "2"]);
        assert_eq!(
            settle.falls,
            vec![
                Fall {
                    from: Coord::new(0, 4),
                    to: Coord::new(0, 1),
                    token: Token::new(4)
                },
                Fall {
                    from: Coord::new(0, 5),
                    to: Coord::new(0, 2),
                    token: Token::new(5)
                },
            ]
        );
        assert!(settle.falls.iter().all(|f| f.distance() == 3));
        assert_eq!(
            settle.vacated,
            vec![Coord::new(0, 3), Coord::new(0, 4), Coord::new(0, 5)]
        );
    }

    #[test]
    fn test_clear_at_top_has_no_falls() {
        let mut grid = Grid::from_rows(&["3", "3", "3", "1"]);
        let settle = collapse(
            &mut grid,
            &[Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3)],
        )
        .unwrap();
        assert!(settle.falls.is_empty());
        assert_eq!(settle.vacated.len(), 3);
        assert_eq!(grid.to_rows(), vec![".", ".", ".", "1"]);
    }

    #[test]
    fn test_short_column_leaves_remaining_slots_for_refill() {
        // One token above a 3-run: only one source, three vacated slots.
        let mut grid = Grid::from_rows(&["6", "0", "0", "0", "4"]);
        let settle = collapse(
            &mut grid,
            &[Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3)],
        )
        .unwrap();
        assert_eq!(settle.falls.len(), 1);
        assert_eq!(settle.falls[0].to, Coord::new(0, 1));
        assert_eq!(settle.vacated, vec![Coord::new(0, 2), Coord::new(0, 3), Coord::new(0, 4)]);
    }

    #[test]
    fn test_horizontal_clear_shifts_each_column_by_one() {
        let mut grid = Grid::from_rows(&[
            "1234", //
            "5612", //
            "0003", //
        ]);
        let cleared = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
        let settle = collapse(&mut grid, &cleared).unwrap();

        assert_eq!(grid.to_rows(), vec!["...4", "1232", "5613"]);
        assert_eq!(settle.falls.len(), 6);
        assert!(settle.falls.iter().all(|f| f.distance() == 1));
        assert_eq!(
            settle.vacated,
            vec![Coord::new(0, 2), Coord::new(1, 2), Coord::new(2, 2)]
        );
        for x in 0..4 {
            assert!(is_compact(&grid, x));
        }
    }

    #[test]
    fn test_refill_draws_in_target_order() {
        let mut grid = Grid::from_rows(&["..", "12"]);
        let mut src = ScriptedTokens::new([4, 5]);
        refill(&mut grid, &[Coord::new(1, 1), Coord::new(0, 1)], 7, &mut src).unwrap();
        assert_eq!(grid.to_rows(), vec!["54", "12"]);
        assert!(grid.is_full());
    }

    #[test]
    fn test_out_of_bounds_clear_leaves_grid_untouched() {
        let mut grid = Grid::from_rows(&["12", "34"]);
        let before = grid.clone();
        assert!(collapse(&mut grid, &[Coord::new(0, 0), Coord::new(2, 0)]).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_compaction_closes_every_gap() {
        let mut grid = Grid::from_rows(&[
            "1.", //
            ".2", //
            "3.", //
            ".4", //
        ]);
        collapse(&mut grid, &[]).unwrap();
        // No columns touched: nothing changes.
        assert!(!is_compact(&grid, 0));

        collapse(&mut grid, &[Coord::new(0, 3), Coord::new(1, 2)]).unwrap();
        assert!(is_compact(&grid, 0));
        assert!(is_compact(&grid, 1));
        assert_eq!(grid.to_rows(), vec!["..", "..", "..", "34"]);
    }
}
