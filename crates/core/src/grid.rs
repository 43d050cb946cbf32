//! Grid module - owns the 2-D array of token cells
//!
//! Cells are fixed; only the token inside a cell changes. Storage is a flat
//! row-major vector (`y * width + x`) with `y = 0` at the bottom.

use crate::error::GridError;
use crate::rng::TokenSource;
use crate::types::{Cell, Coord, Token, MIN_MATCH_LEN};

/// The playing field - `width` columns x `height` rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell EMPTY.
    ///
    /// Callers fill it before play; an all-empty grid is only a construction step.
    pub fn empty(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Create a grid with every cell holding `token`.
    pub fn filled(width: u8, height: u8, token: Token) -> Self {
        Self {
            width,
            height,
            cells: vec![Some(token); width as usize * height as usize],
        }
    }

    /// Fill a fresh grid without any pre-existing run of [`MIN_MATCH_LEN`].
    ///
    /// Cells are visited bottom row first, left to right. A drawn token that
    /// would complete a run with the two cells to its left or the two cells
    /// below it is replaced by a uniform pick among the remaining tokens.
    /// Needs `piece_count >= 3` to always find a candidate.
    pub fn generate(
        width: u8,
        height: u8,
        piece_count: u8,
        source: &mut impl TokenSource,
    ) -> Self {
        let mut grid = Self::empty(width, height);
        let run = MIN_MATCH_LEN as i8 - 1;

        for y in 0..height as i8 {
            for x in 0..width as i8 {
                let left = grid.repeated(Coord::new(x, y), -1, 0, run);
                let below = grid.repeated(Coord::new(x, y), 0, -1, run);

                let drawn = source.next_token(piece_count);
                let token = if Some(drawn) == left || Some(drawn) == below {
                    let allowed: Vec<Token> = (0..piece_count)
                        .map(Token::new)
                        .filter(|t| Some(*t) != left && Some(*t) != below)
                        .collect();
                    if allowed.is_empty() {
                        drawn
                    } else {
                        allowed[source.next_index(allowed.len())]
                    }
                } else {
                    drawn
                };

                let idx = grid.index_unchecked(x, y);
                grid.cells[idx] = Some(token);
            }
        }

        grid
    }

    /// Token shared by the `count` cells stepping `(dx, dy)` away from `from`,
    /// if they all hold the same one.
    fn repeated(&self, from: Coord, dx: i8, dy: i8, count: i8) -> Option<Token> {
        let mut shared: Option<Token> = None;
        for i in 1..=count {
            let cell = self.try_get(from.x + dx * i, from.y + dy * i)??;
            match shared {
                None => shared = Some(cell),
                Some(t) if t == cell => {}
                Some(_) => return None,
            }
        }
        shared
    }

    /// Build a grid from text rows, top row first.
    ///
    /// Each character is a base-36 token digit (`0-9`, then `a-z`) or `.` for
    /// EMPTY. Intended for tests and fixtures.
    ///
    /// # Panics
    ///
    /// Panics if rows are ragged, empty, or contain an unknown character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_core::Grid;
    /// use tui_match3_core::types::Token;
    ///
    /// let grid = Grid::from_rows(&["012", "345"]);
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.height(), 2);
    /// // Bottom-left is the first character of the last row.
    /// assert_eq!(grid.get(0, 0), Ok(Some(Token::new(3))));
    /// assert_eq!(grid.get(2, 1), Ok(Some(Token::new(2))));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(!rows.is_empty(), "grid needs at least one row");
        let width = rows[0].chars().count();
        assert!(
            rows.iter().all(|r| r.chars().count() == width),
            "ragged rows: {rows:?}"
        );

        let height = rows.len();
        let mut grid = Self::empty(width as u8, height as u8);
        for (row_idx, row) in rows.iter().enumerate() {
            let y = (height - 1 - row_idx) as i8;
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    _ => Some(
                        Token::from_char(ch)
                            .unwrap_or_else(|| panic!("unknown cell character {ch:?}")),
                    ),
                };
                let idx = grid.index_unchecked(x as i8, y);
                grid.cells[idx] = cell;
            }
        }
        grid
    }

    /// Render as text rows, top row first (inverse of [`Grid::from_rows`]).
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i8)
            .rev()
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| match self.cells[self.index_unchecked(x, y)] {
                        Some(t) => t.as_char(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.index_unchecked(x, y))
    }

    #[inline(always)]
    fn index_unchecked(&self, x: i8, y: i8) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn out_of_bounds(&self, x: i8, y: i8) -> GridError {
        GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if position lies on the grid
    #[inline]
    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && (x as u8) < self.width && (y as u8) < self.height
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.in_bounds(c.x, c.y)
    }

    /// Get cell at position (x, y)
    pub fn get(&self, x: i8, y: i8) -> Result<Cell, GridError> {
        self.index(x, y)
            .map(|idx| self.cells[idx])
            .ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Get cell at position (x, y), `None` if out of bounds
    pub fn try_get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    pub fn at(&self, c: Coord) -> Result<Cell, GridError> {
        self.get(c.x, c.y)
    }

    /// Set cell at position (x, y)
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> Result<(), GridError> {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                Ok(())
            }
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    pub fn set_at(&mut self, c: Coord, cell: Cell) -> Result<(), GridError> {
        self.set(c.x, c.y, cell)
    }

    /// Exchange the tokens of two cells. Neither cell moves.
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), GridError> {
        let ia = self.index(a.x, a.y).ok_or_else(|| self.out_of_bounds(a.x, a.y))?;
        let ib = self.index(b.x, b.y).ok_or_else(|| self.out_of_bounds(b.x, b.y))?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// True when no cell is EMPTY.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All coordinates, bottom row first, left to right.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height as i8)
            .flat_map(move |y| (0..self.width as i8).map(move |x| Coord::new(x, y)))
    }
}
