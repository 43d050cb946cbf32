//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rule engine, terminal rendering, input mapping).
//!
//! # Board Geometry
//!
//! - **Default size**: 6 columns x 6 rows
//! - **Maximum size**: [`MAX_GRID_DIM`] per axis
//! - **Origin**: `(0, 0)` is the bottom-left cell; `y` grows upward, so falling
//!   means decreasing `y`
//!
//! # Round Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `ROUND_MS` | 60000 | Normal round duration |
//! | `RUSH_ROUND_MS` | 30000 | Rush round duration |
//! | `CASCADE_PASS_MS` | 0 | Delay between cascade passes (0 = settle eagerly) |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Axis, BoardAction, Coord, Token};
//!
//! let a = Coord::new(1, 1);
//! assert!(a.is_adjacent(Coord::new(1, 2)));
//! assert!(!a.is_adjacent(Coord::new(2, 2)));
//!
//! assert_eq!(Axis::Vertical.step(), (0, 1));
//! assert_eq!(Token::new(3).index(), 3);
//!
//! assert_eq!(BoardAction::from_str("select"), Some(BoardAction::Select));
//! ```

use std::fmt;

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 6;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 6;

/// Largest supported width or height.
///
/// Runs never exceed this length, which lets them live in fixed-capacity storage.
pub const MAX_GRID_DIM: usize = 32;

/// Default number of distinct token types
pub const DEFAULT_PIECE_COUNT: u8 = 7;

/// Fewest token types a board may use (a no-match fill needs at least 3)
pub const MIN_PIECE_COUNT: u8 = 3;

/// Most token types a board may use
pub const MAX_PIECE_COUNT: u8 = 16;

/// Shortest run that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Points awarded per cleared token
pub const DEFAULT_POINTS_PER_PIECE: u64 = 10;

/// First score threshold of a round
pub const DEFAULT_ROUND_GOAL: u64 = 100;

/// Fraction of current points added to the goal when it is beaten
pub const DEFAULT_GOAL_PERCENTAGE: f64 = 0.5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Normal round duration (60s)
pub const ROUND_MS: u32 = 60_000;

/// Rush round duration (30s)
pub const RUSH_ROUND_MS: u32 = 30_000;

/// Pause between cascade passes; 0 resolves the whole cascade inside the swap
pub const CASCADE_PASS_MS: u32 = 0;

/// Default safety cap on passes per cascade
pub const MAX_CASCADE_PASSES: u32 = 1000;

/// A token type identifier in `[0, piece_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u8);

impl Token {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Single character used by text boards: `0-9` then `a-z`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::Token;
    ///
    /// assert_eq!(Token::new(2).as_char(), '2');
    /// assert_eq!(Token::new(10).as_char(), 'a');
    /// assert_eq!(Token::from_char('a'), Some(Token::new(10)));
    /// assert_eq!(Token::from_char('.'), None);
    /// ```
    pub fn as_char(self) -> char {
        char::from_digit(self.0 as u32, 36).unwrap_or('?')
    }

    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(36).map(|d| Token(d as u8))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell on the grid
///
/// - `None`: EMPTY, only observable while a clear is being compacted
/// - `Some(Token)`: cell holds a token
pub type Cell = Option<Token>;

/// Grid coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`, `None` on overflow.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        (self.x as i32 - other.x as i32).unsigned_abs()
            + (self.y as i32 - other.y as i32).unsigned_abs()
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a run extends along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Unit step in the positive direction.
    pub fn step(self) -> (i8, i8) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// Player actions produced by input collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    /// Move the keyboard cursor one cell left
    CursorLeft,
    /// Move the keyboard cursor one cell right
    CursorRight,
    /// Move the keyboard cursor one cell up
    CursorUp,
    /// Move the keyboard cursor one cell down
    CursorDown,
    /// Click the cell under the cursor
    Select,
    /// Drop the current selection
    Cancel,
    /// Start a normal round
    StartRound,
    /// Start a rush round
    StartRush,
}

impl BoardAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::BoardAction;
    ///
    /// assert_eq!(BoardAction::from_str("cursorLeft"), Some(BoardAction::CursorLeft));
    /// assert_eq!(BoardAction::from_str("startRush"), Some(BoardAction::StartRush));
    /// assert_eq!(BoardAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(BoardAction::CursorLeft),
            "cursorright" => Some(BoardAction::CursorRight),
            "cursorup" => Some(BoardAction::CursorUp),
            "cursordown" => Some(BoardAction::CursorDown),
            "select" => Some(BoardAction::Select),
            "cancel" => Some(BoardAction::Cancel),
            "startround" => Some(BoardAction::StartRound),
            "startrush" => Some(BoardAction::StartRush),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardAction::CursorLeft => "cursorLeft",
            BoardAction::CursorRight => "cursorRight",
            BoardAction::CursorUp => "cursorUp",
            BoardAction::CursorDown => "cursorDown",
            BoardAction::Select => "select",
            BoardAction::Cancel => "cancel",
            BoardAction::StartRound => "startRound",
            BoardAction::StartRush => "startRush",
        }
    }
}
