//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::BoardAction`] and tracks
//! the keyboard cursor used to pick cells. Selection and swapping semantics
//! live in the core crate; this crate only decides which cell was clicked.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit};
