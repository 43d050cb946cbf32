//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play. It avoids widget toolkits and
//! renders into a framebuffer that is diffed and flushed to the terminal.
//!
//! - [`GameView`] turns a [`core::GameSnapshot`] plus the keyboard cursor
//!   into a [`FrameBuffer`] (pure, testable)
//! - [`TerminalRenderer`] writes framebuffers to a terminal

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{token_color, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
