//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the workspace crates under one `tui_match3::{core,input,term,types}`
//! path. The rule engine lives in `core`; `input` and `term` are the terminal
//! front end.

pub use tui_match3_core as core;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
