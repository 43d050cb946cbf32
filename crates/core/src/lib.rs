//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules: the token grid, run detection,
//! gravity and refill, the cascade loop with scoring, and the round state
//! machine. It has no dependency on terminals or I/O beyond reading a config
//! file, so the same engine runs under a TUI, in tests, or headless.
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size board of optional tokens, `y = 0` at the bottom
//! - [`matcher`]: checkerboard scan for runs of 3+ identical tokens
//! - [`gravity`]: column compaction and uniform refill after a clear
//! - [`resolver`]: repeated match / fall / refill passes until stable
//! - [`game_state`]: selection protocol, swap validation, timer and goal
//! - [`scoring`]: points per token and goal progression
//! - [`effects`] / [`events`]: visual-effect sink and round observers
//! - [`rng`]: seeded token sources
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{GameConfig, GameState, TickOutcome};
//!
//! let mut game = GameState::new(GameConfig::default()).unwrap();
//! game.start_round(false);
//! assert!(game.running());
//!
//! // Rejected swaps never touch the board.
//! let before = game.grid().clone();
//! let a = tui_match3_core::types::Coord::new(0, 0);
//! let b = tui_match3_core::types::Coord::new(2, 0);
//! assert!(game.request_swap(a, b).is_err());
//! assert_eq!(game.grid(), &before);
//!
//! assert_eq!(game.on_tick(16), TickOutcome::Running);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::on_tick`](game_state::GameState::on_tick) every frame
//! with the elapsed milliseconds. The round timer counts down from 60s (30s
//! in rush mode); on expiry the goal is either raised or the round ends.

pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use effects::{Effect, EffectLog, EffectSink, NullSink};
pub use error::{ConfigError, GridError, SwapError};
pub use events::{GameEvent, SubscriptionId};
pub use game_state::{ClickOutcome, GameState, Phase, SwapOutcome, TickOutcome};
pub use gravity::{Fall, Settle};
pub use grid::Grid;
pub use matcher::{find_matches, Match};
pub use resolver::{Cascade, CascadeReport, PassReport, ResolvedMatch, Resolver};
pub use rng::{ScriptedTokens, SimpleRng, TokenSource};
pub use snapshot::GameSnapshot;
