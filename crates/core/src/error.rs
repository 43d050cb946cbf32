//! Error types for the rule engine.
//!
//! `GridError` signals a caller bug (coordinates outside the board).
//! `SwapError` covers every player-triggered rejection; callers treat it as
//! a no-op with feedback. `ConfigError` is raised while building a
//! [`GameConfig`](crate::config::GameConfig).

use crate::types::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i8, y: i8, width: u8, height: u8 },
}

/// Why a swap request was rejected. The grid is untouched in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("no round is running")]
    RoundNotRunning,

    #[error("a cascade is still resolving")]
    CascadeInProgress,

    #[error("no cell is selected")]
    NoSelection,

    #[error("{from} is not adjacent to {to}")]
    NotAdjacent { from: Coord, to: Coord },

    #[error(transparent)]
    OutOfBounds(#[from] GridError),
}

impl SwapError {
    /// Player-triggered rejections are recoverable; bounds violations are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SwapError::OutOfBounds(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapError::RoundNotRunning => "round_not_running",
            SwapError::CascadeInProgress => "cascade_in_progress",
            SwapError::NoSelection => "no_selection",
            SwapError::NotAdjacent { .. } => "not_adjacent",
            SwapError::OutOfBounds(_) => "out_of_bounds",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size {width}x{height} must be between 1x1 and {max}x{max}")]
    InvalidSize { width: u8, height: u8, max: usize },

    #[error("piece count {count} must be between {min} and {max}")]
    InvalidPieceCount { count: u8, min: u8, max: u8 },

    #[error("goal percentage {0} must be a finite non-negative number")]
    InvalidGoalPercentage(f64),

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error("cascade pass cap must be greater than zero")]
    ZeroPassCap,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_converts_into_swap_error() {
        let err: SwapError = GridError::OutOfBounds {
            x: 9,
            y: 0,
            width: 6,
            height: 6,
        }
        .into();
        assert!(!err.is_recoverable());
        assert_eq!(err.as_str(), "out_of_bounds");
        assert_eq!(err.to_string(), "coordinate (9, 0) is outside the 6x6 grid");
    }

    #[test]
    fn rejections_are_recoverable() {
        let err = SwapError::NotAdjacent {
            from: Coord::new(0, 0),
            to: Coord::new(2, 0),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "(0, 0) is not adjacent to (2, 0)");
        assert!(SwapError::RoundNotRunning.is_recoverable());
        assert!(SwapError::CascadeInProgress.is_recoverable());
    }
}
