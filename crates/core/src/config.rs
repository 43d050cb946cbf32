//! Round configuration.
//!
//! Defaults come from the shared constants. A config can be loaded from
//! JSON (missing fields fall back to defaults) and overridden from the
//! environment:
//!
//! - `MATCH3_CONFIG`: path to a JSON config file
//! - `MATCH3_WIDTH` / `MATCH3_HEIGHT`: board size
//! - `MATCH3_PIECES`: number of token types
//! - `MATCH3_SEED`: RNG seed
//!
//! Every constructor validates before returning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    CASCADE_PASS_MS, DEFAULT_GOAL_PERCENTAGE, DEFAULT_HEIGHT, DEFAULT_PIECE_COUNT,
    DEFAULT_POINTS_PER_PIECE, DEFAULT_ROUND_GOAL, DEFAULT_WIDTH, MAX_CASCADE_PASSES,
    MAX_GRID_DIM, MAX_PIECE_COUNT, MIN_PIECE_COUNT, ROUND_MS, RUSH_ROUND_MS,
};

pub const CONFIG_PATH_ENV: &str = "MATCH3_CONFIG";
pub const WIDTH_ENV: &str = "MATCH3_WIDTH";
pub const HEIGHT_ENV: &str = "MATCH3_HEIGHT";
pub const PIECES_ENV: &str = "MATCH3_PIECES";
pub const SEED_ENV: &str = "MATCH3_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    pub piece_count: u8,
    pub points_per_piece: u64,
    pub initial_goal: u64,
    pub goal_percentage: f64,
    pub round_ms: u32,
    pub rush_round_ms: u32,
    /// Delay between cascade passes; 0 settles the cascade inside the swap.
    pub cascade_pass_ms: u32,
    /// `None` disables the cap.
    pub max_cascade_passes: Option<u32>,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            piece_count: DEFAULT_PIECE_COUNT,
            points_per_piece: DEFAULT_POINTS_PER_PIECE,
            initial_goal: DEFAULT_ROUND_GOAL,
            goal_percentage: DEFAULT_GOAL_PERCENTAGE,
            round_ms: ROUND_MS,
            rush_round_ms: RUSH_ROUND_MS,
            cascade_pass_ms: CASCADE_PASS_MS,
            max_cascade_passes: Some(MAX_CASCADE_PASSES),
            seed: 1,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim_ok = |d: u8| d >= 1 && (d as usize) <= MAX_GRID_DIM;
        if !dim_ok(self.width) || !dim_ok(self.height) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
                max: MAX_GRID_DIM,
            });
        }
        if !(MIN_PIECE_COUNT..=MAX_PIECE_COUNT).contains(&self.piece_count) {
            return Err(ConfigError::InvalidPieceCount {
                count: self.piece_count,
                min: MIN_PIECE_COUNT,
                max: MAX_PIECE_COUNT,
            });
        }
        if !self.goal_percentage.is_finite() || self.goal_percentage < 0.0 {
            return Err(ConfigError::InvalidGoalPercentage(self.goal_percentage));
        }
        if self.round_ms == 0 {
            return Err(ConfigError::ZeroDuration { name: "round_ms" });
        }
        if self.rush_round_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "rush_round_ms",
            });
        }
        if self.max_cascade_passes == Some(0) {
            return Err(ConfigError::ZeroPassCap);
        }
        Ok(())
    }

    /// Timer duration for a normal or rush round.
    pub fn round_duration_ms(&self, rush: bool) -> u32 {
        if rush {
            self.rush_round_ms
        } else {
            self.round_ms
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(v) = parse_var(&lookup, WIDTH_ENV)? {
            config.width = v;
        }
        if let Some(v) = parse_var(&lookup, HEIGHT_ENV)? {
            config.height = v;
        }
        if let Some(v) = parse_var(&lookup, PIECES_ENV)? {
            config.piece_count = v;
        }
        if let Some(v) = parse_var(&lookup, SEED_ENV)? {
            config.seed = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
