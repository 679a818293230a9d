//! Session configuration from environment variables.

use std::env;

use crate::engine::GameConfig;
use crate::types::{
    COMPLETION_DELAY_MS, DEFAULT_SHUFFLE_MOVES, DEFAULT_SIDE, DEFAULT_STEP_DELAY_MS,
    FINAL_PIECE_DELAY_MS, TICK_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub side: usize,
    pub shuffle_moves: u32,
    pub step_delay_ms: u32,
    pub final_piece_delay_ms: u32,
    pub completion_delay_ms: u32,
    pub tick_ms: u32,
    pub seed: u32,
    pub max_pending: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            side: game.side,
            shuffle_moves: game.shuffle_moves,
            step_delay_ms: game.step_delay_ms,
            final_piece_delay_ms: game.final_piece_delay_ms,
            completion_delay_ms: game.completion_delay_ms,
            tick_ms: TICK_MS,
            seed: game.seed,
            max_pending: 16,
        }
    }
}

impl SessionConfig {
    /// Create from `SLIDE_PUZZLE_*` environment variables.
    ///
    /// Missing or unparsable values fall back to defaults; the seed falls back to the
    /// wall clock.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SessionConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
            default: T,
        ) -> T {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        Self {
            side: parsed(&lookup, "SLIDE_PUZZLE_SIDE", DEFAULT_SIDE),
            shuffle_moves: parsed(&lookup, "SLIDE_PUZZLE_SHUFFLE_MOVES", DEFAULT_SHUFFLE_MOVES),
            step_delay_ms: parsed(&lookup, "SLIDE_PUZZLE_STEP_DELAY_MS", DEFAULT_STEP_DELAY_MS),
            final_piece_delay_ms: parsed(
                &lookup,
                "SLIDE_PUZZLE_FINAL_PIECE_DELAY_MS",
                FINAL_PIECE_DELAY_MS,
            ),
            completion_delay_ms: parsed(
                &lookup,
                "SLIDE_PUZZLE_COMPLETION_DELAY_MS",
                COMPLETION_DELAY_MS,
            ),
            tick_ms: parsed(&lookup, "SLIDE_PUZZLE_TICK_MS", TICK_MS).max(1),
            seed: lookup("SLIDE_PUZZLE_SEED")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or_else(clock_seed),
            max_pending: parsed(&lookup, "SLIDE_PUZZLE_MAX_PENDING", 16usize).max(1),
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            side: self.side,
            shuffle_moves: self.shuffle_moves,
            step_delay_ms: self.step_delay_ms,
            final_piece_delay_ms: self.final_piece_delay_ms,
            completion_delay_ms: self.completion_delay_ms,
            seed: self.seed,
        }
    }
}

fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u32
}
