//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the puzzle.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, session runtime, presentation bridge).
//!
//! # Board Dimensions
//!
//! The board is a square grid of `side * side` cells indexed row-major:
//!
//! - **Default side**: 16 (256 tiles)
//! - **Blank tile**: always id `side * side - 1`, which lives in the last cell when solved
//! - **Side bounds**: `MIN_SIDE..=MAX_SIDE` so tile ids fit in a `u16`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Session timestep (~60 FPS) |
//! | `DEFAULT_STEP_DELAY_MS` | 1 | Delay per animated shuffle/solve step |
//! | `FINAL_PIECE_DELAY_MS` | 1000 | Solved image stays visible before final-piece stage |
//! | `COMPLETION_DELAY_MS` | 1500 | Placed piece settles before the completed stage |
//!
//! # Examples
//!
//! ```
//! use slide_puzzle_types::{GameMode, Move, Tile, DEFAULT_SIDE};
//!
//! let tile = Tile::new(3, DEFAULT_SIDE);
//! assert!(!tile.is_blank);
//!
//! let mv = Move::new(15, 14);
//! assert_eq!(mv.reversed(), Move::new(14, 15));
//!
//! assert_eq!(GameMode::from_str("final_piece"), Some(GameMode::FinalPiece { placed: false }));
//! assert_eq!(GameMode::Completed.as_str(), "completed");
//! ```

/// Default board side length (16x16 tiles)
pub const DEFAULT_SIDE: usize = 16;

/// Smallest playable board side
pub const MIN_SIDE: usize = 2;

/// Largest board side whose tile ids still fit in a `u16`
pub const MAX_SIDE: usize = 255;

/// Default number of moves in a shuffle walk
pub const DEFAULT_SHUFFLE_MOVES: u32 = 500;

/// Session timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between two animated shuffle/solve steps.
pub const DEFAULT_STEP_DELAY_MS: u32 = 1;

/// Delay between the board becoming solved and the final-piece stage.
pub const FINAL_PIECE_DELAY_MS: u32 = 1000;

/// Delay between the final piece being placed and the completed stage.
pub const COMPLETION_DELAY_MS: u32 = 1500;

/// Default RNG seed for deterministic sessions (tests, benches).
pub const DEFAULT_SEED: u32 = 1;


/// Id of the blank tile for a board of the given side.
#[inline]
pub fn blank_id(side: usize) -> usize {
    side * side - 1
}

/// A single puzzle tile
///
/// - **id**: identity of the tile, stable across moves
/// - **home**: cell index the tile occupies in the solved arrangement
/// - **is_blank**: marks the single gap other tiles slide into
///
/// In the solved arrangement `id == home`; the fields are kept separate so
/// renderers can look up image offsets from `home` without knowing that rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: u16,
    pub home: u16,
    pub is_blank: bool,
}

impl Tile {
    /// Build the tile with the given id for a board of the given side.
    pub fn new(id: usize, side: usize) -> Self {
        Self {
            id: id as u16,
            home: id as u16,
            is_blank: id == blank_id(side),
        }
    }
}

/// A single slide: the tile at `neighbor` moves into `blank`, and the gap moves to `neighbor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub blank: usize,
    pub neighbor: usize,
}

impl Move {
    pub fn new(blank: usize, neighbor: usize) -> Self {
        Self { blank, neighbor }
    }

    /// The move that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            blank: self.neighbor,
            neighbor: self.blank,
        }
    }
}

/// Game stage
///
/// - **Sliding**: tiles can be moved, shuffled and solved
/// - **FinalPiece**: the board is solved; waiting for the missing piece to be dropped in
/// - **Completed**: terminal celebration stage until a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Sliding,
    FinalPiece { placed: bool },
    Completed,
}

impl GameMode {
    /// Parse a mode from its snake_case protocol name.
    ///
    /// `final_piece` always parses as not yet placed.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sliding" => Some(GameMode::Sliding),
            "final_piece" => Some(GameMode::FinalPiece { placed: false }),
            "completed" => Some(GameMode::Completed),
            _ => None,
        }
    }

    /// Convert to snake_case string for the session protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Sliding => "sliding",
            GameMode::FinalPiece { .. } => "final_piece",
            GameMode::Completed => "completed",
        }
    }

    /// Whether the final piece has been dropped in (only ever true inside `FinalPiece`).
    pub fn placed(&self) -> bool {
        matches!(self, GameMode::FinalPiece { placed: true })
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Sliding
    }
}

/// The multi-step operation currently running on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Random walk of the blank
    Shuffle,
    /// Reverse replay of the recorded walk
    Replay,
    /// Staggered per-tile swaps straight to the solved arrangement
    Direct,
}

impl SequenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceKind::Shuffle => "shuffle",
            SequenceKind::Replay => "replay",
            SequenceKind::Direct => "direct",
        }
    }
}

/// How the board reached the solved arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveCause {
    ManualMove,
    Replay,
    Direct,
}

impl SolveCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveCause::ManualMove => "manual_move",
            SolveCause::Replay => "replay",
            SolveCause::Direct => "direct",
        }
    }
}

/// Emitted by the engine whenever a mutation leaves the board solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvedEvent {
    pub cause: SolveCause,
}

impl SolvedEvent {
    pub fn new(cause: SolveCause) -> Self {
        Self { cause }
    }
}
