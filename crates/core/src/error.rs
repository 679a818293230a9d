//! Typed failures shared by every puzzle operation.
//!
//! All variants are recoverable at the call site. `InvariantViolation` means the
//! board stopped being a permutation with exactly one blank; it indicates a logic
//! bug and the engine refuses to continue from that state.

use thiserror::Error;

use crate::types::{GameMode, SequenceKind};

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("illegal move: cell {index} is not a tile next to the blank")]
    IllegalMove { index: usize },

    #[error("engine busy: a {} sequence is in flight", .kind.as_str())]
    EngineBusy { kind: SequenceKind },

    #[error("no recorded path to replay")]
    NoPath,

    #[error("grid invariant violated: {detail}")]
    InvariantViolation { detail: &'static str },

    #[error("request refused in {} mode", .mode.as_str())]
    ModeLocked { mode: GameMode },

    #[error("invalid board side {side}")]
    InvalidSide { side: usize },
}

impl PuzzleError {
    /// Stable snake_case code for the session protocol.
    pub fn code(self) -> &'static str {
        match self {
            PuzzleError::IllegalMove { .. } => "illegal_move",
            PuzzleError::EngineBusy { .. } => "engine_busy",
            PuzzleError::NoPath => "no_path",
            PuzzleError::InvariantViolation { .. } => "invariant_violation",
            PuzzleError::ModeLocked { .. } => "mode_locked",
            PuzzleError::InvalidSide { .. } => "invalid_side",
        }
    }

    pub fn is_invariant_violation(self) -> bool {
        matches!(self, PuzzleError::InvariantViolation { .. })
    }
}
