use crate::types::{GameMode, SequenceKind};

/// Pending timers as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    /// Milliseconds until the scheduled mode transition fires (0 when none)
    pub transition_ms: u32,
    /// Steps left in the in-flight sequence
    pub steps_remaining: u32,
}

/// Read-only view of one committed game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PuzzleSnapshot {
    pub revision: u64,
    pub side: usize,
    /// Row-major tile ids
    pub tiles: Vec<u16>,
    /// Blank cell; None only when the board lost its single-blank invariant
    pub blank: Option<usize>,
    pub solved: bool,
    pub path_len: usize,
    pub mode: GameMode,
    pub busy: Option<SequenceKind>,
    pub transition_pending: Option<GameMode>,
    pub timers: TimersSnapshot,
}

impl PuzzleSnapshot {
    /// True when a click on the board could be accepted
    pub fn accepts_moves(&self) -> bool {
        self.mode == GameMode::Sliding && self.busy.is_none() && self.transition_pending.is_none()
    }

    /// True while the missing piece is waiting to be dropped
    pub fn awaiting_final_piece(&self) -> bool {
        self.mode == (GameMode::FinalPiece { placed: false })
    }
}
