//! Game mode state machine
//!
//! `Sliding -> FinalPiece -> Completed`, with `reset` returning to `Sliding` from
//! anywhere. The two forward transitions are timed: they are scheduled by an event and
//! fire once `tick` has accumulated the configured delay. At most one transition is
//! pending at a time and `reset`/`cancel_pending` revoke it, so a stale timer can never
//! fire into a later state.

use tracing::info;

use crate::types::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    target: GameMode,
    remaining_ms: u32,
}

#[derive(Debug, Clone)]
pub struct ModeMachine {
    mode: GameMode,
    pending: Option<Scheduled>,
    final_piece_delay_ms: u32,
    completion_delay_ms: u32,
}

impl ModeMachine {
    pub fn new(final_piece_delay_ms: u32, completion_delay_ms: u32) -> Self {
        Self {
            mode: GameMode::Sliding,
            pending: None,
            final_piece_delay_ms,
            completion_delay_ms,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn placed(&self) -> bool {
        self.mode.placed()
    }

    /// Target of the pending transition, if one is scheduled
    pub fn pending_target(&self) -> Option<GameMode> {
        self.pending.map(|p| p.target)
    }

    /// Milliseconds until the pending transition fires
    pub fn pending_ms(&self) -> Option<u32> {
        self.pending.map(|p| p.remaining_ms)
    }

    /// True while tiles may be moved, shuffled or solved.
    pub fn accepts_sliding_input(&self) -> bool {
        self.mode == GameMode::Sliding && self.pending.is_none()
    }

    /// The board became solved.
    ///
    /// Schedules `FinalPiece` when sliding; ignored otherwise. Returns whether a
    /// transition was scheduled.
    pub fn on_solved(&mut self) -> bool {
        if self.mode != GameMode::Sliding || self.pending.is_some() {
            return false;
        }
        self.pending = Some(Scheduled {
            target: GameMode::FinalPiece { placed: false },
            remaining_ms: self.final_piece_delay_ms,
        });
        true
    }

    /// Drop the missing piece into place.
    ///
    /// Only the first attempt in `FinalPiece` counts; anything else is a no-op.
    pub fn place_final_piece(&mut self) -> bool {
        if self.mode != (GameMode::FinalPiece { placed: false }) {
            return false;
        }
        self.mode = GameMode::FinalPiece { placed: true };
        self.pending = Some(Scheduled {
            target: GameMode::Completed,
            remaining_ms: self.completion_delay_ms,
        });
        info!("final piece placed");
        true
    }

    /// Advance the pending timer; returns the new mode if a transition fired.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<GameMode> {
        let pending = self.pending.as_mut()?;
        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return None;
        }

        let target = pending.target;
        self.pending = None;
        self.mode = target;
        info!(mode = target.as_str(), "mode transition");
        Some(target)
    }

    /// Revoke the pending transition without changing mode.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Return to `Sliding` and revoke any pending transition.
    pub fn reset(&mut self) {
        self.pending = None;
        self.mode = GameMode::Sliding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_schedules_final_piece_after_delay() {
        let mut m = ModeMachine::new(1000, 500);
        assert!(m.on_solved());
        assert!(!m.accepts_sliding_input());

        assert_eq!(m.tick(999), None);
        assert_eq!(m.mode(), GameMode::Sliding);
        assert_eq!(m.pending_ms(), Some(1));

        assert_eq!(m.tick(1), Some(GameMode::FinalPiece { placed: false }));
        assert_eq!(m.mode(), GameMode::FinalPiece { placed: false });
        assert_eq!(m.pending_target(), None);
    }

    #[test]
    fn zero_delay_fires_on_next_tick() {
        let mut m = ModeMachine::new(0, 0);
        m.on_solved();
        assert_eq!(m.mode(), GameMode::Sliding);
        assert_eq!(m.tick(0), Some(GameMode::FinalPiece { placed: false }));
    }

    #[test]
    fn single_placement_reaches_completed() {
        let mut m = ModeMachine::new(0, 200);
        m.on_solved();
        m.tick(0);

        assert!(m.place_final_piece());
        assert!(m.placed());
        assert!(!m.place_final_piece());

        assert_eq!(m.tick(100), None);
        assert_eq!(m.tick(100), Some(GameMode::Completed));
        assert!(!m.placed());
        assert!(!m.place_final_piece());
    }

    #[test]
    fn placement_while_sliding_is_a_no_op() {
        let mut m = ModeMachine::new(1000, 1000);
        assert!(!m.place_final_piece());
        m.on_solved();
        assert!(!m.place_final_piece());
        assert_eq!(m.mode(), GameMode::Sliding);
    }

    #[test]
    fn solved_outside_sliding_is_ignored() {
        let mut m = ModeMachine::new(0, 0);
        m.on_solved();
        m.tick(0);
        assert!(!m.on_solved());
        assert_eq!(m.pending_target(), None);
    }

    #[test]
    fn reset_revokes_pending_transition() {
        let mut m = ModeMachine::new(0, 1000);
        m.on_solved();
        m.tick(0);
        m.place_final_piece();

        m.reset();
        assert_eq!(m.mode(), GameMode::Sliding);
        assert!(m.accepts_sliding_input());
        // The Completed timer must not fire into the new Sliding round.
        assert_eq!(m.tick(5000), None);
        assert_eq!(m.mode(), GameMode::Sliding);
    }

    #[test]
    fn cancel_pending_keeps_mode() {
        let mut m = ModeMachine::new(1000, 1000);
        m.on_solved();
        assert!(m.cancel_pending());
        assert!(!m.cancel_pending());
        assert_eq!(m.tick(2000), None);
        assert_eq!(m.mode(), GameMode::Sliding);
    }
}
