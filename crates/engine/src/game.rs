//! Game aggregate - the single owner of board, recorded walk and mode
//!
//! [`Game`] combines the [`PuzzleEngine`] with the [`ModeMachine`] and drives both from
//! one clock. Requests start work; [`Game::tick`] advances it. After every committed
//! change the revision is bumped and the installed [`StateObserver`] receives a fresh
//! [`PuzzleSnapshot`].

use std::fmt;

use tracing::{debug, error, info};

use crate::core::{Grid, PuzzleError, Result};
use crate::mode::ModeMachine;
use crate::placement::TargetRegion;
use crate::puzzle::{PuzzleEngine, StepOutcome};
use crate::snapshot::{PuzzleSnapshot, TimersSnapshot};
use crate::types::{
    GameMode, SequenceKind, SolvedEvent, COMPLETION_DELAY_MS, DEFAULT_SEED,
    DEFAULT_SHUFFLE_MOVES, DEFAULT_SIDE, DEFAULT_STEP_DELAY_MS, FINAL_PIECE_DELAY_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub side: usize,
    pub shuffle_moves: u32,
    /// Delay per animated step; 0 runs a whole sequence in one tick
    pub step_delay_ms: u32,
    pub final_piece_delay_ms: u32,
    pub completion_delay_ms: u32,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            shuffle_moves: DEFAULT_SHUFFLE_MOVES,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            final_piece_delay_ms: FINAL_PIECE_DELAY_MS,
            completion_delay_ms: COMPLETION_DELAY_MS,
            seed: DEFAULT_SEED,
        }
    }
}

/// Discrete things that happened, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Solved(SolvedEvent),
    ModeChanged(GameMode),
    SequenceFinished(SequenceKind),
    SequenceCancelled(SequenceKind),
}

/// Receives a snapshot after every committed change.
pub trait StateObserver: Send {
    fn on_state_changed(&mut self, snapshot: &PuzzleSnapshot);
}

impl<F> StateObserver for F
where
    F: FnMut(&PuzzleSnapshot) + Send,
{
    fn on_state_changed(&mut self, snapshot: &PuzzleSnapshot) {
        self(snapshot)
    }
}

pub struct Game {
    engine: PuzzleEngine,
    modes: ModeMachine,
    config: GameConfig,
    /// Time accumulated towards the next sequence step
    step_timer_ms: u32,
    revision: u64,
    events: Vec<GameEvent>,
    observer: Option<Box<dyn StateObserver>>,
    started: bool,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("engine", &self.engine)
            .field("modes", &self.modes)
            .field("config", &self.config)
            .field("revision", &self.revision)
            .field("started", &self.started)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(Self {
            engine: PuzzleEngine::new(config.side, config.seed)?,
            modes: ModeMachine::new(config.final_piece_delay_ms, config.completion_delay_ms),
            config,
            step_timer_ms: 0,
            revision: 0,
            events: Vec::new(),
            observer: None,
            started: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn mode(&self) -> GameMode {
        self.modes.mode()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn busy(&self) -> Option<SequenceKind> {
        self.engine.busy()
    }

    pub fn set_observer(&mut self, observer: impl StateObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin the opening shuffle. Calling it again does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        info!(
            side = self.config.side,
            moves = self.config.shuffle_moves,
            "game started"
        );
        self.begin_shuffle(self.config.shuffle_moves)
    }

    fn ensure_sliding(&self) -> Result<()> {
        if self.modes.accepts_sliding_input() {
            return Ok(());
        }
        let mode = self.modes.pending_target().unwrap_or(self.modes.mode());
        Err(PuzzleError::ModeLocked { mode })
    }

    /// Slide the tile at `index` into the blank.
    pub fn request_move(&mut self, index: usize) -> Result<()> {
        self.ensure_sliding()?;
        let solved = self.engine.apply_manual_move(index)?;
        if let Some(event) = solved {
            self.on_solved(event);
        }
        self.commit();
        Ok(())
    }

    /// Start an animated shuffle; `None` uses the configured walk length.
    pub fn request_shuffle(&mut self, moves: Option<u32>) -> Result<()> {
        self.ensure_sliding()?;
        self.begin_shuffle(moves.unwrap_or(self.config.shuffle_moves))
    }

    /// Start undoing the recorded walk.
    pub fn request_solve(&mut self) -> Result<()> {
        self.ensure_sliding()?;
        self.engine.begin_replay()?;
        self.step_timer_ms = 0;
        self.commit();
        Ok(())
    }

    /// Start a tile-by-tile direct solve.
    pub fn request_solve_direct(&mut self) -> Result<()> {
        self.ensure_sliding()?;
        self.engine.begin_direct_solve()?;
        self.step_timer_ms = 0;
        self.commit();
        Ok(())
    }

    /// Abandon the round: back to a solved board in `Sliding`, then shuffle afresh.
    pub fn request_reset(&mut self) -> Result<()> {
        if let Some(kind) = self.engine.cancel() {
            self.events.push(GameEvent::SequenceCancelled(kind));
        }
        self.engine.reset()?;

        let previous = self.modes.mode();
        self.modes.reset();
        if previous != GameMode::Sliding {
            self.events.push(GameEvent::ModeChanged(GameMode::Sliding));
        }
        info!(from = previous.as_str(), "game reset");

        self.started = true;
        self.commit();
        self.begin_shuffle(self.config.shuffle_moves)
    }

    /// Drop the missing piece. Returns false when no placement is expected.
    pub fn request_place_final_piece(&mut self) -> bool {
        if !self.modes.place_final_piece() {
            debug!(mode = self.modes.mode().as_str(), "placement ignored");
            return false;
        }
        self.events.push(GameEvent::ModeChanged(self.modes.mode()));
        self.commit();
        true
    }

    /// Drop the missing piece at a point; only counts inside `region`.
    pub fn request_place_final_piece_at(&mut self, region: &TargetRegion, x: f32, y: f32) -> bool {
        if !region.contains(x, y) {
            debug!(x, y, "drop missed the target region");
            return false;
        }
        self.request_place_final_piece()
    }

    /// Stop the in-flight sequence; applied steps stay applied.
    pub fn cancel(&mut self) -> Option<SequenceKind> {
        let kind = self.engine.cancel()?;
        self.events.push(GameEvent::SequenceCancelled(kind));
        self.step_timer_ms = 0;
        self.commit();
        Some(kind)
    }

    /// Advance timers and the in-flight sequence by `elapsed_ms`.
    ///
    /// Returns whether anything changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<bool> {
        let mut changed = false;

        if let Some(mode) = self.modes.tick(elapsed_ms) {
            self.events.push(GameEvent::ModeChanged(mode));
            changed = true;
        }

        if let Some(kind) = self.engine.busy() {
            let budget = if self.config.step_delay_ms == 0 {
                u32::MAX
            } else {
                self.step_timer_ms = self.step_timer_ms.saturating_add(elapsed_ms);
                let steps = self.step_timer_ms / self.config.step_delay_ms;
                self.step_timer_ms %= self.config.step_delay_ms;
                steps
            };

            for _ in 0..budget {
                match self.engine.step() {
                    Ok(StepOutcome::Continue) => changed = true,
                    Ok(StepOutcome::Finished(solved)) => {
                        changed = true;
                        self.step_timer_ms = 0;
                        self.events.push(GameEvent::SequenceFinished(kind));
                        if let Some(event) = solved {
                            self.on_solved(event);
                        }
                        break;
                    }
                    Err(err) => {
                        error!(kind = kind.as_str(), %err, "sequence aborted");
                        self.engine.cancel();
                        self.step_timer_ms = 0;
                        self.events.push(GameEvent::SequenceCancelled(kind));
                        self.commit();
                        return Err(err);
                    }
                }
            }
        }

        if changed {
            self.commit();
        }
        Ok(changed)
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        let mut out = PuzzleSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out`, reusing its tile buffer.
    pub fn snapshot_into(&self, out: &mut PuzzleSnapshot) {
        let grid = self.engine.grid();
        out.revision = self.revision;
        out.side = grid.side();
        out.tiles.clear();
        out.tiles.extend(grid.ids());
        out.blank = self.engine.blank_index().ok();
        out.solved = grid.is_solved();
        out.path_len = self.engine.path().len();
        out.mode = self.modes.mode();
        out.busy = self.engine.busy();
        out.transition_pending = self.modes.pending_target();
        out.timers = TimersSnapshot {
            transition_ms: self.modes.pending_ms().unwrap_or(0),
            steps_remaining: self.engine.steps_remaining().min(u32::MAX as usize) as u32,
        };
    }

    fn begin_shuffle(&mut self, moves: u32) -> Result<()> {
        self.engine.begin_shuffle(moves)?;
        self.step_timer_ms = 0;
        if self.engine.busy().is_some() {
            self.commit();
        }
        Ok(())
    }

    fn on_solved(&mut self, event: SolvedEvent) {
        self.events.push(GameEvent::Solved(event));
        if self.modes.on_solved() {
            info!(
                cause = event.cause.as_str(),
                delay_ms = self.config.final_piece_delay_ms,
                "board solved"
            );
        }
    }

    fn commit(&mut self) {
        self.revision += 1;
        if self.observer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_state_changed(&snapshot);
        }
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut PuzzleEngine {
        &mut self.engine
    }
}
