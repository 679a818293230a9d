//! Puzzle engine - owns the grid and the recorded walk
//!
//! Shuffles and solves are sequences of atomic steps. A sequence is started with one
//! of the `begin_*` calls, advanced with [`PuzzleEngine::step`], and may be cancelled
//! between any two steps. While a sequence is in flight the engine is busy and rejects
//! every other mutation.
//!
//! While the path is anchored it describes exactly the walk from the solved grid to
//! the current grid: shuffle steps push onto it and replay steps pop from it, so a
//! sequence cancelled at any point leaves grid and path consistent. A manual move or a
//! cancelled direct solve leaves the grid unsolved with no walk back to solved; the
//! path stays unanchored (and replay refuses) until the grid is solved again.
//!
//! The one-shot operations (`shuffle`, `solve_by_replay`) begin a sequence and step it
//! to completion.

use std::collections::VecDeque;

use tracing::{debug, error, warn};

use crate::core::{
    direct_solve_plan, is_legal_click, Grid, Path, PuzzleError, Result, SimpleRng, Walk,
};
use crate::types::{Move, SequenceKind, SolveCause, SolvedEvent};

/// Result of a single [`PuzzleEngine::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A step was applied; more remain.
    Continue,
    /// The last step was applied (or nothing was running).
    Finished(Option<SolvedEvent>),
}

#[derive(Debug, Clone)]
enum Sequence {
    Shuffle { walk: Walk, remaining: u32 },
    Replay,
    Direct { plan: VecDeque<(usize, usize)> },
}

impl Sequence {
    fn kind(&self) -> SequenceKind {
        match self {
            Sequence::Shuffle { .. } => SequenceKind::Shuffle,
            Sequence::Replay => SequenceKind::Replay,
            Sequence::Direct { .. } => SequenceKind::Direct,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PuzzleEngine {
    grid: Grid,
    path: Path,
    rng: SimpleRng,
    sequence: Option<Sequence>,
    /// Whether replaying the path from the solved grid reproduces the current grid
    anchored: bool,
    /// Steps applied by the current (or most recent) sequence
    steps_applied: u32,
}

impl PuzzleEngine {
    /// Create an engine holding the solved grid.
    pub fn new(side: usize, seed: u32) -> Result<Self> {
        Ok(Self {
            grid: Grid::create_solved(side)?,
            path: Path::new(),
            rng: SimpleRng::new(seed),
            sequence: None,
            anchored: true,
            steps_applied: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Whether the recorded path leads back to the solved grid
    pub fn can_replay(&self) -> bool {
        self.anchored && !self.path.is_empty()
    }

    /// Kind of the in-flight sequence, if any
    pub fn busy(&self) -> Option<SequenceKind> {
        self.sequence.as_ref().map(Sequence::kind)
    }

    /// Steps applied by the current or most recent sequence
    pub fn steps_applied(&self) -> u32 {
        self.steps_applied
    }

    /// Steps left in the in-flight sequence
    pub fn steps_remaining(&self) -> usize {
        match &self.sequence {
            None => 0,
            Some(Sequence::Shuffle { remaining, .. }) => *remaining as usize,
            Some(Sequence::Replay) => self.path.len(),
            Some(Sequence::Direct { plan }) => plan.len(),
        }
    }

    /// Blank position, failing fast if the board lost its invariant.
    pub fn blank_index(&self) -> Result<usize> {
        self.grid.index_of_blank()
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.busy() {
            Some(kind) => Err(PuzzleError::EngineBusy { kind }),
            None => Ok(()),
        }
    }

    /// Slide the tile at `clicked` into the blank.
    ///
    /// Manual moves are not part of any walk, so the recorded path is discarded.
    pub fn apply_manual_move(&mut self, clicked: usize) -> Result<Option<SolvedEvent>> {
        self.ensure_idle()?;
        if !is_legal_click(&self.grid, clicked)? {
            return Err(PuzzleError::IllegalMove { index: clicked });
        }

        let blank = self.grid.index_of_blank()?;
        self.grid.swap_in_place(blank, clicked);
        self.path.clear();
        self.anchored = self.grid.is_solved();

        if self.grid.is_solved() {
            debug!(clicked, "manual move solved the board");
            Ok(Some(SolvedEvent::new(SolveCause::ManualMove)))
        } else {
            Ok(None)
        }
    }

    /// Start a shuffle walk of `moves` steps from the current grid.
    ///
    /// A walk that starts from the solved grid starts a fresh anchored path. Zero
    /// moves is a no-op that leaves the engine idle.
    pub fn begin_shuffle(&mut self, moves: u32) -> Result<()> {
        self.ensure_idle()?;
        self.grid.validate()?;
        self.steps_applied = 0;
        if moves == 0 {
            return Ok(());
        }

        if self.grid.is_solved() {
            self.path.clear();
            self.anchored = true;
        }
        let walk = Walk::resume(&self.grid, self.path.last())?;
        debug!(moves, blank = walk.blank(), "shuffle started");
        self.sequence = Some(Sequence::Shuffle {
            walk,
            remaining: moves,
        });
        Ok(())
    }

    /// Start undoing the recorded walk newest-first.
    pub fn begin_replay(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.grid.validate()?;
        if !self.can_replay() {
            return Err(PuzzleError::NoPath);
        }
        debug!(moves = self.path.len(), "replay solve started");
        self.steps_applied = 0;
        self.sequence = Some(Sequence::Replay);
        Ok(())
    }

    /// Start a staggered direct solve along [`direct_solve_plan`].
    ///
    /// The swaps are not slides, so the recorded path is discarded up front.
    pub fn begin_direct_solve(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.grid.validate()?;
        let plan: VecDeque<(usize, usize)> = direct_solve_plan(&self.grid).into();
        debug!(swaps = plan.len(), "direct solve started");
        self.path.clear();
        self.anchored = false;
        self.steps_applied = 0;
        self.sequence = Some(Sequence::Direct { plan });
        Ok(())
    }

    /// Apply one atomic step of the in-flight sequence.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let Some(sequence) = self.sequence.as_mut() else {
            return Ok(StepOutcome::Finished(None));
        };

        let done = match sequence {
            Sequence::Shuffle { walk, remaining } => {
                if *remaining > 0 {
                    let mv = walk.next_move(&mut self.rng);
                    self.grid.swap_in_place(mv.blank, mv.neighbor);
                    self.path.push(mv);
                    *remaining -= 1;
                    self.steps_applied += 1;
                }
                *remaining == 0
            }
            Sequence::Replay => {
                if let Some(mv) = self.path.pop() {
                    let undo = mv.reversed();
                    self.grid.swap_in_place(undo.blank, undo.neighbor);
                    self.steps_applied += 1;
                }
                self.path.is_empty()
            }
            Sequence::Direct { plan } => {
                if let Some((a, b)) = plan.pop_front() {
                    self.grid.swap_in_place(a, b);
                    self.steps_applied += 1;
                }
                plan.is_empty()
            }
        };

        if !done {
            return Ok(StepOutcome::Continue);
        }

        let finished = self.sequence.take().map(|s| s.kind());
        debug!(
            kind = ?finished,
            steps = self.steps_applied,
            "sequence finished"
        );

        match finished {
            Some(SequenceKind::Replay) => self.finish_solve(SolveCause::Replay),
            Some(SequenceKind::Direct) => self.finish_solve(SolveCause::Direct),
            _ => Ok(StepOutcome::Finished(None)),
        }
    }

    fn finish_solve(&mut self, cause: SolveCause) -> Result<StepOutcome> {
        if !self.grid.is_solved() {
            error!(cause = cause.as_str(), "solve sequence ended on an unsolved grid");
            return Err(PuzzleError::InvariantViolation {
                detail: "solve sequence ended on an unsolved grid",
            });
        }
        self.path.clear();
        self.anchored = true;
        Ok(StepOutcome::Finished(Some(SolvedEvent::new(cause))))
    }

    /// Step the in-flight sequence to completion.
    pub fn run_to_end(&mut self) -> Result<Option<SolvedEvent>> {
        loop {
            if let StepOutcome::Finished(solved) = self.step()? {
                return Ok(solved);
            }
        }
    }

    /// Stop the in-flight sequence between steps.
    ///
    /// Everything applied so far stays applied and recorded.
    pub fn cancel(&mut self) -> Option<SequenceKind> {
        let kind = self.sequence.take().map(|s| s.kind())?;
        warn!(
            kind = kind.as_str(),
            steps = self.steps_applied,
            path = self.path.len(),
            "sequence cancelled"
        );
        Some(kind)
    }

    /// Shuffle `moves` steps at once and return the segment appended to the path.
    pub fn shuffle(&mut self, moves: u32) -> Result<Vec<Move>> {
        self.begin_shuffle(moves)?;
        let before = self.path.len();
        self.run_to_end()?;
        Ok(self.path.moves()[before..].to_vec())
    }

    /// Undo the recorded walk at once.
    pub fn solve_by_replay(&mut self) -> Result<SolvedEvent> {
        self.begin_replay()?;
        self.run_to_end()?.ok_or(PuzzleError::InvariantViolation {
            detail: "replay finished without solving",
        })
    }

    /// Jump straight to the solved grid without animating.
    pub fn solve_directly(&mut self) -> Result<SolvedEvent> {
        self.ensure_idle()?;
        self.grid = Grid::create_solved(self.grid.side())?;
        self.path.clear();
        self.anchored = true;
        Ok(SolvedEvent::new(SolveCause::Direct))
    }

    /// Cancel anything in flight and re-synchronize to the solved grid.
    pub fn reset(&mut self) -> Result<()> {
        self.cancel();
        self.grid = Grid::create_solved(self.grid.side())?;
        self.path.clear();
        self.anchored = true;
        self.steps_applied = 0;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}
