//! Puzzle engine - stateful orchestration over the pure core
//!
//! - [`puzzle`]: owns the grid and recorded walk; shuffles and solves as cancellable steps
//! - [`mode`]: `Sliding -> FinalPiece -> Completed` with revocable timed transitions
//! - [`game`]: the single aggregate a session drives with requests and ticks
//! - [`placement`]: drop-target test for the final piece
//! - [`snapshot`]: read-only state handed to observers

pub mod game;
pub mod mode;
pub mod placement;
pub mod puzzle;
pub mod snapshot;

pub use slide_puzzle_core as core;
pub use slide_puzzle_types as types;

pub use game::{Game, GameConfig, GameEvent, StateObserver};
pub use mode::ModeMachine;
pub use placement::TargetRegion;
pub use puzzle::{PuzzleEngine, StepOutcome};
pub use snapshot::{PuzzleSnapshot, TimersSnapshot};
