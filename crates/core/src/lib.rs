//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the board representation and every rule that decides how
//! tiles may move. It has **no dependencies** on timing, rendering, or I/O:
//!
//! - **Deterministic**: the same seed produces the same shuffle walk
//! - **Invariant-preserving**: every mutation is a swap, so the tile ids always stay a permutation
//! - **Portable**: runs headless, in a session task, or in a bench
//!
//! # Module Structure
//!
//! - [`grid`]: square tile board with solved/blank queries
//! - [`moves`]: adjacency and legal-click validation
//! - [`walk`]: non-backtracking random walk of the blank (the shuffle)
//! - [`path`]: recorded walk with exact replay and reversal
//! - [`plan`]: direct-solve swap plan for staggered solve animations
//! - [`rng`]: seeded LCG used by the walk
//! - [`error`]: typed failures shared by every operation
//!
//! # Example
//!
//! ```
//! use slide_puzzle_core::{walk, Grid, Path, SimpleRng};
//!
//! let solved = Grid::create_solved(4).unwrap();
//! let mut rng = SimpleRng::new(12345);
//! let (shuffled, segment) = walk::generate(&solved, 50, &mut rng).unwrap();
//!
//! let mut path = Path::new();
//! path.extend(&segment);
//! assert_eq!(path.replay_onto(&solved), shuffled);
//! assert_eq!(path.unwind_from(&shuffled), solved);
//! ```

pub mod error;
pub mod grid;
pub mod moves;
pub mod path;
pub mod plan;
pub mod rng;
pub mod walk;

pub use slide_puzzle_types as types;

// Re-export commonly used types for convenience
pub use error::{PuzzleError, Result};
pub use grid::Grid;
pub use moves::{is_adjacent, is_legal_click, movable_cells, neighbors_of};
pub use path::Path;
pub use plan::direct_solve_plan;
pub use rng::SimpleRng;
pub use walk::Walk;
