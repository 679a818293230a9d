//! Slide puzzle (workspace facade crate).
//!
//! Re-exports `slide_puzzle::{core,engine,adapter,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use slide_puzzle_adapter as adapter;
pub use slide_puzzle_core as core;
pub use slide_puzzle_engine as engine;
pub use slide_puzzle_types as types;
