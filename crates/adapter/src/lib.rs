//! Adapter module - async session and line-delimited JSON bridge
//!
//! A session is one tokio task that owns a [`engine::Game`]. Presentation layers
//! talk to it through a cloneable [`SessionHandle`] and receive state snapshots and
//! discrete events on an unbounded channel.
//!
//! # Protocol Overview
//!
//! The headless binary speaks **line-delimited JSON** on stdin/stdout:
//!
//! ## Client → Session
//!
//! - **move** `{index}`: slide the tile at `index` into the blank
//! - **shuffle** `{moves?}`: animated random walk (default length from config)
//! - **solve** `{strategy?}`: `replay` undoes the recorded walk, `direct` animates tile swaps
//! - **reset**: back to a solved board in `sliding` mode, then shuffle afresh
//! - **place** `{drop?}`: drop the final piece, optionally at a point inside a target region
//! - **cancel**: stop the in-flight shuffle or solve
//! - **snapshot**: request the full state
//!
//! ## Session → Client
//!
//! - **ack** / **error**: reply to a request, echoing its `seq`
//! - **state**: full board state after every committed change
//! - **solved**: the board became solved, with its cause
//! - **mode**: a mode transition fired
//!
//! # Environment Variables
//!
//! - `SLIDE_PUZZLE_SIDE`: board side (default 16)
//! - `SLIDE_PUZZLE_SHUFFLE_MOVES`: shuffle walk length (default 500)
//! - `SLIDE_PUZZLE_STEP_DELAY_MS`: delay per animated step (default 1)
//! - `SLIDE_PUZZLE_FINAL_PIECE_DELAY_MS` / `SLIDE_PUZZLE_COMPLETION_DELAY_MS`: mode delays
//! - `SLIDE_PUZZLE_TICK_MS`: session timestep (default 16)
//! - `SLIDE_PUZZLE_SEED`: RNG seed (default: wall clock)
//! - `SLIDE_PUZZLE_MAX_PENDING`: request queue capacity (default 16)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Session: {"type":"snapshot","seq":1}
//! Session -> Client: {"type":"state","seq":1,"ts":1234567890,"revision":4,"side":16,"tiles":[...],...}
//! Client -> Session: {"type":"solve","seq":2,"strategy":"replay"}
//! Session -> Client: {"type":"ack","seq":2,"ts":1234567891,"status":"ok"}
//! Session -> Client: {"type":"solved","ts":1234568391,"cause":"replay"}
//! Session -> Client: {"type":"mode","ts":1234569391,"mode":"final_piece","placed":false}
//! ```

pub mod config;
pub mod protocol;
pub mod session;

pub use slide_puzzle_core as core;
pub use slide_puzzle_engine as engine;
pub use slide_puzzle_types as types;

pub use config::SessionConfig;
pub use session::{
    spawn_session, DropPoint, SessionError, SessionEvent, SessionHandle, SessionReply,
    SessionRequest,
};
