//! Protocol module - line-delimited JSON messages for the headless bridge
//!
//! Every request carries `type` and `seq`; replies echo the `seq`. Pushed messages
//! (`state`, `solved`, `mode`) are sent whenever the session commits a change.

use serde::{Deserialize, Serialize};

use crate::core::PuzzleError;
use crate::engine::{GameEvent, PuzzleSnapshot, TargetRegion};
use crate::session::{DropPoint, SessionError, SessionEvent, SessionReply, SessionRequest};
use crate::types::{GameMode, SequenceKind, SolveCause};

// ============== Client -> Session Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStrategy {
    #[default]
    Replay,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionMessage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where a dragged final piece was released, and the target it was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropMessage {
    pub x: f32,
    pub y: f32,
    pub target: RegionMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientRequest {
    Move {
        index: usize,
    },
    Shuffle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        moves: Option<u32>,
    },
    Solve {
        #[serde(default)]
        strategy: SolveStrategy,
    },
    Reset,
    Place {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drop: Option<DropMessage>,
    },
    Cancel,
    Snapshot,
}

impl From<ClientRequest> for SessionRequest {
    fn from(value: ClientRequest) -> Self {
        match value {
            ClientRequest::Move { index } => SessionRequest::Move { index },
            ClientRequest::Shuffle { moves } => SessionRequest::Shuffle { moves },
            ClientRequest::Solve {
                strategy: SolveStrategy::Replay,
            } => SessionRequest::Solve,
            ClientRequest::Solve {
                strategy: SolveStrategy::Direct,
            } => SessionRequest::SolveDirect,
            ClientRequest::Reset => SessionRequest::Reset,
            ClientRequest::Place { drop } => SessionRequest::PlaceFinalPiece {
                drop: drop.map(|d| DropPoint {
                    x: d.x,
                    y: d.y,
                    region: TargetRegion::new(
                        d.target.x,
                        d.target.y,
                        d.target.width,
                        d.target.height,
                    ),
                }),
            },
            ClientRequest::Cancel => SessionRequest::Cancel,
            ClientRequest::Snapshot => SessionRequest::Snapshot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub seq: u64,
    #[serde(flatten)]
    pub request: ClientRequest,
}

/// A line that could not be decoded into a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRequest {
    /// `seq` of the line when it had one, else 0
    pub seq: u64,
    pub message: String,
}

// ============== Session -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    /// The request changed something
    #[serde(rename = "ok")]
    Ok,
    /// The request was valid but had nothing to act on
    #[serde(rename = "ignored")]
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "illegal_move")]
    IllegalMove,
    #[serde(rename = "engine_busy")]
    EngineBusy,
    #[serde(rename = "no_path")]
    NoPath,
    #[serde(rename = "invariant_violation")]
    InvariantViolation,
    #[serde(rename = "mode_locked")]
    ModeLocked,
    #[serde(rename = "invalid_side")]
    InvalidSide,
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    #[serde(rename = "session_closed")]
    SessionClosed,
}

impl From<PuzzleError> for ErrorCode {
    fn from(value: PuzzleError) -> Self {
        match value {
            PuzzleError::IllegalMove { .. } => ErrorCode::IllegalMove,
            PuzzleError::EngineBusy { .. } => ErrorCode::EngineBusy,
            PuzzleError::NoPath => ErrorCode::NoPath,
            PuzzleError::InvariantViolation { .. } => ErrorCode::InvariantViolation,
            PuzzleError::ModeLocked { .. } => ErrorCode::ModeLocked,
            PuzzleError::InvalidSide { .. } => ErrorCode::InvalidSide,
        }
    }
}

impl From<SessionError> for ErrorCode {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Puzzle(err) => err.into(),
            SessionError::Closed => ErrorCode::SessionClosed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeLower {
    Sliding,
    FinalPiece,
    Completed,
}

impl From<GameMode> for ModeLower {
    fn from(value: GameMode) -> Self {
        match value {
            GameMode::Sliding => ModeLower::Sliding,
            GameMode::FinalPiece { .. } => ModeLower::FinalPiece,
            GameMode::Completed => ModeLower::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceLower {
    Shuffle,
    Replay,
    Direct,
}

impl From<SequenceKind> for SequenceLower {
    fn from(value: SequenceKind) -> Self {
        match value {
            SequenceKind::Shuffle => SequenceLower::Shuffle,
            SequenceKind::Replay => SequenceLower::Replay,
            SequenceKind::Direct => SequenceLower::Direct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseLower {
    ManualMove,
    Replay,
    Direct,
}

impl From<SolveCause> for CauseLower {
    fn from(value: SolveCause) -> Self {
        match value {
            SolveCause::ManualMove => CauseLower::ManualMove,
            SolveCause::Replay => CauseLower::Replay,
            SolveCause::Direct => CauseLower::Direct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Ack(AckMessage),
    Error(ErrorMessage),
    State(StateMessage),
    Solved(SolvedMessage),
    Mode(ModeMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<SequenceLower>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Full board state; `seq` is set only when answering a `snapshot` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub ts: u64,
    pub revision: u64,
    pub side: usize,
    pub tiles: Vec<u16>,
    pub blank: Option<usize>,
    pub solved: bool,
    pub path_len: usize,
    pub mode: ModeLower,
    pub placed: bool,
    pub busy: Option<SequenceLower>,
    pub transition_pending: Option<ModeLower>,
    pub transition_ms: u32,
    pub steps_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedMessage {
    pub ts: u64,
    pub cause: CauseLower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeMessage {
    pub ts: u64,
    pub mode: ModeLower,
    pub placed: bool,
}

// ============== Message Parsing ==============

/// Parse one request line.
pub fn parse_request(json: &str) -> Result<RequestMessage, InvalidRequest> {
    #[derive(Debug, Deserialize)]
    struct SeqOnly {
        seq: Option<u64>,
    }

    serde_json::from_str::<RequestMessage>(json).map_err(|e| {
        let seq = serde_json::from_str::<SeqOnly>(json)
            .ok()
            .and_then(|s| s.seq)
            .unwrap_or(0);
        InvalidRequest {
            seq,
            message: e.to_string(),
        }
    })
}

/// Serialize a message as one line (without the trailing newline).
pub fn to_line(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

// ============== Utility Functions ==============

pub fn create_ack(seq: u64, status: AckStatus) -> ServerMessage {
    ServerMessage::Ack(AckMessage {
        seq,
        ts: current_timestamp_ms(),
        status,
        cancelled: None,
    })
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    })
}

pub fn build_state(seq: Option<u64>, snapshot: &PuzzleSnapshot) -> StateMessage {
    StateMessage {
        seq,
        ts: current_timestamp_ms(),
        revision: snapshot.revision,
        side: snapshot.side,
        tiles: snapshot.tiles.clone(),
        blank: snapshot.blank,
        solved: snapshot.solved,
        path_len: snapshot.path_len,
        mode: snapshot.mode.into(),
        placed: snapshot.mode.placed(),
        busy: snapshot.busy.map(Into::into),
        transition_pending: snapshot.transition_pending.map(Into::into),
        transition_ms: snapshot.timers.transition_ms,
        steps_remaining: snapshot.timers.steps_remaining,
    }
}

/// Answer to a request that the session accepted.
pub fn reply_message(seq: u64, request: &ClientRequest, reply: &SessionReply) -> ServerMessage {
    if matches!(request, ClientRequest::Snapshot) {
        return ServerMessage::State(build_state(Some(seq), &reply.snapshot));
    }
    let status = if reply.applied {
        AckStatus::Ok
    } else {
        AckStatus::Ignored
    };
    ServerMessage::Ack(AckMessage {
        seq,
        ts: current_timestamp_ms(),
        status,
        cancelled: reply.cancelled.map(Into::into),
    })
}

/// Answer to a request the session refused.
pub fn error_message(seq: u64, err: SessionError) -> ServerMessage {
    create_error(seq, err.into(), &err.to_string())
}

/// Pushed message for a session event, if it has one.
pub fn event_message(event: &SessionEvent) -> Option<ServerMessage> {
    let ts = current_timestamp_ms();
    match event {
        SessionEvent::State(snapshot) => Some(ServerMessage::State(build_state(None, snapshot))),
        SessionEvent::Game(GameEvent::Solved(solved)) => Some(ServerMessage::Solved(SolvedMessage {
            ts,
            cause: solved.cause.into(),
        })),
        SessionEvent::Game(GameEvent::ModeChanged(mode)) => Some(ServerMessage::Mode(ModeMessage {
            ts,
            mode: (*mode).into(),
            placed: mode.placed(),
        })),
        SessionEvent::Game(_) => None,
        SessionEvent::Fault(err) => Some(create_error(0, (*err).into(), &err.to_string())),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
