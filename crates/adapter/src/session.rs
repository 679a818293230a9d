//! Session actor - one tokio task owns the [`Game`]
//!
//! Handles send requests over a bounded channel and await a oneshot reply. The task
//! ticks the game on a fixed interval and, before applying any request, catches the
//! game clock up to the present so timers started by that request count from the
//! moment it was handled. Snapshots and discrete events stream out on an unbounded
//! channel.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::core::PuzzleError;
use crate::engine::{Game, GameEvent, PuzzleSnapshot, TargetRegion};
use crate::types::SequenceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error("session closed")]
    Closed,
}

impl SessionError {
    pub fn code(self) -> &'static str {
        match self {
            SessionError::Puzzle(err) => err.code(),
            SessionError::Closed => "session_closed",
        }
    }
}

/// Drop position of the final piece and the region it must land in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPoint {
    pub x: f32,
    pub y: f32,
    pub region: TargetRegion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionRequest {
    Move { index: usize },
    Shuffle { moves: Option<u32> },
    Solve,
    SolveDirect,
    Reset,
    PlaceFinalPiece { drop: Option<DropPoint> },
    Cancel,
    Snapshot,
}

/// Outcome of an accepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReply {
    /// False when the request was valid but had nothing to act on
    pub applied: bool,
    pub cancelled: Option<SequenceKind>,
    /// State right after the request was applied
    pub snapshot: PuzzleSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    State(PuzzleSnapshot),
    Game(GameEvent),
    /// A tick failed; the in-flight sequence was cancelled
    Fault(PuzzleError),
}

enum Command {
    Request {
        request: SessionRequest,
        reply: oneshot::Sender<Result<SessionReply, PuzzleError>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn request(&self, request: SessionRequest) -> Result<SessionReply, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Request { request, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        let result = rx.await.map_err(|_| SessionError::Closed)?;
        Ok(result?)
    }

    pub async fn move_tile(&self, index: usize) -> Result<(), SessionError> {
        self.request(SessionRequest::Move { index }).await?;
        Ok(())
    }

    pub async fn shuffle(&self, moves: Option<u32>) -> Result<(), SessionError> {
        self.request(SessionRequest::Shuffle { moves }).await?;
        Ok(())
    }

    pub async fn solve(&self) -> Result<(), SessionError> {
        self.request(SessionRequest::Solve).await?;
        Ok(())
    }

    pub async fn solve_direct(&self) -> Result<(), SessionError> {
        self.request(SessionRequest::SolveDirect).await?;
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), SessionError> {
        self.request(SessionRequest::Reset).await?;
        Ok(())
    }

    /// Returns whether the placement counted.
    pub async fn place_final_piece(&self) -> Result<bool, SessionError> {
        let reply = self
            .request(SessionRequest::PlaceFinalPiece { drop: None })
            .await?;
        Ok(reply.applied)
    }

    pub async fn place_final_piece_at(
        &self,
        region: TargetRegion,
        x: f32,
        y: f32,
    ) -> Result<bool, SessionError> {
        let drop = Some(DropPoint { x, y, region });
        let reply = self
            .request(SessionRequest::PlaceFinalPiece { drop })
            .await?;
        Ok(reply.applied)
    }

    pub async fn cancel(&self) -> Result<Option<SequenceKind>, SessionError> {
        Ok(self.request(SessionRequest::Cancel).await?.cancelled)
    }

    pub async fn snapshot(&self) -> Result<PuzzleSnapshot, SessionError> {
        Ok(self.request(SessionRequest::Snapshot).await?.snapshot)
    }

    /// Stop the session; an in-flight sequence is cancelled where it stands.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

/// Build a game from `config`, begin its opening shuffle and spawn the session task.
///
/// Must be called from within a tokio runtime.
pub fn spawn_session(
    config: SessionConfig,
) -> Result<(SessionHandle, mpsc::UnboundedReceiver<SessionEvent>), SessionError> {
    let mut game = Game::new(config.game_config())?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(config.max_pending.max(1));
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();

    let observer_tx = event_tx.clone();
    game.set_observer(move |snapshot: &PuzzleSnapshot| {
        let _ = observer_tx.send(SessionEvent::State(snapshot.clone()));
    });
    game.start()?;
    forward_events(&mut game, &event_tx);

    info!(
        side = config.side,
        seed = config.seed,
        tick_ms = config.tick_ms,
        "session started"
    );
    tokio::spawn(run_session(game, cmd_rx, event_tx, config.tick_ms));

    Ok((SessionHandle { tx: cmd_tx }, event_rx))
}

async fn run_session(
    mut game: Game,
    mut rx: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
    tick_ms: u32,
) {
    let mut ticker = time::interval(Duration::from_millis(u64::from(tick_ms.max(1))));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = Instant::now();

    loop {
        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else {
                    debug!("all session handles dropped");
                    break;
                };
                advance(&mut game, &mut clock, &events);
                match command {
                    Command::Request { request, reply } => {
                        let result = apply(&mut game, request);
                        forward_events(&mut game, &events);
                        let _ = reply.send(result);
                    }
                    Command::Shutdown { reply } => {
                        game.cancel();
                        forward_events(&mut game, &events);
                        let _ = reply.send(());
                        break;
                    }
                }
            }
            _ = ticker.tick() => advance(&mut game, &mut clock, &events),
        }
    }

    if game.cancel().is_some() {
        forward_events(&mut game, &events);
    }
    info!(revision = game.revision(), "session stopped");
}

/// Tick the game by the wall time since the last advance.
fn advance(game: &mut Game, clock: &mut Instant, events: &mpsc::UnboundedSender<SessionEvent>) {
    let elapsed = Instant::now().saturating_duration_since(*clock);
    let elapsed_ms = elapsed.as_millis().min(u128::from(u32::MAX)) as u32;
    // Sub-millisecond remainders stay on the clock for the next advance.
    *clock += Duration::from_millis(u64::from(elapsed_ms));

    if let Err(err) = game.tick(elapsed_ms) {
        let _ = events.send(SessionEvent::Fault(err));
    }
    forward_events(game, events);
}

fn apply(game: &mut Game, request: SessionRequest) -> Result<SessionReply, PuzzleError> {
    let mut applied = true;
    let mut cancelled = None;

    let result = match request {
        SessionRequest::Move { index } => game.request_move(index),
        SessionRequest::Shuffle { moves } => game.request_shuffle(moves),
        SessionRequest::Solve => game.request_solve(),
        SessionRequest::SolveDirect => game.request_solve_direct(),
        SessionRequest::Reset => game.request_reset(),
        SessionRequest::PlaceFinalPiece { drop } => {
            applied = match drop {
                Some(d) => game.request_place_final_piece_at(&d.region, d.x, d.y),
                None => game.request_place_final_piece(),
            };
            Ok(())
        }
        SessionRequest::Cancel => {
            cancelled = game.cancel();
            applied = cancelled.is_some();
            Ok(())
        }
        SessionRequest::Snapshot => Ok(()),
    };

    if let Err(err) = result {
        debug!(?request, code = err.code(), "request refused");
        return Err(err);
    }

    Ok(SessionReply {
        applied,
        cancelled,
        snapshot: game.snapshot(),
    })
}

fn forward_events(game: &mut Game, events: &mpsc::UnboundedSender<SessionEvent>) {
    for event in game.drain_events() {
        let _ = events.send(SessionEvent::Game(event));
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::types::{GameMode, SolveCause, SolvedEvent};

    fn config(shuffle_moves: u32, step_delay_ms: u32) -> SessionConfig {
        SessionConfig {
            side: 4,
            shuffle_moves,
            step_delay_ms,
            final_piece_delay_ms: 1000,
            completion_delay_ms: 1500,
            tick_ms: 16,
            seed: 12345,
            max_pending: 4,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    async fn sleep_ms(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn invalid_side_fails_before_spawning() {
        let err = spawn_session(SessionConfig {
            side: 1,
            ..config(0, 0)
        })
        .unwrap_err();
        assert_eq!(err, SessionError::Puzzle(PuzzleError::InvalidSide { side: 1 }));
        assert_eq!(err.code(), "invalid_side");
    }

    #[tokio::test(start_paused = true)]
    async fn opening_shuffle_advances_with_the_clock() {
        let (handle, mut events) = spawn_session(config(40, 1)).unwrap();

        let snap = assert_ok!(handle.snapshot().await);
        assert_eq!(snap.busy, Some(SequenceKind::Shuffle));

        sleep_ms(100).await;
        let snap = assert_ok!(handle.snapshot().await);
        assert_eq!(snap.busy, None);
        assert_eq!(snap.path_len, 40);

        let events = drain(&mut events);
        assert!(matches!(events.first(), Some(SessionEvent::State(_))));
        assert!(events.contains(&SessionEvent::Game(GameEvent::SequenceFinished(
            SequenceKind::Shuffle
        ))));
    }

    #[tokio::test(start_paused = true)]
    async fn requests_during_shuffle_are_busy() {
        let (handle, _events) = spawn_session(config(500, 1)).unwrap();

        let err = assert_err!(handle.shuffle(None).await);
        assert_eq!(
            err,
            SessionError::Puzzle(PuzzleError::EngineBusy {
                kind: SequenceKind::Shuffle
            })
        );
        assert_eq!(err.code(), "engine_busy");
        assert_err!(handle.move_tile(0).await);

        assert_eq!(
            assert_ok!(handle.cancel().await),
            Some(SequenceKind::Shuffle)
        );
        assert_eq!(assert_ok!(handle.cancel().await), None);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_solve_runs_the_completion_sequence() {
        let (handle, mut events) = spawn_session(config(1, 0)).unwrap();
        sleep_ms(20).await;
        assert_eq!(assert_ok!(handle.snapshot().await).path_len, 1);
        drain(&mut events);

        // One move from solved: the displaced tile sits in the old blank cell.
        assert_ok!(handle.move_tile(15).await);
        assert!(drain(&mut events).contains(&SessionEvent::Game(GameEvent::Solved(
            SolvedEvent::new(SolveCause::ManualMove)
        ))));

        let err = assert_err!(handle.move_tile(14).await);
        assert_eq!(err.code(), "mode_locked");

        sleep_ms(990).await;
        assert_eq!(assert_ok!(handle.snapshot().await).mode, GameMode::Sliding);
        sleep_ms(30).await;
        assert_eq!(
            assert_ok!(handle.snapshot().await).mode,
            GameMode::FinalPiece { placed: false }
        );

        let target = TargetRegion::new(0.0, 0.0, 10.0, 10.0);
        assert!(!assert_ok!(handle.place_final_piece_at(target, 20.0, 5.0).await));
        assert!(assert_ok!(handle.place_final_piece_at(target, 5.0, 5.0).await));
        assert!(!assert_ok!(handle.place_final_piece().await));

        sleep_ms(1600).await;
        assert_eq!(assert_ok!(handle.snapshot().await).mode, GameMode::Completed);
        assert!(drain(&mut events)
            .contains(&SessionEvent::Game(GameEvent::ModeChanged(GameMode::Completed))));

        assert_ok!(handle.reset().await);
        let snap = assert_ok!(handle.snapshot().await);
        assert_eq!(snap.mode, GameMode::Sliding);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_the_session() {
        let (handle, mut events) = spawn_session(config(500, 1)).unwrap();
        sleep_ms(50).await;

        assert_ok!(handle.shutdown().await);
        assert_eq!(handle.snapshot().await, Err(SessionError::Closed));
        assert_eq!(handle.shutdown().await, Err(SessionError::Closed));

        let mut saw_cancel = false;
        while let Some(event) = events.recv().await {
            if event == SessionEvent::Game(GameEvent::SequenceCancelled(SequenceKind::Shuffle)) {
                saw_cancel = true;
            }
        }
        assert!(saw_cancel);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_every_handle_stops_the_task() {
        let (handle, mut events) = spawn_session(config(500, 1)).unwrap();
        let second = handle.clone();
        sleep_ms(30).await;

        drop(handle);
        assert_ok!(second.snapshot().await);
        drop(second);

        let mut last_state = None;
        while let Some(event) = events.recv().await {
            if let SessionEvent::State(snap) = event {
                last_state = Some(snap);
            }
        }
        let last = last_state.unwrap();
        assert_eq!(last.busy, None);
        assert!(last.path_len > 0 && last.path_len < 500);
    }
}
