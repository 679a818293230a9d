use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_test::assert_ok;

use slide_puzzle::adapter::protocol::{self, ServerMessage};
use slide_puzzle::adapter::{spawn_session, SessionConfig, SessionEvent, SessionHandle, SessionRequest};

fn config() -> SessionConfig {
    SessionConfig {
        side: 4,
        shuffle_moves: 30,
        step_delay_ms: 1,
        final_piece_delay_ms: 200,
        completion_delay_ms: 300,
        tick_ms: 16,
        seed: 31337,
        max_pending: 8,
    }
}

/// Feed one request line through the session the way the binary does.
async fn round_trip(handle: &SessionHandle, line: &str) -> Value {
    let reply = match protocol::parse_request(line) {
        Ok(msg) => match handle.request(SessionRequest::from(msg.request.clone())).await {
            Ok(reply) => protocol::reply_message(msg.seq, &msg.request, &reply),
            Err(err) => protocol::error_message(msg.seq, err),
        },
        Err(invalid) => protocol::create_error(
            invalid.seq,
            protocol::ErrorCode::InvalidRequest,
            &invalid.message,
        ),
    };
    serde_json::from_str(&protocol::to_line(&reply).unwrap()).unwrap()
}

fn pushed(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<Value> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Some(message) = protocol::event_message(&event) {
            out.push(serde_json::to_value(&message).unwrap());
        }
    }
    out
}

#[tokio::test(start_paused = true)]
async fn session_json_lines_replay_solve_and_completion() {
    let (handle, mut events) = spawn_session(config()).unwrap();

    let busy = round_trip(&handle, r#"{"type":"solve","seq":1}"#).await;
    assert_eq!(busy["type"], "error");
    assert_eq!(busy["seq"], 1);
    assert_eq!(busy["code"], "engine_busy");

    tokio::time::sleep(Duration::from_millis(64)).await;
    let state = round_trip(&handle, r#"{"type":"snapshot","seq":2}"#).await;
    assert_eq!(state["type"], "state");
    assert_eq!(state["seq"], 2);
    assert_eq!(state["path_len"], 30);
    assert_eq!(state["busy"], Value::Null);
    assert_eq!(state["mode"], "sliding");

    let ack = round_trip(&handle, r#"{"type":"solve","seq":3,"strategy":"replay"}"#).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["status"], "ok");

    tokio::time::sleep(Duration::from_millis(64)).await;
    let messages = pushed(&mut events);
    assert!(messages
        .iter()
        .any(|m| m["type"] == "solved" && m["cause"] == "replay"));
    assert!(messages
        .iter()
        .filter(|m| m["type"] == "state")
        .any(|m| m["solved"] == true));

    let locked = round_trip(&handle, r#"{"type":"move","seq":4,"index":14}"#).await;
    assert_eq!(locked["code"], "mode_locked");

    tokio::time::sleep(Duration::from_millis(250)).await;
    let messages = pushed(&mut events);
    assert!(messages
        .iter()
        .any(|m| m["type"] == "mode" && m["mode"] == "final_piece"));

    let miss = round_trip(
        &handle,
        r#"{"type":"place","seq":5,"drop":{"x":50,"y":5,"target":{"x":0,"y":0,"width":10,"height":10}}}"#,
    )
    .await;
    assert_eq!(miss["status"], "ignored");
    let hit = round_trip(
        &handle,
        r#"{"type":"place","seq":6,"drop":{"x":5,"y":5,"target":{"x":0,"y":0,"width":10,"height":10}}}"#,
    )
    .await;
    assert_eq!(hit["status"], "ok");

    tokio::time::sleep(Duration::from_millis(350)).await;
    let state = round_trip(&handle, r#"{"type":"snapshot","seq":7}"#).await;
    assert_eq!(state["mode"], "completed");

    let reset = round_trip(&handle, r#"{"type":"reset","seq":8}"#).await;
    assert_eq!(reset["status"], "ok");
    let cancel = round_trip(&handle, r#"{"type":"cancel","seq":9}"#).await;
    assert_eq!(cancel["cancelled"], "shuffle");

    assert_ok!(handle.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn invalid_lines_and_closed_sessions_report_errors() {
    let (handle, _events) = spawn_session(config()).unwrap();

    let bad = round_trip(&handle, r#"{"type":"fly","seq":11}"#).await;
    assert_eq!(bad["type"], "error");
    assert_eq!(bad["seq"], 11);
    assert_eq!(bad["code"], "invalid_request");

    let illegal = round_trip(&handle, r#"{"type":"cancel","seq":12}"#).await;
    assert_eq!(illegal["cancelled"], "shuffle");
    let blank = illegal_target(&handle).await;
    let err = round_trip(&handle, &format!(r#"{{"type":"move","seq":13,"index":{blank}}}"#)).await;
    assert_eq!(err["code"], "illegal_move");

    assert_ok!(handle.shutdown().await);
    let closed = round_trip(&handle, r#"{"type":"snapshot","seq":14}"#).await;
    assert_eq!(closed["code"], "session_closed");
}

/// The blank cell itself is never a legal click.
async fn illegal_target(handle: &SessionHandle) -> usize {
    assert_ok!(handle.snapshot().await).blank.unwrap()
}

#[test]
fn server_messages_carry_a_type_tag() {
    let line = protocol::to_line(&protocol::create_ack(1, protocol::AckStatus::Ok)).unwrap();
    let parsed: ServerMessage = serde_json::from_str(&line).unwrap();
    assert!(matches!(parsed, ServerMessage::Ack(_)));
}
