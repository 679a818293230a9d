//! Headless puzzle session (default binary).
//!
//! Reads JSON request lines on stdin and writes replies plus pushed state on stdout,
//! one JSON object per line. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slide_puzzle::adapter::protocol::{self, ErrorCode, ServerMessage};
use slide_puzzle::adapter::{spawn_session, SessionConfig, SessionRequest};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SessionConfig::from_env();
    let (handle, mut events) = spawn_session(config).context("failed to start session")?;

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(message) = out_rx.recv().await {
            let mut line = protocol::to_line(&message)?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        anyhow::Ok(())
    });

    let push_tx = out_tx.clone();
    let pusher = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Some(message) = protocol::event_message(&event) {
                if push_tx.send(message).is_err() {
                    break;
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match protocol::parse_request(line) {
            Ok(msg) => match handle.request(SessionRequest::from(msg.request.clone())).await {
                Ok(reply) => protocol::reply_message(msg.seq, &msg.request, &reply),
                Err(err) => protocol::error_message(msg.seq, err),
            },
            Err(invalid) => {
                warn!(seq = invalid.seq, error = %invalid.message, "invalid request line");
                protocol::create_error(invalid.seq, ErrorCode::InvalidRequest, &invalid.message)
            }
        };
        if out_tx.send(reply).is_err() {
            break;
        }
    }

    info!("stdin closed, shutting down");
    let _ = handle.shutdown().await;
    drop(handle);
    pusher.await?;
    drop(out_tx);
    writer.await??;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
