//! Daemon module for the countdown timer.
//!
//! This module contains the core daemon functionality:
//! - `timer`: Timer engine with phase transitions and the tick task
//! - `ipc`: Unix-socket IPC server and request dispatch
//! - `run`: daemon main loop wiring the two together

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::types::TimerConfig;

pub mod ipc;
pub mod timer;

pub use ipc::{default_socket_path, IpcServer, RequestHandler};
pub use timer::{TimerEngine, TimerEvent};

/// Runs the daemon until interrupted.
///
/// Owns one engine instance, logs its events, and serves intent/status
/// requests on the given socket. Returns after ctrl-c.
pub async fn run(socket_path: &Path, config: TimerConfig) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let engine = Arc::new(TimerEngine::new(config, event_tx));
    let handler = Arc::new(RequestHandler::new(engine));

    let server = IpcServer::new(socket_path)?;
    tracing::info!("Daemon listening on {:?}", server.socket_path());

    // Event observer: the daemon's only rendering of state is its log.
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                TimerEvent::Started { total_seconds } => {
                    tracing::info!("Countdown started ({} seconds)", total_seconds);
                }
                TimerEvent::Tick { remaining_seconds } => {
                    tracing::trace!("Tick: {} seconds remaining", remaining_seconds);
                }
                TimerEvent::Paused => tracing::info!("Countdown paused"),
                TimerEvent::Resumed => tracing::info!("Countdown resumed"),
                TimerEvent::Reset => tracing::info!("Countdown reset"),
                TimerEvent::Finished => tracing::info!("Countdown finished"),
            }
        }
    });

    loop {
        tokio::select! {
            accepted = server.accept() => {
                match accepted {
                    Ok(mut stream) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move {
                            match IpcServer::receive_request(&mut stream).await {
                                Ok(request) => {
                                    let response = handler.handle(request).await;
                                    if let Err(e) =
                                        IpcServer::send_response(&mut stream, &response).await
                                    {
                                        tracing::warn!("Failed to send response: {:#}", e);
                                    }
                                }
                                Err(e) => tracing::warn!("Bad request: {:#}", e),
                            }
                        });
                    }
                    Err(e) => tracing::warn!("Accept failed: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    event_task.abort();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
