//! IPC server for the countdown timer daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer intents
//! - Dispatch to the TimerEngine
//!
//! Intent requests that are invalid for the current phase are not errors:
//! the engine ignores them and the response reports the unchanged state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};

use crate::types::{IpcRequest, IpcResponse, Phase, ResponseData, StartParams, TimerConfig};

use super::timer::TimerEngine;

// ============================================================================
// Constants
// ============================================================================

/// Socket path relative to the home directory
const SOCKET_PATH_SUFFIX: &str = ".ringdown/ringdown.sock";

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Returns the default socket path (`~/.ringdown/ringdown.sock`).
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(SOCKET_PATH_SUFFIX))
}

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Socket binding error
    #[error("Failed to bind socket: {0}")]
    Bind(String),

    /// Read error
    #[error("Failed to read request: {0}")]
    Read(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        // Remove existing socket file if present
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::Read(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the TimerEngine.
pub struct RequestHandler {
    /// Shared reference to the timer engine
    engine: Arc<TimerEngine>,
}

impl RequestHandler {
    /// Creates a new request handler with the given timer engine.
    pub fn new(engine: Arc<TimerEngine>) -> Self {
        Self { engine }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start { params } => self.handle_start(params).await,
            IpcRequest::Pause => self.handle_pause().await,
            IpcRequest::Resume => self.handle_resume().await,
            IpcRequest::Reset => self.handle_reset().await,
            IpcRequest::Status => self.handle_status().await,
        }
    }

    /// Handles the start command.
    ///
    /// A requested duration is validated and applied before starting; it
    /// only takes effect while the countdown is inactive, matching the
    /// start intent itself.
    async fn handle_start(&self, params: StartParams) -> IpcResponse {
        if let Some(duration) = params.duration_seconds {
            let config = TimerConfig::with_total_seconds(duration);
            if let Err(e) = config.validate() {
                return IpcResponse::error(e);
            }
            self.engine.set_config(config).await;
        }

        let accepted = self.engine.snapshot().await.phase == Phase::Inactive;
        self.engine.start().await;

        let state = self.engine.snapshot().await;
        let message = if accepted {
            "Countdown started"
        } else {
            "Start ignored: countdown is already active"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(&state)))
    }

    /// Handles the pause command.
    async fn handle_pause(&self) -> IpcResponse {
        let accepted = self.engine.snapshot().await.is_running();
        self.engine.pause().await;

        let state = self.engine.snapshot().await;
        let message = if accepted {
            "Countdown paused"
        } else {
            "Pause ignored: countdown is not running"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(&state)))
    }

    /// Handles the resume command.
    async fn handle_resume(&self) -> IpcResponse {
        let accepted = self.engine.snapshot().await.is_paused();
        self.engine.resume().await;

        let state = self.engine.snapshot().await;
        let message = if accepted {
            "Countdown resumed"
        } else {
            "Resume ignored: countdown is not paused"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(&state)))
    }

    /// Handles the reset command.
    async fn handle_reset(&self) -> IpcResponse {
        let accepted = self.engine.snapshot().await.phase != Phase::Inactive;
        self.engine.reset().await;

        let state = self.engine.snapshot().await;
        let message = if accepted {
            "Countdown reset"
        } else {
            "Reset ignored: countdown is already inactive"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(&state)))
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let state = self.engine.snapshot().await;
        IpcResponse::success("", Some(ResponseData::from_timer_state(&state)))
    }
}

// ============================================================================
// Tests
// ============================================================================
