//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Timer state and phase transitions
//! - Timer configuration with validation
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Countdown has not started (or has finished / been reset)
    Inactive,
    /// Countdown is advancing
    Running,
    /// Countdown is frozen at the current remaining value
    Paused,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inactive => "inactive",
            Phase::Running => "running",
            Phase::Paused => "paused",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Inactive
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Shortest accepted countdown, in seconds.
pub const MIN_TOTAL_SECONDS: u32 = 1;

/// Longest accepted countdown, in seconds (24 hours).
pub const MAX_TOTAL_SECONDS: u32 = 86_400;

/// Default countdown length, in seconds.
pub const DEFAULT_TOTAL_SECONDS: u32 = 60;

/// Configuration for the countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Total countdown duration in seconds (1-86400)
    pub total_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_seconds: DEFAULT_TOTAL_SECONDS,
        }
    }
}

impl TimerConfig {
    /// Creates a configuration with the given total duration.
    pub fn with_total_seconds(total_seconds: u32) -> Self {
        Self { total_seconds }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.total_seconds < MIN_TOTAL_SECONDS || self.total_seconds > MAX_TOTAL_SECONDS {
            return Err(format!(
                "duration must be between {} and {} seconds",
                MIN_TOTAL_SECONDS, MAX_TOTAL_SECONDS
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase of the countdown
    pub phase: Phase,
    /// Remaining seconds, always in `[0, total_seconds]`
    pub remaining_seconds: u32,
    /// Timer configuration
    pub config: TimerConfig,
}

impl TimerState {
    /// Creates a new TimerState in the inactive phase with a full countdown.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: Phase::Inactive,
            remaining_seconds: config.total_seconds,
            config,
        }
    }

    /// Starts the countdown from the full duration.
    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.remaining_seconds = self.config.total_seconds;
    }

    /// Freezes the countdown at the current remaining value.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Resumes the countdown from the paused value.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Returns to the inactive phase with a full countdown.
    pub fn reset(&mut self) {
        self.phase = Phase::Inactive;
        self.remaining_seconds = self.config.total_seconds;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has finished (reached 0). The finishing
    /// tick also moves the phase back to `Inactive`.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        if self.remaining_seconds == 0 {
            self.phase = Phase::Inactive;
            true
        } else {
            false
        }
    }

    /// Returns true if the countdown is actively advancing.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Returns true if the countdown is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Remaining time as a fraction of the total, in `[0.0, 1.0]`.
    ///
    /// This is the value a progress indicator draws.
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.remaining_seconds) / f64::from(self.config.total_seconds)
    }

    /// Whole minutes of the remaining time, for display.
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Leftover seconds of the remaining time, for display.
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// Parameters for the start command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartParams {
    /// Countdown duration in seconds
    #[serde(rename = "durationSeconds", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start the countdown from the full duration
    Start {
        /// Start parameters
        #[serde(flatten)]
        params: StartParams,
    },
    /// Freeze the countdown
    Pause,
    /// Continue a paused countdown
    Resume,
    /// Return to the inactive phase with a full countdown
    Reset,
    /// Query the current state
    Status,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Total countdown duration in seconds
    #[serde(rename = "totalSeconds", skip_serializing_if = "Option::is_none")]
    pub total_seconds: Option<u32>,
    /// Remaining time as a fraction of the total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl ResponseData {
    /// Creates response data from timer state.
    pub fn from_timer_state(state: &TimerState) -> Self {
        Self {
            phase: Some(state.phase.as_str().to_string()),
            remaining_seconds: Some(state.remaining_seconds),
            total_seconds: Some(state.config.total_seconds),
            progress: Some(state.progress_fraction()),
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
