//! Countdown Timer Library
//!
//! This library provides the core functionality for the ringdown CLI.
//! It includes:
//! - Timer engine for driving a single countdown
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod daemon;
pub mod types;

// Re-export commonly used types for convenience
pub use daemon::{TimerEngine, TimerEvent};
pub use types::{
    IpcRequest, IpcResponse, Phase, ResponseData, StartParams, TimerConfig, TimerState,
};
