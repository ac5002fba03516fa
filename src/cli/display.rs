//! Display utilities for the countdown timer CLI.
//!
//! This module provides formatted output for:
//! - Success messages
//! - Error messages
//! - Status display with a progress bar and minutes:seconds readout
//!
//! Everything here is a pure function of the state reported by the daemon;
//! nothing in this module mutates timer state.

use crate::types::{IpcResponse, ResponseData};

/// Width of the textual progress bar, in characters.
const PROGRESS_BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a success message for countdown start.
    pub fn show_start_success(response: &IpcResponse) {
        println!("> {}", response.message);

        if let Some(data) = &response.data {
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  Remaining: {}:{:02}", minutes, seconds);
            }
        }
    }

    /// Shows a success message for countdown pause.
    pub fn show_pause_success(response: &IpcResponse) {
        println!("|| {}", response.message);

        if let Some(data) = &response.data {
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  Remaining: {}:{:02}", minutes, seconds);
            }
        }
    }

    /// Shows a success message for countdown resume.
    pub fn show_resume_success(response: &IpcResponse) {
        println!("> {}", response.message);

        if let Some(data) = &response.data {
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  Remaining: {}:{:02}", minutes, seconds);
            }
        }
    }

    /// Shows a success message for countdown reset.
    pub fn show_reset_success(response: &IpcResponse) {
        println!("[] {}", response.message);
    }

    /// Shows the current countdown status.
    pub fn show_status(response: &IpcResponse) {
        println!("Countdown status");
        println!("----------------");

        if let Some(data) = &response.data {
            let phase = data.phase.as_deref().unwrap_or("unknown");
            println!("Phase: {}", phase);

            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("Remaining: {}:{:02}", minutes, seconds);
            }
            if let Some(progress) = data.progress {
                println!("{}", Self::progress_bar(progress, PROGRESS_BAR_WIDTH));
            }
        } else {
            println!("The daemon reported no state");
        }
    }

    /// Renders a single watch-mode line: progress bar + readout + phase.
    pub fn watch_line(data: &ResponseData) -> String {
        let progress = data.progress.unwrap_or(0.0);
        let remaining = data.remaining_seconds.unwrap_or(0);
        let (minutes, seconds) = Self::format_time(remaining);
        let phase = data.phase.as_deref().unwrap_or("unknown");

        format!(
            "{} {}:{:02} {}",
            Self::progress_bar(progress, PROGRESS_BAR_WIDTH),
            minutes,
            seconds,
            phase
        )
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Renders a textual progress bar for a fraction in `[0.0, 1.0]`.
    ///
    /// The filled portion shrinks with the remaining time, the textual
    /// counterpart of the original circular indicator.
    fn progress_bar(fraction: f64, width: usize) -> String {
        let clamped = fraction.clamp(0.0, 1.0);
        let filled = (clamped * width as f64).round() as usize;

        let mut bar = String::with_capacity(width + 2);
        bar.push('[');
        for i in 0..width {
            bar.push(if i < filled { '#' } else { '-' });
        }
        bar.push(']');
        bar
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
