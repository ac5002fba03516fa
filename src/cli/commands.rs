//! Command definitions for the countdown timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer CLI
#[derive(Parser, Debug)]
#[command(
    name = "ringdown",
    version,
    about = "A countdown timer with a progress readout",
    long_about = "A simple countdown timer driven by a background daemon.\n\
                  Start, pause, resume, and reset the countdown from the \
                  terminal, or watch it tick down with a progress bar.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Socket path for daemon communication (defaults to ~/.ringdown/ringdown.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the countdown from the full duration
    Start(StartArgs),

    /// Pause the countdown
    Pause,

    /// Resume a paused countdown
    Resume,

    /// Reset the countdown to the full duration
    Reset,

    /// Show the current countdown state
    Status,

    /// Watch the countdown tick down with a progress bar
    Watch,

    /// Run the timer daemon (foreground)
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Countdown duration in seconds (1-86400); defaults to the daemon's
    /// configured duration
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=86_400)
    )]
    pub duration: Option<u32>,
}

// ============================================================================
// Daemon Command Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone)]
pub struct DaemonArgs {
    /// Default countdown duration in seconds (1-86400)
    #[arg(
        short,
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u32).range(1..=86_400)
    )]
    pub duration: u32,
}

// ============================================================================
// Tests
// ============================================================================
