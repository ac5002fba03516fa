//! ringdown - a countdown timer for the terminal
//!
//! A background daemon owns a single countdown; this binary talks to it:
//! - start, pause, resume, reset the countdown
//! - show or watch the remaining time with a progress bar

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};

pub mod cli;
pub mod daemon;
pub mod types;

use cli::{Cli, Commands, Display, IpcClient};
use types::TimerConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Builds a client, honoring a `--socket` override.
fn make_client(socket: Option<PathBuf>) -> Result<IpcClient> {
    match socket {
        Some(path) => Ok(IpcClient::with_socket_path(path)),
        None => IpcClient::new(),
    }
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Start(args)) => {
            let client = make_client(cli.socket)?;
            let response = client.start(&args).await?;
            Display::show_start_success(&response);
        }
        Some(Commands::Pause) => {
            let client = make_client(cli.socket)?;
            let response = client.pause().await?;
            Display::show_pause_success(&response);
        }
        Some(Commands::Resume) => {
            let client = make_client(cli.socket)?;
            let response = client.resume().await?;
            Display::show_resume_success(&response);
        }
        Some(Commands::Reset) => {
            let client = make_client(cli.socket)?;
            let response = client.reset().await?;
            Display::show_reset_success(&response);
        }
        Some(Commands::Status) => {
            let client = make_client(cli.socket)?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Watch) => {
            let client = make_client(cli.socket)?;
            watch(&client).await?;
        }
        Some(Commands::Daemon(args)) => {
            let socket_path = match cli.socket {
                Some(path) => path,
                None => daemon::default_socket_path()?,
            };
            let config = TimerConfig::with_total_seconds(args.duration);
            daemon::run(&socket_path, config).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Polls the daemon once a second and redraws the countdown on one line.
///
/// Runs until ctrl-c or until the daemon stops answering.
async fn watch(client: &IpcClient) -> Result<()> {
    loop {
        let response = client.status().await?;
        if let Some(data) = &response.data {
            let line = Display::watch_line(data);
            print!("\r{}", line);
            std::io::stdout().flush()?;
        }

        tokio::select! {
            _ = tokio::time::sleep(tokio::time::Duration::from_secs(1)) => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
