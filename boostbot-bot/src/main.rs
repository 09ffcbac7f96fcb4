// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `BoostBot` - relays the current boosted card and its owners to chat.
//!
//! # Examples
//!
//! ```bash
//! # Start the bot (webhook or long-poll, per DELIVERY_MODE)
//! boostbot
//!
//! # One fetch, printed for the operator
//! boostbot fetch
//!
//! # JSON output
//! boostbot fetch --format json --pretty
//! ```

mod commands;
mod delivery;
mod dispatcher;
mod output;
mod telegram;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::fetch;

// ============================================================================
// CLI Definition
// ============================================================================

/// `BoostBot` - boosted card relay bot.
#[derive(Parser)]
#[command(name = "boostbot")]
#[command(about = "Chat bot relaying the current boosted card and its owners")]
#[command(long_about = r"
BoostBot logs into the club page, reads the boosted card and its owners,
and answers /card in chat.

Configuration comes from the environment (a .env file is read first):
  TOKEN, USERNAME, PASSWORD      required
  DELIVERY_MODE                  push (default) or pull
  WEBHOOK_URL, PORT              push mode
  FETCH_STRATEGY                 plain, challenge (default) or browser

Examples:
  boostbot                       # Start the bot
  boostbot fetch                 # One fetch, printed
  boostbot fetch --format json   # JSON output
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'run' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the bot (default if no command specified).
    Run,

    /// Fetch the boosted card once and print it.
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error, or a fetch that did not return a card.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("boostbot=debug,info")
        } else {
            EnvFilter::new("boostbot=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Fetch(args)) => fetch::run(args, &cli).await.map(|snapshot| {
            if snapshot.is_ok() {
                ExitCode::Success
            } else {
                ExitCode::Error
            }
        }),
        Some(Commands::Run) | None => commands::run::run().await.map(|()| ExitCode::Success),
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
