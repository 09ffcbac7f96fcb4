//! Fetch command implementation: one login + extraction, printed.

use anyhow::{Context, Result};
use boostbot_core::CardSnapshot;
use boostbot_store::SiteConfig;
use clap::Args;
use tracing::info;

use super::build_fetcher;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the fetch command.
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Runs one fetch and prints the snapshot. Returns the snapshot so the
/// caller can pick the exit code.
pub async fn run(args: &FetchArgs, cli: &Cli) -> Result<CardSnapshot> {
    let config = SiteConfig::from_env().context("invalid configuration")?;
    let mut fetcher = build_fetcher(&config)?;
    let strategy = fetcher.strategy_info();

    info!(strategy = %strategy.id, "Fetching boosted card");
    let snapshot = fetcher.fetch().await;
    fetcher.shutdown().await;

    let output = match args.format {
        OutputFormat::Json => {
            JsonFormatter::new(args.pretty).format_snapshot(&snapshot, &strategy)?
        }
        OutputFormat::Text => {
            TextFormatter::new(!cli.no_color).format_snapshot(&snapshot, &strategy)
        }
    };
    println!("{output}");

    Ok(snapshot)
}
