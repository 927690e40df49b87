//! rcalias - Shell alias manager

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rcalias::cli::{commands, Cli, Context};

/// Log filter variable, e.g. `RCALIAS_LOG=rcalias=debug`
const LOG_ENV: &str = "RCALIAS_LOG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::from_cli(&cli)?;

    commands::execute(&ctx, &cli.command)
}
