//! rangeindex - rebuild and inspect the date-range index of a partitioned store

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "rangeindex=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = config::load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    match &cli.command {
        Command::Reindex => commands::reindex::run(&cli, config).await,
        Command::Dates => commands::dates::run(&cli, &config),
        Command::Status => commands::status::run(&cli, &config),
        Command::Lookup { ids } => commands::lookup::run(&cli, &config, ids),
        Command::Doctor => commands::doctor::run(&cli, &config),
    }
}
