//! Cosmograph CLI - build knowledge graphs from documents.

use anyhow::Context;
use clap::Parser;
use cosmograph_cli::commands;
use cosmograph_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load ~/.cosmograph/config.toml")?,
    };

    let formatter = Formatter::new(!cli.no_color && config.color);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter)?,
        Command::Stats(args) => commands::execute_stats(args, &formatter)?,
        Command::Patterns(args) => commands::execute_patterns(args, &formatter)?,
    }

    Ok(())
}
