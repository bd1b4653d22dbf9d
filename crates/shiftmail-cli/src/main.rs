//! Shiftmail - volunteer shift assignments and their emails
//!
//! Command-line front end over `shiftmail-core`.

mod commands;
mod config;
mod lookup;

use anyhow::{Context, Result};
use clap::Parser;
use shiftmail_core::{Aggregate, Application};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::Command;

/// Shiftmail - build volunteer shift assignments and preview their emails
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the bootstrap configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shiftmail=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::load(args.config)?;

    let mut app = Application::from_properties(Some(&config.properties), config.base_dir())
        .with_context(|| format!("Failed to start from {}", config.path.display()))?;

    for aggregate in Aggregate::ALL {
        app.register_observer(aggregate, |changed: Aggregate| {
            tracing::info!("Saved {}", changed);
        });
    }

    commands::run(&mut app, args.command)
}
