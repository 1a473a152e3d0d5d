//! LinkOps CLI
//!
//! Command-line surface for the operations dispatcher: browse the script
//! catalog and target roster, run batches with a live transcript, and view
//! the operations history.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linkops")]
#[command(about = "LinkOps operations dispatcher CLI", long_about = None)]
struct Cli {
    /// JSON file with the script catalog (defaults to the builtin scripts)
    #[arg(long, global = true, env = "LINKOPS_CATALOG")]
    catalog: Option<PathBuf>,

    /// JSON file with the machine roster (defaults to the builtin machines)
    #[arg(long, global = true, env = "LINKOPS_ROSTER")]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkops=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.catalog.as_deref(), cli.roster.as_deref())?;

    handle_command(cli.command, &config).await
}
