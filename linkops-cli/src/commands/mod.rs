//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod history;
mod run;
mod scripts;
mod targets;

pub use run::RunArgs;
pub use scripts::ScriptCommands;
pub use targets::TargetCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Script catalog
    Scripts {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Target machines
    Targets {
        #[command(subcommand)]
        command: TargetCommands,
    },
    /// Run scripts against targets with a live transcript
    Run(RunArgs),
    /// Show the operations history
    History,
}

/// Routes the command to the appropriate handler module
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Scripts { command } => scripts::handle_script_command(command, config),
        Commands::Targets { command } => targets::handle_target_command(command, config),
        Commands::Run(args) => run::handle_run(args, config).await,
        Commands::History => history::show_history(),
    }
}
