//! Target command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use linkops_core::domain::target::Target;

use crate::config::Config;

/// Target subcommands
#[derive(Subcommand)]
pub enum TargetCommands {
    /// List machines eligible for execution
    List {
        /// Also show unreachable and unenrolled machines
        #[arg(short, long)]
        all: bool,
    },
}

pub fn handle_target_command(command: TargetCommands, config: &Config) -> Result<()> {
    match command {
        TargetCommands::List { all } => list_targets(config, all),
    }
}

fn list_targets(config: &Config, all: bool) -> Result<()> {
    let targets: Vec<&Target> = if all {
        config.roster.machines().iter().collect()
    } else {
        config.roster.eligible().collect()
    };

    if targets.is_empty() {
        println!("{}", "No targets available.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} target(s):", targets.len()).bold());
    println!();
    for target in targets {
        println!("  {} {:<24} {}", "▸".cyan(), target.id, colorize_eligibility(target));
    }

    Ok(())
}

fn colorize_eligibility(target: &Target) -> ColoredString {
    match (target.reachable, target.enrolled) {
        (true, true) => "ready".green(),
        (false, _) => "unreachable".red(),
        (true, false) => "not enrolled".yellow(),
    }
}
