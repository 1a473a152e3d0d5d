//! Script command handlers

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;
use linkops_core::domain::script::Script;

use crate::config::Config;

/// Script subcommands
#[derive(Subcommand)]
pub enum ScriptCommands {
    /// List all scripts in the catalog
    List,
    /// Show one script and its flags
    Get {
        /// Script id
        id: String,
    },
}

pub fn handle_script_command(command: ScriptCommands, config: &Config) -> Result<()> {
    match command {
        ScriptCommands::List => list_scripts(config),
        ScriptCommands::Get { id } => get_script(config, &id),
    }
}

fn list_scripts(config: &Config) -> Result<()> {
    let scripts = config.catalog.scripts();

    if scripts.is_empty() {
        println!("{}", "No scripts in the catalog.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} script(s):", scripts.len()).bold());
    println!();
    for script in scripts {
        print_script(script);
    }

    Ok(())
}

fn get_script(config: &Config, id: &str) -> Result<()> {
    match config.catalog.get(id) {
        Some(script) => {
            print_script(script);
            Ok(())
        }
        None => bail!("Unknown script: {}", id),
    }
}

fn print_script(script: &Script) {
    println!("  {} {} ({})", "▸".cyan(), script.name.bold(), script.id.dimmed());
    if script.flags.is_empty() {
        println!("    Flags:  {}", "none".dimmed());
    } else {
        println!("    Flags:  {}", script.flags.join(" "));
    }
    println!();
}
