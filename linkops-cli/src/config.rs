//! Configuration module
//!
//! Resolves the catalog and roster the CLI works against, plus the runner
//! settings taken from the environment.

use anyhow::{Context, Result};
use linkops_core::{ScriptCatalog, TargetRoster};
use std::path::Path;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Scripts that can be selected
    pub catalog: ScriptCatalog,

    /// Machines that can be targeted
    pub roster: TargetRoster,

    /// Probe settings; command-line flags override these per run
    pub runner: linkops_runner::Config,
}

impl Config {
    /// Loads catalog and roster files when given, builtin data otherwise
    pub fn load(catalog: Option<&Path>, roster: Option<&Path>) -> Result<Self> {
        let catalog = match catalog {
            Some(path) => ScriptCatalog::from_json(&read(path)?)
                .with_context(|| format!("Invalid script catalog {}", path.display()))?,
            None => ScriptCatalog::builtin(),
        };

        let roster = match roster {
            Some(path) => TargetRoster::from_json(&read(path)?)
                .with_context(|| format!("Invalid roster {}", path.display()))?,
            None => TargetRoster::builtin(),
        };

        let runner = linkops_runner::Config::from_env()
            .context("Failed to load runner configuration from environment")?;

        Ok(Self {
            catalog,
            roster,
            runner,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
