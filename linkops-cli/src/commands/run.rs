//! Run command handler
//!
//! Builds a selection from the command line, runs it through the operations
//! service and renders the transcript live. Ctrl-C cancels the run once the
//! script in progress has finished on every target.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use linkops_core::domain::event::{EventLevel, OutputEvent};
use linkops_core::domain::run::{RunReport, RunStatus};
use linkops_runner::probe;
use linkops_runner::service::OperationsService;
use linkops_runner::sink::{ChannelSink, SinkMessage};
use linkops_runner::{Config as RunnerConfig, ProbeKind};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::history::print_records;
use crate::config::Config;

/// Arguments of the run command
#[derive(Args)]
pub struct RunArgs {
    /// Script id to run, in execution order (repeatable)
    #[arg(short, long = "script", value_name = "ID", required = true)]
    scripts: Vec<String>,

    /// Flag for a selected script, as SCRIPT:FLAG (repeatable)
    #[arg(short, long = "flag", value_name = "SCRIPT:FLAG")]
    flags: Vec<String>,

    /// Target id (repeatable)
    #[arg(short, long = "target", value_name = "ID")]
    targets: Vec<String>,

    /// Run on every eligible target
    #[arg(long, conflicts_with = "targets")]
    all_targets: bool,

    /// Probe implementation (mock | agent)
    #[arg(long)]
    probe: Option<ProbeKind>,

    /// Agent gateway URL
    #[arg(long)]
    agent_url: Option<String>,

    /// Mock probe success probability
    #[arg(long)]
    success_rate: Option<f64>,

    /// Mock probe latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Seed for reproducible mock outcomes
    #[arg(long)]
    seed: Option<u64>,

    /// Print the operations history after the run
    #[arg(long)]
    history: bool,
}

impl RunArgs {
    /// Applies command-line overrides on top of the environment configuration
    fn runner_config(&self, base: &RunnerConfig) -> Result<RunnerConfig> {
        let mut config = base.clone();

        if let Some(kind) = self.probe {
            config.probe = kind;
        }
        if let Some(url) = &self.agent_url {
            config.agent_url = url.clone();
        }
        if let Some(rate) = self.success_rate {
            config.success_rate = rate;
        }
        if let Some(latency) = self.latency_ms {
            config.probe_latency = Duration::from_millis(latency);
        }
        if self.seed.is_some() {
            config.probe_seed = self.seed;
        }

        config.validate().context("Invalid runner configuration")?;
        Ok(config)
    }
}

pub async fn handle_run(args: RunArgs, config: &Config) -> Result<()> {
    let runner_config = args.runner_config(&config.runner)?;
    let probe = probe::from_config(&runner_config)?;
    info!("Using {} probe", runner_config.probe);

    let (sink, rx) = ChannelSink::new();
    let service = OperationsService::new(
        config.catalog.clone(),
        config.roster.clone(),
        probe,
        Arc::new(sink),
    );

    select(&service, &args)?;

    let renderer = tokio::spawn(render(rx));
    let outcome = run_until_done(&service).await;
    let history = service.history();

    // Dropping the service closes the channel and ends the renderer
    drop(service);
    renderer.await.context("Transcript renderer failed")?;

    let report = outcome?;
    print_summary(&report);

    if args.history {
        println!();
        print_records(&history);
    }

    Ok(())
}

/// Applies the command-line selection to the service
fn select(service: &OperationsService, args: &RunArgs) -> Result<()> {
    reject_duplicates("script", &args.scripts)?;
    reject_duplicates("flag", &args.flags)?;
    reject_duplicates("target", &args.targets)?;

    for id in &args.scripts {
        service.toggle_script(id)?;
    }

    for spec in &args.flags {
        let (script_id, flag) = parse_flag(spec)?;
        if service.toggle_flag(script_id, flag).is_none() {
            bail!(
                "Flag {} is not available for script {} (is the script selected?)",
                flag,
                script_id
            );
        }
    }

    if args.all_targets {
        let ids: Vec<String> = service.roster().eligible().map(|t| t.id.clone()).collect();
        for id in ids {
            service.toggle_target(&id)?;
        }
    } else {
        for id in &args.targets {
            service.toggle_target(id)?;
        }
    }

    Ok(())
}

/// Runs the selection, turning the first Ctrl-C into a cancellation request
async fn run_until_done(service: &OperationsService) -> Result<RunReport> {
    let run = service.run();
    tokio::pin!(run);

    let mut interrupted = false;
    loop {
        tokio::select! {
            result = &mut run => return Ok(result?),
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                if let Err(e) = signal {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    continue;
                }
                if service.cancel() {
                    eprintln!("{}", "Cancelling after the current script...".yellow());
                }
            }
        }
    }
}

/// Prints transcript lines as they arrive
async fn render(mut rx: UnboundedReceiver<SinkMessage>) {
    while let Some(message) = rx.recv().await {
        match message {
            SinkMessage::Event(event) => println!("{}", colorize_event(&event)),
            SinkMessage::Clear => {}
        }
    }
}

fn colorize_event(event: &OutputEvent) -> ColoredString {
    let text = event.text.as_str();
    match event.level {
        EventLevel::Info => text.normal(),
        EventLevel::Success => text.green(),
        EventLevel::Error => text.red(),
        EventLevel::Muted => text.dimmed(),
    }
}

fn print_summary(report: &RunReport) {
    let seconds = report.duration().num_milliseconds() as f64 / 1000.0;
    let summary = format!(
        "{} script(s) on {} target(s): {} succeeded, {} failed in {:.1}s",
        report.scripts.len(),
        report.target_count,
        report.succeeded(),
        report.failed(),
        seconds
    );

    println!();
    match report.status {
        RunStatus::Completed if report.failed() == 0 => println!("{}", summary.green()),
        RunStatus::Completed => println!("{}", summary.yellow()),
        RunStatus::Cancelled => println!("{}", format!("Cancelled: {}", summary).red()),
    }
}

/// Selection toggles, so an id given twice would cancel itself out
fn reject_duplicates(kind: &str, ids: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            bail!("The {} {} was given more than once", kind, id);
        }
    }
    Ok(())
}

/// Splits `SCRIPT:FLAG` into its parts
fn parse_flag(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once(':') {
        Some((script, flag)) if !script.is_empty() && !flag.is_empty() => Ok((script, flag)),
        _ => bail!("Invalid flag '{}', expected SCRIPT:FLAG", spec),
    }
}
