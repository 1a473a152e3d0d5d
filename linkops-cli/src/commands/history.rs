//! History command handler

use anyhow::Result;
use chrono::Utc;
use colored::*;
use linkops_core::domain::operation::{OperationRecord, OperationStatus};
use linkops_runner::service::{OperationHistory, format_duration, format_relative_time};

/// Shows the operations history
///
/// History is kept in memory only, so a fresh process shows the demo entries.
pub fn show_history() -> Result<()> {
    let history = OperationHistory::seeded(Utc::now());
    print_records(&history.records());
    Ok(())
}

pub fn print_records(records: &[OperationRecord]) {
    if records.is_empty() {
        println!("{}", "No operations recorded.".yellow());
        return;
    }

    let now = Utc::now();
    println!("{}", format!("Recent operations ({}):", records.len()).bold());
    println!();
    for record in records {
        println!(
            "  {} {}  {}",
            "▸".cyan(),
            record.id.bold(),
            format_relative_time(record.started_at, now).dimmed()
        );
        println!("    {}", record.title());
        println!(
            "    {} target{}  {}  {}",
            record.targets,
            if record.targets == 1 { "" } else { "s" },
            colorize_status(record.status),
            format_duration(record.duration_ms).dimmed()
        );
        println!();
    }
}

fn colorize_status(status: OperationStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        OperationStatus::Success => text.green(),
        OperationStatus::Failed => text.red(),
        OperationStatus::Partial => text.yellow(),
        OperationStatus::Cancelled => text.dimmed(),
    }
}
