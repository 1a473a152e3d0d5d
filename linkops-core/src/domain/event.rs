//! Output event types
//!
//! Every line of a run transcript is an `OutputEvent`. The `sequence` field is
//! the ordering key: renderers display events by sequence, never by arrival.

use serde::{Deserialize, Serialize};

use crate::domain::outcome::OutcomeStatus;
use crate::domain::script::Script;
use crate::domain::target::Target;

/// Line shown by a transcript that has no run output
pub const PLACEHOLDER: &str = "Ready to execute scripts...";

/// Width of the separator rule in characters
pub const SEPARATOR_WIDTH: usize = 60;

/// Visual level of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Success,
    Error,
    Muted,
}

/// What produced a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    RunStart,
    Separator,
    ScriptStart,
    TargetResult,
    ScriptFinish,
    RunComplete,
    RunCancelled,
}

/// A single line of the run transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub sequence: u64,
    pub kind: EventKind,
    pub level: EventLevel,
    pub text: String,
}

impl OutputEvent {
    pub fn new(sequence: u64, kind: EventKind, level: EventLevel, text: impl Into<String>) -> Self {
        Self {
            sequence,
            kind,
            level,
            text: text.into(),
        }
    }

    /// Whether this event ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::RunComplete | EventKind::RunCancelled)
    }
}

// =============================================================================
// Line text
// =============================================================================

pub fn run_start_text(scripts: usize, targets: usize) -> String {
    format!(
        "Starting execution of {} script(s) on {} target(s)...",
        scripts, targets
    )
}

pub fn separator_text() -> String {
    "─".repeat(SEPARATOR_WIDTH)
}

/// `[2] ` when the run has several scripts, empty otherwise
///
/// `index` is zero-based; the marker is one-based.
pub fn position_marker(index: usize, total: usize) -> String {
    if total > 1 {
        format!("[{}] ", index + 1)
    } else {
        String::new()
    }
}

pub fn script_start_text(marker: &str, script: &Script) -> String {
    format!("{}{} - {} - STARTED", marker, script.name, script.id)
}

pub fn script_finish_text(marker: &str, script: &Script) -> String {
    format!("{}{} - {} - FINISHED", marker, script.name, script.id)
}

pub fn target_result_text(target: &Target, status: OutcomeStatus) -> String {
    format!("  └─ {}: {}", target.name, status)
}

pub fn target_result_level(status: OutcomeStatus) -> EventLevel {
    match status {
        OutcomeStatus::Succeeded => EventLevel::Success,
        OutcomeStatus::Failed => EventLevel::Error,
    }
}

pub fn run_complete_text() -> String {
    "Execution completed".to_string()
}

pub fn run_cancelled_text(remaining: usize) -> String {
    format!("Execution cancelled ({} script(s) not started)", remaining)
}
