//! Run domain types
//!
//! An `ExecutionRun` is the immutable batch handed to the dispatcher at
//! trigger time. A `RunReport` is what the dispatcher hands back once the run
//! reaches a terminal event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::outcome::TargetOutcome;
use crate::domain::script::Script;
use crate::domain::target::Target;

/// A script together with the flags chosen for it
///
/// Flags are forwarded to the executor untouched; the dispatcher never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInvocation {
    pub script: Script,
    pub flags: Vec<String>,
}

impl ScriptInvocation {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            flags: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }
}

/// Snapshot of a selection taken when a run is triggered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRun {
    pub id: Uuid,
    /// Scripts in execution order
    pub scripts: Vec<ScriptInvocation>,
    /// Targets in submission order
    pub targets: Vec<Target>,
}

impl ExecutionRun {
    pub fn new(scripts: Vec<ScriptInvocation>, targets: Vec<Target>) -> Self {
        Self {
            id: Uuid::new_v4(),
            scripts,
            targets,
        }
    }

    /// A run needs at least one script and one target
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() || self.targets.is_empty()
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Outcomes collected for one script, in target submission order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub script_id: String,
    pub script_name: String,
    pub outcomes: Vec<TargetOutcome>,
}

impl ScriptReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Result of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    /// Number of targets the run was started against
    pub target_count: usize,
    /// One entry per script that actually ran
    pub scripts: Vec<ScriptReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Total successful (script, target) pairs
    pub fn succeeded(&self) -> usize {
        self.scripts.iter().map(ScriptReport::succeeded).sum()
    }

    /// Total failed (script, target) pairs
    pub fn failed(&self) -> usize {
        self.scripts.iter().map(ScriptReport::failed).sum()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}
