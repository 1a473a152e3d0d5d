//! Operation history domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::run::{RunReport, RunStatus};

/// Overall status of a finished operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// No target failed
    Success,
    /// No target succeeded
    Failed,
    /// Some targets failed
    Partial,
    /// The run was cancelled before every script started
    Cancelled,
}

impl OperationStatus {
    pub fn from_report(report: &RunReport) -> Self {
        if report.status == RunStatus::Cancelled {
            return OperationStatus::Cancelled;
        }

        match (report.succeeded(), report.failed()) {
            (_, 0) => OperationStatus::Success,
            (0, _) => OperationStatus::Failed,
            _ => OperationStatus::Partial,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Success => write!(f, "SUCCESS"),
            OperationStatus::Failed => write!(f, "FAILED"),
            OperationStatus::Partial => write!(f, "PARTIAL"),
            OperationStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// One entry of the operations history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Display id, e.g. `OP-10291`
    pub id: String,
    /// Script display names in execution order
    pub scripts: Vec<String>,
    pub targets: usize,
    pub status: OperationStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl OperationRecord {
    /// Title shown for the record: the script name, or a count for batches
    pub fn title(&self) -> String {
        match self.scripts.as_slice() {
            [] => "(no scripts)".to_string(),
            [single] => single.clone(),
            [first, rest @ ..] => format!("{} (+{} more)", first, rest.len()),
        }
    }
}
