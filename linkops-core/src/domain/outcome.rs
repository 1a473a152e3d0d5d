//! Per-target outcome types

use serde::{Deserialize, Serialize};

use crate::domain::target::Target;

/// Terminal status of one (script, target) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

impl OutcomeStatus {
    pub fn is_success(self) -> bool {
        matches!(self, OutcomeStatus::Succeeded)
    }
}

impl From<bool> for OutcomeStatus {
    fn from(success: bool) -> Self {
        if success {
            OutcomeStatus::Succeeded
        } else {
            OutcomeStatus::Failed
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Succeeded => write!(f, "SUCCEEDED"),
            OutcomeStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Outcome reported for one target during one script's fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub target: Target,
    pub status: OutcomeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(OutcomeStatus::Succeeded.to_string(), "SUCCEEDED");
        assert_eq!(OutcomeStatus::Failed.to_string(), "FAILED");
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&OutcomeStatus::Failed).unwrap();
        assert_eq!(json, "\"FAILED\"");
    }
}
