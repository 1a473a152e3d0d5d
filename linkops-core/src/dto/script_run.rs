//! Script run DTOs

use serde::{Deserialize, Serialize};

use crate::domain::outcome::OutcomeStatus;

/// Request to run one script on one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRunRequest {
    pub script_id: String,
    pub flags: Vec<String>,
}

/// Gateway answer for a script run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRunResponse {
    pub status: OutcomeStatus,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub output: Option<String>,
}
