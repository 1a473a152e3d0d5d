//! Target domain model
//!
//! Represents a machine that scripts can be executed against.

use serde::{Deserialize, Serialize};

/// A machine known to the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Unique identifier for the machine
    pub id: String,

    /// Display name used in transcripts
    pub name: String,

    /// Whether the machine can be reached over its management channel
    #[serde(alias = "ssh")]
    pub reachable: bool,

    /// Whether the machine has completed enrollment
    pub enrolled: bool,
}

impl Target {
    /// Creates a reachable, enrolled target
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reachable: true,
            enrolled: true,
        }
    }

    /// Only reachable and enrolled machines may be selected for a run
    pub fn is_eligible(&self) -> bool {
        self.reachable && self.enrolled
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
