//! Error types for LinkOps operations

use thiserror::Error;

use crate::domain::selection::MAX_SCRIPTS;

/// Errors reported to the user when a selection change or a run trigger is rejected
///
/// Failed targets are not errors: they are outcomes, and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// A run was triggered with no scripts or no targets selected
    #[error("Please select at least one script and one target")]
    EmptySelection,

    /// Selecting another script would exceed the selection limit
    #[error("Maximum {limit} scripts can be selected")]
    SelectionLimitExceeded { limit: usize },

    /// A run was triggered while another run is still in progress
    #[error("An execution is already in progress")]
    RunAlreadyInProgress,

    /// No catalog script has this id
    #[error("Unknown script: {0}")]
    UnknownScript(String),

    /// No eligible target has this id
    #[error("Target not available: {0}")]
    UnknownTarget(String),
}

impl OperationError {
    pub fn selection_limit() -> Self {
        Self::SelectionLimitExceeded { limit: MAX_SCRIPTS }
    }
}

/// Errors raised while loading a script catalog or a target roster
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Document is not a valid JSON array of entries
    #[error("Failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share the same id
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_limit_message() {
        let err = OperationError::selection_limit();
        assert_eq!(err.to_string(), "Maximum 10 scripts can be selected");
    }

    #[test]
    fn test_catalog_parse_error() {
        let err: CatalogError = serde_json::from_str::<Vec<u8>>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Failed to parse document"));
    }
}
