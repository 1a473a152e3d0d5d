//! Selection state
//!
//! The mutable set of scripts, flags and targets chosen on the operations
//! tab. It is owned by the tab controller and only read by the dispatcher,
//! through `snapshot()`, when a run is triggered.

use std::collections::{HashMap, HashSet};

use crate::domain::run::{ExecutionRun, ScriptInvocation};
use crate::domain::script::Script;
use crate::domain::target::Target;
use crate::error::OperationError;

/// Maximum number of scripts in one selection
pub const MAX_SCRIPTS: usize = 10;

/// Result of a toggle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Scripts, per-script flags and targets chosen for the next run
///
/// Invariants:
/// - `scripts` keeps insertion order, holds no duplicates and never exceeds
///   [`MAX_SCRIPTS`]
/// - every key of `flags` is the id of a script in `scripts`
/// - `targets` holds no duplicates
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    scripts: Vec<Script>,
    flags: HashMap<String, HashSet<String>>,
    targets: Vec<Target>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the script if absent, removes it (and its flags) if present
    ///
    /// Adding an 11th script fails with `SelectionLimitExceeded` and leaves
    /// the selection untouched.
    pub fn toggle_script(&mut self, script: &Script) -> Result<Toggle, OperationError> {
        if let Some(pos) = self.scripts.iter().position(|s| s.id == script.id) {
            self.scripts.remove(pos);
            self.flags.remove(&script.id);
            return Ok(Toggle::Removed);
        }

        if self.scripts.len() >= MAX_SCRIPTS {
            return Err(OperationError::selection_limit());
        }

        self.scripts.push(script.clone());
        Ok(Toggle::Added)
    }

    /// Toggles a flag for a selected script
    ///
    /// Returns `None` without changing anything when the script is not
    /// selected or does not allow the flag.
    pub fn toggle_flag(&mut self, script_id: &str, flag: &str) -> Option<Toggle> {
        let script = self.scripts.iter().find(|s| s.id == script_id)?;
        if !script.allows_flag(flag) {
            return None;
        }

        let chosen = self.flags.entry(script_id.to_string()).or_default();
        if chosen.remove(flag) {
            Some(Toggle::Removed)
        } else {
            chosen.insert(flag.to_string());
            Some(Toggle::Added)
        }
    }

    /// Adds the target if absent, removes it if present
    ///
    /// Eligibility is enforced upstream by the roster, which only offers
    /// reachable and enrolled machines.
    pub fn toggle_target(&mut self, target: &Target) -> Toggle {
        if let Some(pos) = self.targets.iter().position(|t| t.id == target.id) {
            self.targets.remove(pos);
            Toggle::Removed
        } else {
            self.targets.push(target.clone());
            Toggle::Added
        }
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_script_selected(&self, script_id: &str) -> bool {
        self.scripts.iter().any(|s| s.id == script_id)
    }

    /// Chosen flags for a script, in the script's catalog order
    pub fn flags_for(&self, script_id: &str) -> Vec<String> {
        let Some(script) = self.scripts.iter().find(|s| s.id == script_id) else {
            return Vec::new();
        };
        let Some(chosen) = self.flags.get(script_id) else {
            return Vec::new();
        };

        script
            .flags
            .iter()
            .filter(|f| chosen.contains(*f))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.scripts.clear();
        self.flags.clear();
        self.targets.clear();
    }

    /// Copies the selection into an immutable run
    ///
    /// Later edits to the selection never reach a run built from an earlier
    /// snapshot.
    pub fn snapshot(&self) -> ExecutionRun {
        let scripts = self
            .scripts
            .iter()
            .map(|s| ScriptInvocation::new(s.clone()).with_flags(self.flags_for(&s.id)))
            .collect();

        ExecutionRun::new(scripts, self.targets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(n: usize) -> Script {
        Script::new(
            format!("script_{}", n),
            format!("Script {}", n),
            ["--yes", "--quiet", "--verbose"],
        )
    }

    #[test]
    fn test_toggle_script_adds_and_removes() {
        let mut selection = SelectionState::new();
        assert_eq!(selection.toggle_script(&script(1)), Ok(Toggle::Added));
        assert_eq!(selection.scripts().len(), 1);

        assert_eq!(selection.toggle_script(&script(1)), Ok(Toggle::Removed));
        assert!(selection.scripts().is_empty());
    }

    #[test]
    fn test_eleventh_script_is_rejected() {
        let mut selection = SelectionState::new();
        for n in 0..MAX_SCRIPTS {
            selection.toggle_script(&script(n)).unwrap();
        }

        let result = selection.toggle_script(&script(MAX_SCRIPTS));
        assert_eq!(
            result,
            Err(OperationError::SelectionLimitExceeded { limit: 10 })
        );
        assert_eq!(selection.scripts().len(), MAX_SCRIPTS);
        assert!(!selection.is_script_selected("script_10"));
    }

    #[test]
    fn test_removing_at_limit_still_allowed() {
        let mut selection = SelectionState::new();
        for n in 0..MAX_SCRIPTS {
            selection.toggle_script(&script(n)).unwrap();
        }

        assert_eq!(selection.toggle_script(&script(3)), Ok(Toggle::Removed));
        assert_eq!(selection.toggle_script(&script(42)), Ok(Toggle::Added));
        assert_eq!(selection.scripts().len(), MAX_SCRIPTS);
    }

    #[test]
    fn test_scripts_keep_insertion_order() {
        let mut selection = SelectionState::new();
        selection.toggle_script(&script(3)).unwrap();
        selection.toggle_script(&script(1)).unwrap();
        selection.toggle_script(&script(2)).unwrap();

        let ids: Vec<&str> = selection.scripts().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["script_3", "script_1", "script_2"]);
    }

    #[test]
    fn test_removing_script_drops_its_flags() {
        let mut selection = SelectionState::new();
        let s = script(1);
        selection.toggle_script(&s).unwrap();
        selection.toggle_flag(&s.id, "--yes");
        selection.toggle_flag(&s.id, "--verbose");
        assert_eq!(selection.flags_for(&s.id), vec!["--yes", "--verbose"]);

        selection.toggle_script(&s).unwrap();
        assert!(selection.flags.is_empty());

        selection.toggle_script(&s).unwrap();
        assert!(selection.flags_for(&s.id).is_empty());
    }

    #[test]
    fn test_toggle_flag_ignores_unknown() {
        let mut selection = SelectionState::new();
        let s = script(1);

        // not selected yet
        assert_eq!(selection.toggle_flag(&s.id, "--yes"), None);
        assert!(selection.flags.is_empty());

        selection.toggle_script(&s).unwrap();
        assert_eq!(selection.toggle_flag(&s.id, "--not-allowed"), None);
        assert!(selection.flags_for(&s.id).is_empty());

        assert_eq!(selection.toggle_flag(&s.id, "--yes"), Some(Toggle::Added));
        assert_eq!(selection.toggle_flag(&s.id, "--yes"), Some(Toggle::Removed));
        assert!(selection.flags_for(&s.id).is_empty());
    }

    #[test]
    fn test_flags_follow_catalog_order() {
        let mut selection = SelectionState::new();
        let s = script(1);
        selection.toggle_script(&s).unwrap();
        selection.toggle_flag(&s.id, "--verbose");
        selection.toggle_flag(&s.id, "--yes");

        assert_eq!(selection.flags_for(&s.id), vec!["--yes", "--verbose"]);
    }

    #[test]
    fn test_toggle_target() {
        let mut selection = SelectionState::new();
        let t = Target::new("vm-1", "vm-1");

        assert_eq!(selection.toggle_target(&t), Toggle::Added);
        assert_eq!(selection.targets().len(), 1);
        assert_eq!(selection.toggle_target(&t), Toggle::Removed);
        assert!(selection.targets().is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated() {
        let mut selection = SelectionState::new();
        let s = script(1);
        let t1 = Target::new("vm-1", "vm-1");
        let t2 = Target::new("vm-2", "vm-2");
        selection.toggle_script(&s).unwrap();
        selection.toggle_flag(&s.id, "--quiet");
        selection.toggle_target(&t1);

        let run = selection.snapshot();

        selection.toggle_target(&t2);
        selection.toggle_script(&script(2)).unwrap();
        selection.toggle_flag(&s.id, "--yes");

        assert_eq!(run.scripts.len(), 1);
        assert_eq!(run.scripts[0].flags, vec!["--quiet"]);
        assert_eq!(run.targets, vec![t1]);
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionState::new();
        selection.toggle_script(&script(1)).unwrap();
        selection.toggle_flag("script_1", "--yes");
        selection.toggle_target(&Target::new("vm-1", "vm-1"));

        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.flags.is_empty());
    }
}
