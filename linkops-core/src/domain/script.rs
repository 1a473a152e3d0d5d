//! Script domain types

use serde::{Deserialize, Serialize};

/// A named unit of work with a fixed set of optional flags
///
/// Loaded once from the catalog and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub name: String,
    /// Allowed flags, in catalog order
    #[serde(default)]
    pub flags: Vec<String>,
}

impl Script {
    /// Creates a script, dropping repeated flags while keeping their first position
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for flag in flags {
            let flag = flag.into();
            if !unique.contains(&flag) {
                unique.push(flag);
            }
        }

        Self {
            id: id.into(),
            name: name.into(),
            flags: unique,
        }
    }

    pub fn allows_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedupes_flags_in_order() {
        let script = Script::new("baseline", "Baseline Check", ["--verbose", "--json", "--verbose"]);
        assert_eq!(script.flags, vec!["--verbose", "--json"]);
    }

    #[test]
    fn test_allows_flag() {
        let script = Script::new("install_vim", "Install Vim", ["--yes", "--quiet"]);
        assert!(script.allows_flag("--yes"));
        assert!(!script.allows_flag("--enhanced"));
    }

    #[test]
    fn test_deserialize_without_flags() {
        let script: Script =
            serde_json::from_str(r#"{"id": "noop", "name": "No-op"}"#).unwrap();
        assert!(script.flags.is_empty());
    }
}
