//! Script catalog
//!
//! Static registry of the scripts operators can run. The builtin catalog
//! mirrors the scripts shipped with the dashboard; a JSON document with the
//! same shape (`[{"id", "name", "flags": [...]}]`) can replace it.

use std::collections::HashSet;

use crate::domain::script::Script;
use crate::error::CatalogError;

/// Registry of available scripts, in display order
#[derive(Debug, Clone)]
pub struct ScriptCatalog {
    scripts: Vec<Script>,
}

impl ScriptCatalog {
    /// Builds a catalog, rejecting duplicate ids
    pub fn new(scripts: Vec<Script>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for script in &scripts {
            if !seen.insert(script.id.as_str()) {
                return Err(CatalogError::DuplicateId(script.id.clone()));
            }
        }
        Ok(Self { scripts })
    }

    /// Parses a JSON array of scripts
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let scripts: Vec<Script> = serde_json::from_str(json)?;
        Self::new(scripts)
    }

    /// The scripts shipped with the dashboard
    pub fn builtin() -> Self {
        let scripts = vec![
            Script::new("install_nano", "Install Nano", ["--yes", "--quiet", "--no-recommends"]),
            Script::new("install_vim", "Install Vim", ["--yes", "--quiet", "--enhanced"]),
            Script::new(
                "install_crowdsec",
                "Install CrowdSec",
                ["--auto-config", "--enable-service", "--start-now"],
            ),
            Script::new(
                "install_wazuh",
                "Install Wazuh Agent",
                ["--manager-ip", "--auto-enroll", "--enable-service"],
            ),
            Script::new(
                "install_docker",
                "Install Docker",
                ["--add-user", "--enable-service", "--start-now"],
            ),
            Script::new(
                "install_nginx",
                "Install Nginx",
                ["--enable-service", "--configure-firewall", "--start-now"],
            ),
            Script::new(
                "baseline",
                "Baseline Check",
                ["--verbose", "--save-output", "--json-format"],
            ),
            Script::new(
                "security_audit",
                "Security Audit",
                ["--full-scan", "--save-report", "--fix-issues"],
            ),
            Script::new(
                "update_system",
                "Update System",
                ["--yes", "--auto-reboot", "--clean-cache"],
            ),
            Script::new(
                "install_fail2ban",
                "Install Fail2ban",
                ["--enable-ssh", "--enable-service", "--start-now"],
            ),
        ];

        Self { scripts }
    }

    pub fn get(&self, id: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.id == id)
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl Default for ScriptCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = ScriptCatalog::builtin();
        assert_eq!(catalog.len(), 10);

        let baseline = catalog.get("baseline").unwrap();
        assert_eq!(baseline.name, "Baseline Check");
        assert_eq!(
            baseline.flags,
            vec!["--verbose", "--save-output", "--json-format"]
        );
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_builtin_has_unique_ids() {
        let catalog = ScriptCatalog::builtin();
        assert!(ScriptCatalog::new(catalog.scripts().to_vec()).is_ok());
    }

    #[test]
    fn test_from_json() {
        let catalog = ScriptCatalog::from_json(
            r#"[
                {"id": "a", "name": "Script A", "flags": ["--x"]},
                {"id": "b", "name": "Script B"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.scripts()[0].id, "a");
        assert!(catalog.get("b").unwrap().flags.is_empty());
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let err = ScriptCatalog::from_json(
            r#"[{"id": "a", "name": "A"}, {"id": "a", "name": "A again"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }
}
