//! Target roster
//!
//! Known machines and the filtered view of those eligible as execution
//! targets. Only reachable and enrolled machines are ever offered for
//! selection, so the selection itself never has to re-check eligibility.

use std::collections::HashSet;

use crate::domain::target::Target;
use crate::error::CatalogError;

/// All machines known to the dashboard
#[derive(Debug, Clone)]
pub struct TargetRoster {
    machines: Vec<Target>,
}

impl TargetRoster {
    /// Builds a roster, rejecting duplicate ids
    pub fn new(machines: Vec<Target>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for machine in &machines {
            if !seen.insert(machine.id.as_str()) {
                return Err(CatalogError::DuplicateId(machine.id.clone()));
            }
        }
        Ok(Self { machines })
    }

    /// Parses a JSON array of machines
    ///
    /// Extra fields (provider, latency, ...) are ignored.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let machines: Vec<Target> = serde_json::from_str(json)?;
        Self::new(machines)
    }

    /// The demo machines shipped with the dashboard
    pub fn builtin() -> Self {
        let machines = [
            "vps-linode-01",
            "vps-racknerd-01",
            "proxmox-cluster-01",
            "vm-ubuntu-web-01",
            "vm-ubuntu-db-01",
            "vm-alpine-docker-01",
            "vm-mint-dev-01",
            "vm-docker-host-01",
            "vm-nginx-proxy-01",
            "vm-gitea-01",
        ]
        .into_iter()
        .map(|name| Target::new(name, name))
        .collect();

        Self { machines }
    }

    pub fn machines(&self) -> &[Target] {
        &self.machines
    }

    /// Machines that may be selected as targets
    pub fn eligible(&self) -> impl Iterator<Item = &Target> {
        self.machines.iter().filter(|m| m.is_eligible())
    }

    /// Resolves an eligible machine by id
    pub fn find(&self, id: &str) -> Option<&Target> {
        self.eligible().find(|m| m.id == id)
    }
}

impl Default for TargetRoster {
    fn default() -> Self {
        Self::builtin()
    }
}
