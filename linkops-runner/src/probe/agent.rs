//! Gateway-backed probe
//!
//! Delegates each (script, target) pair to the agent gateway through
//! `linkops-client`. Every client error is logged and reported as a failed
//! outcome, so nothing but `OutcomeStatus` ever reaches the dispatcher.

use anyhow::{Context, Result};
use async_trait::async_trait;
use linkops_client::{AgentClient, ScriptRunRequest};
use linkops_core::domain::outcome::OutcomeStatus;
use linkops_core::domain::run::ScriptInvocation;
use linkops_core::domain::target::Target;
use tracing::{debug, warn};

use super::TargetProbe;
use crate::config::Config;

/// Probe that runs scripts through the agent gateway
pub struct AgentProbe {
    client: AgentClient,
}

impl AgentProbe {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }

    /// Creates a probe whose HTTP client enforces the configured timeout
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.agent_timeout)
            .build()
            .context("Failed to build HTTP client for agent probe")?;

        Ok(Self::new(AgentClient::with_client(
            config.agent_url.clone(),
            http_client,
        )))
    }
}

#[async_trait]
impl TargetProbe for AgentProbe {
    async fn probe(&self, invocation: &ScriptInvocation, target: &Target) -> OutcomeStatus {
        let req = ScriptRunRequest {
            script_id: invocation.script.id.clone(),
            flags: invocation.flags.clone(),
        };

        match self.client.run_script(&target.id, &req).await {
            Ok(response) => {
                debug!(
                    "Agent reported {} for {} on {} (exit code: {:?})",
                    response.status, req.script_id, target.id, response.exit_code
                );
                response.status
            }
            Err(e) => {
                warn!(
                    "Script {} on {} marked as failed: {}",
                    req.script_id, target.id, e
                );
                OutcomeStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkops_core::domain::script::Script;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_gateway_maps_to_failed() {
        let mut config = Config::default();
        config.agent_url = "http://127.0.0.1:1".to_string();
        config.agent_timeout = Duration::from_secs(2);

        let probe = AgentProbe::from_config(&config).unwrap();
        let invocation = ScriptInvocation::new(Script::new("baseline", "Baseline Check", ["--verbose"]))
            .with_flags(vec!["--verbose".to_string()]);

        let status = probe.probe(&invocation, &Target::new("vm-1", "vm-1")).await;
        assert_eq!(status, OutcomeStatus::Failed);
    }
}
