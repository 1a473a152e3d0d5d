//! Target probes
//!
//! A probe runs one script invocation against one target and eventually
//! reports SUCCEEDED or FAILED. The dispatcher only sees the trait, so the
//! simulated probe and the gateway-backed probe are interchangeable.
//!
//! Probes never return errors: transport or gateway failures are mapped to
//! `OutcomeStatus::Failed` inside the probe. Timeouts belong to the probe
//! too; the dispatcher waits as long as a probe takes.

mod agent;
mod mock;

pub use agent::AgentProbe;
pub use mock::MockProbe;

use anyhow::Result;
use async_trait::async_trait;
use linkops_core::domain::outcome::OutcomeStatus;
use linkops_core::domain::run::ScriptInvocation;
use linkops_core::domain::target::Target;
use std::sync::Arc;

use crate::config::{Config, ProbeKind};

/// Capability that executes one script on one target
#[async_trait]
pub trait TargetProbe: Send + Sync {
    /// Runs `invocation` on `target` and reports its outcome
    async fn probe(&self, invocation: &ScriptInvocation, target: &Target) -> OutcomeStatus;
}

/// Builds the probe selected by the configuration
pub fn from_config(config: &Config) -> Result<Arc<dyn TargetProbe>> {
    let probe: Arc<dyn TargetProbe> = match config.probe {
        ProbeKind::Mock => Arc::new(MockProbe::from_config(config)),
        ProbeKind::Agent => Arc::new(AgentProbe::from_config(config)?),
    };
    Ok(probe)
}
