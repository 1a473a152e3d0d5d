//! Runner configuration
//!
//! Defines which target probe the dispatcher runs against and how that
//! probe behaves: the simulated policy for the mock probe, and the gateway
//! connection settings for the agent probe.

use std::str::FromStr;
use std::time::Duration;

/// Which probe implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Simulated outcomes with a fixed success probability
    Mock,
    /// Script runs delegated to the agent gateway
    Agent,
}

impl FromStr for ProbeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ProbeKind::Mock),
            "agent" => Ok(ProbeKind::Agent),
            other => anyhow::bail!("unknown probe kind '{}' (expected 'mock' or 'agent')", other),
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::Mock => write!(f, "mock"),
            ProbeKind::Agent => write!(f, "agent"),
        }
    }
}

/// Runner configuration
///
/// The mock settings reproduce the dashboard's demo behaviour by default: an
/// 80% success draw after a 400 ms delay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Probe implementation
    pub probe: ProbeKind,

    /// Agent gateway base URL (e.g., "http://localhost:9090")
    pub agent_url: String,

    /// Request timeout for agent probe calls
    pub agent_timeout: Duration,

    /// Probability that a mock probe succeeds, in `[0, 1]`
    pub success_rate: f64,

    /// Base delay before a mock probe resolves
    pub probe_latency: Duration,

    /// Extra random delay, up to this amount, added to each mock probe
    pub probe_jitter: Duration,

    /// Seed for reproducible mock draws
    pub probe_seed: Option<u64>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            probe: ProbeKind::Mock,
            agent_url: "http://localhost:9090".to_string(),
            agent_timeout: Duration::from_secs(30),
            success_rate: 0.8,
            probe_latency: Duration::from_millis(400),
            probe_jitter: Duration::ZERO,
            probe_seed: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - LINKOPS_PROBE (mock | agent, default: mock)
    /// - LINKOPS_AGENT_URL (default: http://localhost:9090)
    /// - LINKOPS_AGENT_TIMEOUT (seconds, default: 30)
    /// - LINKOPS_SUCCESS_RATE (default: 0.8)
    /// - LINKOPS_PROBE_LATENCY_MS (default: 400)
    /// - LINKOPS_PROBE_JITTER_MS (default: 0)
    /// - LINKOPS_PROBE_SEED (default: unset)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup
    ///
    /// Unparsable numbers fall back to their defaults; an unknown probe kind is
    /// an error.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();

        let probe = match lookup("LINKOPS_PROBE") {
            Some(kind) => kind.parse()?,
            None => defaults.probe,
        };

        let agent_url = lookup("LINKOPS_AGENT_URL").unwrap_or(defaults.agent_url);

        let agent_timeout = lookup("LINKOPS_AGENT_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.agent_timeout);

        let success_rate = lookup("LINKOPS_SUCCESS_RATE")
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(defaults.success_rate);

        let probe_latency = lookup("LINKOPS_PROBE_LATENCY_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.probe_latency);

        let probe_jitter = lookup("LINKOPS_PROBE_JITTER_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.probe_jitter);

        let probe_seed = lookup("LINKOPS_PROBE_SEED").and_then(|s| s.parse::<u64>().ok());

        Ok(Self {
            probe,
            agent_url,
            agent_timeout,
            success_rate,
            probe_latency,
            probe_jitter,
            probe_seed,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.success_rate) {
            anyhow::bail!("success_rate must be between 0 and 1");
        }

        if self.probe == ProbeKind::Agent {
            if self.agent_url.is_empty() {
                anyhow::bail!("agent_url cannot be empty");
            }

            if !self.agent_url.starts_with("http://") && !self.agent_url.starts_with("https://") {
                anyhow::bail!("agent_url must start with http:// or https://");
            }

            if self.agent_timeout.is_zero() {
                anyhow::bail!("agent_timeout must be greater than 0");
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
