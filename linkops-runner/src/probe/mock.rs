//! Simulated probe
//!
//! Stand-in used for demos and tests: each call sleeps for the configured
//! latency (plus optional jitter) and then draws success with a fixed
//! probability.

use async_trait::async_trait;
use linkops_core::domain::outcome::OutcomeStatus;
use linkops_core::domain::run::ScriptInvocation;
use linkops_core::domain::target::Target;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::TargetProbe;
use crate::config::Config;

/// Probe with a fixed success probability and configurable timing
pub struct MockProbe {
    success_rate: f64,
    latency: Duration,
    jitter: Duration,
    rng: Mutex<StdRng>,
}

impl MockProbe {
    /// Creates a mock probe that resolves immediately
    ///
    /// # Arguments
    /// * `success_rate` - Probability of success, clamped to `[0, 1]`
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Mock probe following the runner configuration
    pub fn from_config(config: &Config) -> Self {
        let probe = Self::new(config.success_rate)
            .with_latency(config.probe_latency)
            .with_jitter(config.probe_jitter);

        match config.probe_seed {
            Some(seed) => probe.with_seed(seed),
            None => probe,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Makes the sequence of draws reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Draws the outcome and the delay for one call
    fn draw(&self) -> (OutcomeStatus, Duration) {
        let mut rng = self.rng.lock().unwrap();

        let success = rng.gen_bool(self.success_rate);
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms > 0 {
            Duration::from_millis(rng.gen_range(0..=jitter_ms))
        } else {
            Duration::ZERO
        };

        (OutcomeStatus::from(success), self.latency + extra)
    }
}

#[async_trait]
impl TargetProbe for MockProbe {
    async fn probe(&self, invocation: &ScriptInvocation, target: &Target) -> OutcomeStatus {
        let (status, delay) = self.draw();

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        debug!(
            "Mock probe {} on {}: {}",
            invocation.script.id, target.id, status
        );
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkops_core::domain::script::Script;

    fn invocation() -> ScriptInvocation {
        ScriptInvocation::new(Script::new("baseline", "Baseline Check", ["--verbose"]))
    }

    #[tokio::test]
    async fn test_always_succeeds() {
        let probe = MockProbe::new(1.0);
        for n in 0..20 {
            let target = Target::new(format!("vm-{}", n), format!("vm-{}", n));
            assert_eq!(
                probe.probe(&invocation(), &target).await,
                OutcomeStatus::Succeeded
            );
        }
    }

    #[tokio::test]
    async fn test_always_fails() {
        let probe = MockProbe::new(0.0);
        let target = Target::new("vm-1", "vm-1");
        assert_eq!(probe.probe(&invocation(), &target).await, OutcomeStatus::Failed);
    }

    #[test]
    fn test_success_rate_is_clamped() {
        assert_eq!(MockProbe::new(7.0).success_rate, 1.0);
        assert_eq!(MockProbe::new(-1.0).success_rate, 0.0);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let a = MockProbe::new(0.5)
            .with_jitter(Duration::from_millis(50))
            .with_seed(7);
        let b = MockProbe::new(0.5)
            .with_jitter(Duration::from_millis(50))
            .with_seed(7);

        let first: Vec<_> = (0..16).map(|_| a.draw()).collect();
        let second: Vec<_> = (0..16).map(|_| b.draw()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_delay_stays_within_jitter() {
        let probe = MockProbe::new(0.8)
            .with_latency(Duration::from_millis(100))
            .with_jitter(Duration::from_millis(20))
            .with_seed(1);

        for _ in 0..32 {
            let (_, delay) = probe.draw();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(120));
        }
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let probe = MockProbe::new(1.0).with_latency(Duration::from_millis(30));
        let started = std::time::Instant::now();
        probe.probe(&invocation(), &Target::new("vm-1", "vm-1")).await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
