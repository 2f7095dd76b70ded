//! Retry bound and pacing for optimistic updates
//!
//! Only generation conflicts are retried. The default policy reproduces the
//! plain bounded loop (three attempts, no delay); a base delay turns on
//! exponential backoff, optionally jittered.

use std::time::Duration;

use rand::Rng;
use timealign_domain::constants::DEFAULT_MAX_ATTEMPTS;
use timealign_domain::EngineConfig;

/// Attempt ceiling and inter-attempt delay for the update engine
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, backoff_base: Duration::ZERO, jitter: false }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts (at least one).
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), ..Self::default() }
    }

    /// Policy described by the engine section of the configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_attempts)
            .with_backoff(Duration::from_millis(config.backoff_base_ms))
            .with_jitter(config.jitter)
    }

    /// Base delay before the second attempt; doubles for each later one.
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Scale each delay by a random factor in `[0.5, 1.0]`.
    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt may start after `attempts_made`.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }

    /// Delay to wait before attempt number `attempt` (1-based). The first
    /// attempt never waits; later ones wait `base * 2^(attempt - 2)`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.backoff_base.is_zero() {
            return Duration::ZERO;
        }

        let shift = (attempt - 2).min(8);
        let delay = self.backoff_base.saturating_mul(1u32 << shift);

        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }
}
