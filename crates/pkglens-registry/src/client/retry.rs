//! Exponential backoff policy

use std::time::Duration;

use rand::Rng;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt, so `max_retries + 1` attempts in total
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each one after it
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to every delay
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    /// Disable retries entirely
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Deterministic part of the delay before retry `retry` (1-indexed)
    pub fn base_backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Delay before retry `retry` with the given jitter added
    pub fn backoff_delay(&self, retry: u32, jitter: Duration) -> Duration {
        self.base_backoff(retry).saturating_add(jitter)
    }

    /// Draw a jitter uniformly from `[0, max_jitter)`
    pub fn sample_jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }

    /// Total number of attempts a call may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
