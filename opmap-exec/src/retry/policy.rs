use std::time::Duration;

use crate::config::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY};

/// Which failures are eligible for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryOn {
    /// Every failure is retried until the attempt cap.
    #[default]
    All,
    /// Only failures reporting themselves as transient (network, timeout, 408, 429, 5xx).
    Transient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for every later one.
    pub initial_delay: Duration,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRY_COUNT,
            initial_delay: DEFAULT_RETRY_DELAY,
            retry_on: RetryOn::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            retry_on: RetryOn::All,
        }
    }

    pub fn with_retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sleep after the failed attempt with 0-based index `attempt`: `initial * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }
}
