use std::time::Duration;

use crate::error::DispatchError;
use crate::retry::{RetryOn, RetryPolicy};
use crate::transport::TransportError;

/// Errors that can say whether a later attempt might succeed.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for TransportError {
    fn is_transient(&self) -> bool {
        TransportError::is_transient(self)
    }
}

impl Retryable for DispatchError {
    fn is_transient(&self) -> bool {
        self.as_transport().is_some_and(TransportError::is_transient)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    AttemptsExhausted,
    NotRetryable,
    Backoff,
}

/// Decide what follows the failed attempt with 0-based index `attempt`.
pub fn decide_retry<E: Retryable + ?Sized>(policy: &RetryPolicy, attempt: u32, err: &E) -> RetryDecision {
    if attempt >= policy.max_retries {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }
    if policy.retry_on == RetryOn::Transient && !err.is_transient() {
        return RetryDecision::Stop {
            reason: RetryReason::NotRetryable,
        };
    }
    RetryDecision::RetryAfter {
        delay: policy.delay_for(attempt),
        reason: RetryReason::Backoff,
    }
}
