use std::fmt::Display;
use std::future::Future;

use crate::retry::{decide_retry, RetryDecision, Retryable, RetryPolicy};

/// Run `action` until it succeeds or the policy gives up, then return the last error as is.
///
/// `action` receives the 0-based attempt index. Attempts are sequential; the only
/// suspension points are the action itself and the backoff sleep.
pub async fn run_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut action: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut attempt = 0u32;
    loop {
        let err = match action(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        match decide_retry(policy, attempt, &err) {
            RetryDecision::Stop { reason } => {
                tracing::debug!(
                    attempt,
                    max_attempts = policy.total_attempts(),
                    ?reason,
                    error = %err,
                    "giving up"
                );
                return Err(err);
            }
            RetryDecision::RetryAfter { delay, .. } => {
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed; retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
