mod decision;
mod executor;
mod policy;

pub use decision::{decide_retry, RetryDecision, RetryReason, Retryable};
pub use executor::run_with_retry;
pub use policy::{RetryOn, RetryPolicy};
