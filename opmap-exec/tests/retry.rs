use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use opmap_core::HttpMethod;
use opmap_exec::retry::{decide_retry, run_with_retry, RetryDecision, RetryOn, RetryPolicy, RetryReason};
use opmap_exec::TransportError;
use tokio::time::Instant;

fn server_error() -> TransportError {
    TransportError::status_error(503, HttpMethod::Get, "https://x/api", "busy")
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_exactly_retry_count_failures() {
    let policy = RetryPolicy::new(3, Duration::from_secs(2));
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let out = run_with_retry(&policy, |attempt| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(n, attempt);
        async move {
            if n < 3 {
                Err(server_error())
            } else {
                Ok("done")
            }
        }
    })
    .await;

    assert_eq!(out.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    // 2 + 4 + 8
    assert_eq!(started.elapsed(), Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn returns_original_error_after_all_attempts() {
    let policy = RetryPolicy::new(2, Duration::from_millis(500));
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let err = run_with_retry(&policy, |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { Err::<(), _>(TransportError::Network(format!("refused #{n}"))) }
    })
    .await
    .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err, TransportError::Network("refused #2".to_string()));
    assert_eq!(started.elapsed(), Duration::from_millis(500 + 1000));
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_one_attempt() {
    let policy = RetryPolicy::new(0, Duration::from_secs(5));
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let res = run_with_retry(&policy, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(TransportError::Timeout) }
    })
    .await;

    assert!(res.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn transient_policy_stops_on_client_errors() {
    let policy = RetryPolicy::new(3, Duration::from_secs(1)).with_retry_on(RetryOn::Transient);
    let calls = AtomicU32::new(0);

    let err = run_with_retry(&policy, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async {
            Err::<(), _>(TransportError::status_error(
                404,
                HttpMethod::Get,
                "https://x/api",
                "missing",
            ))
        }
    })
    .await
    .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(err.status(), Some(404));
}

#[test]
fn default_policy_retries_everything() {
    let policy = RetryPolicy::default();
    let not_found = TransportError::status_error(404, HttpMethod::Get, "u", "");
    assert_eq!(
        decide_retry(&policy, 0, &not_found),
        RetryDecision::RetryAfter {
            delay: Duration::from_secs(2),
            reason: RetryReason::Backoff
        }
    );
    assert_eq!(
        decide_retry(&policy, 3, &not_found),
        RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted
        }
    );
}

#[test]
fn backoff_doubles() {
    let policy = RetryPolicy::new(5, Duration::from_millis(100));
    let delays: Vec<_> = (0..4).map(|i| policy.delay_for(i).as_millis()).collect();
    assert_eq!(delays, vec![100, 200, 400, 800]);
    assert_eq!(policy.total_attempts(), 6);
}
