use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;

/// Outcome tag attached to each recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationMetrics {
    pub count: u64,
    pub total_duration_ms: u64,
    pub succeeded: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub total_duration_ms: u64,
    pub per_operation: BTreeMap<String, OperationMetrics>,
}

impl MetricsSnapshot {
    fn record(&mut self, key: &str, outcome: Outcome, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.request_count += 1;
        self.total_duration_ms = self.total_duration_ms.saturating_add(ms);

        let op = self.per_operation.entry(key.to_string()).or_default();
        op.count += 1;
        op.total_duration_ms = op.total_duration_ms.saturating_add(ms);
        match outcome {
            Outcome::Success => op.succeeded += 1,
            Outcome::Error => op.failed += 1,
        }
    }

    pub fn operation(&self, key: &str) -> Option<&OperationMetrics> {
        self.per_operation.get(key)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Aggregate counters shared by every dispatcher that holds the same instance.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, key: &str, outcome: Outcome, duration: Duration) {
        self.inner.lock().await.record(key, outcome, duration);
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().await.clone()
    }

    pub async fn reset(&self) {
        *self.inner.lock().await = MetricsSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_success_and_failure_per_key() {
        let m = Metrics::new();
        m.record("Incident.Get", Outcome::Success, Duration::from_millis(10)).await;
        m.record("Incident.Get", Outcome::Error, Duration::from_millis(5)).await;
        m.record("Change.Update", Outcome::Success, Duration::from_millis(1)).await;

        let snap = m.snapshot().await;
        assert_eq!(snap.request_count, 3);
        assert_eq!(snap.total_duration_ms, 16);
        let inc = snap.operation("Incident.Get").unwrap();
        assert_eq!((inc.count, inc.succeeded, inc.failed), (2, 1, 1));
        assert_eq!(inc.total_duration_ms, 15);
    }

    #[tokio::test]
    async fn reset_zeroes_everything() {
        let m = Metrics::new();
        m.record("a", Outcome::Success, Duration::from_millis(3)).await;
        m.reset().await;
        assert_eq!(m.snapshot().await, MetricsSnapshot::default());
    }

    #[test]
    fn json_shape() {
        let mut s = MetricsSnapshot::default();
        s.record("a", Outcome::Error, Duration::from_millis(7));
        assert_eq!(
            s.to_json(),
            serde_json::json!({
                "request_count": 1,
                "total_duration_ms": 7,
                "per_operation": {
                    "a": {"count": 1, "total_duration_ms": 7, "succeeded": 0, "failed": 1}
                }
            })
        );
    }
}
