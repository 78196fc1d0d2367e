use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use opmap_core::{substitute, unresolved_placeholders, HttpMethod};
use serde_json::{json, Value as JsonValue};
use tokio::time::Instant;
use uuid::Uuid;

use crate::auth::AuthProvider;
use crate::config::Settings;
use crate::dispatch::events::{Event, EventLevel, EventSink, NoOpEventSink};
use crate::dispatch::metrics::{Metrics, Outcome};
use crate::dispatch::redact::redact_headers;
use crate::error::DispatchError;
use crate::registry::{OperationRegistry, ResolvedOperation};
use crate::request::{
    build_body, build_headers, build_uri, CallOptions, CallParams, EffectiveOptions,
};
use crate::retry::{decide_retry, run_with_retry, RetryDecision};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

const ACTION: &str = "invoke";

/// Anything that can run a named operation. The paginator drives this seam.
#[async_trait]
pub trait OperationInvoker: Send + Sync {
    async fn invoke(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<JsonValue, DispatchError>;
}

pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
    settings: Arc<Settings>,
    auth: Arc<AuthProvider>,
    transport: Arc<dyn Transport>,
    metrics: Arc<Metrics>,
    events: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<OperationRegistry>,
        settings: Arc<Settings>,
        auth: Arc<AuthProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            registry,
            settings,
            auth,
            transport,
            metrics: Arc::new(Metrics::new()),
            events: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Resolve `key` and assemble the request without sending it.
    pub async fn build_request(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<HttpRequest, DispatchError> {
        let op = self.registry.resolve(key).await?;
        self.build_resolved(&op, params, options).await
    }

    async fn build_resolved(
        &self,
        op: &ResolvedOperation,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<HttpRequest, DispatchError> {
        let def = &op.definition;
        let unresolved = unresolved_placeholders(&substitute(
            &json!({ "path": def.path, "query": def.query, "body": def.body }),
            params,
        ));
        if !unresolved.is_empty() {
            tracing::debug!(key = %op.key, ?unresolved, "placeholders left unresolved");
        }

        let url = build_uri(&self.settings, &op.base_path, def, params, options)?;
        let headers = build_headers(def, options, &self.auth).await?;
        Ok(HttpRequest {
            method: def.method,
            url,
            headers,
            body: build_body(def, params),
        })
    }

    /// Run the operation and return the decoded response body as is.
    ///
    /// Lookup and build failures return immediately, recorded as one failed attempt 0.
    /// Transport failures are retried per the effective policy and the last one is
    /// returned unchanged.
    pub async fn invoke(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<JsonValue, DispatchError> {
        let invocation_id = Uuid::new_v4();
        let started = Instant::now();

        let op = match self.registry.resolve(key).await {
            Ok(op) => op,
            Err(e) => return Err(self.abort(key, None, invocation_id, started, e).await),
        };
        let prepared = async {
            let effective = EffectiveOptions::resolve(options, &self.settings)?;
            let request = self.build_resolved(&op, params, options).await?;
            Ok::<_, DispatchError>((request, effective))
        }
        .await;
        let (request, effective) = match prepared {
            Ok(p) => p,
            Err(e) => {
                let method = Some(op.definition.method);
                return Err(self.abort(key, method, invocation_id, started, e).await);
            }
        };

        let (request, effective) = (&request, &effective);
        let response = run_with_retry(&effective.retry, move |attempt| {
            self.attempt(key, request, effective, invocation_id, attempt)
        })
        .await?;
        Ok(response.body)
    }

    /// [`invoke`](Self::invoke) followed by [`unwrap_result`].
    pub async fn invoke_result(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<JsonValue, DispatchError> {
        self.invoke(key, params, options).await.map(unwrap_result)
    }

    async fn attempt(
        &self,
        key: &str,
        request: &HttpRequest,
        effective: &EffectiveOptions,
        invocation_id: Uuid,
        attempt: u32,
    ) -> Result<HttpResponse, TransportError> {
        let started = Instant::now();
        let result = self
            .transport
            .send(request.clone(), effective.timeout)
            .await
            .and_then(|resp| check_status(resp, effective.expect_status));
        let elapsed = started.elapsed();

        let (outcome, level, http_status, error) = match &result {
            Ok(resp) => (Outcome::Success, EventLevel::Info, Some(resp.status), None),
            Err(e) => {
                let level = match decide_retry(&effective.retry, attempt, e) {
                    RetryDecision::RetryAfter { .. } => EventLevel::Warn,
                    RetryDecision::Stop { .. } => EventLevel::Error,
                };
                (Outcome::Error, level, e.status(), Some(e.to_string()))
            }
        };

        self.metrics.record(key, outcome, elapsed).await;
        self.events
            .emit(Event {
                timestamp: Utc::now(),
                level,
                action: ACTION.to_string(),
                invocation_id,
                key: key.to_string(),
                method: Some(request.method),
                uri: Some(request.url.clone()),
                attempt,
                duration_ms: millis(elapsed),
                http_status,
                error,
                headers: redact_headers(&request.headers),
            })
            .await;
        result
    }

    /// Record a failure that happened before anything was sent, then hand the error back.
    async fn abort(
        &self,
        key: &str,
        method: Option<HttpMethod>,
        invocation_id: Uuid,
        started: Instant,
        err: DispatchError,
    ) -> DispatchError {
        let elapsed = started.elapsed();
        self.metrics.record(key, Outcome::Error, elapsed).await;
        self.events
            .emit(Event {
                timestamp: Utc::now(),
                level: EventLevel::Error,
                action: ACTION.to_string(),
                invocation_id,
                key: key.to_string(),
                method,
                uri: None,
                attempt: 0,
                duration_ms: millis(elapsed),
                http_status: None,
                error: Some(err.to_string()),
                headers: BTreeMap::new(),
            })
            .await;
        err
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl OperationInvoker for Dispatcher {
    async fn invoke(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
    ) -> Result<JsonValue, DispatchError> {
        Dispatcher::invoke(self, key, params, options).await
    }
}

fn check_status(resp: HttpResponse, expected: Option<u16>) -> Result<HttpResponse, TransportError> {
    match expected {
        Some(expected) if expected != resp.status => Err(TransportError::UnexpectedStatus {
            expected,
            actual: resp.status,
        }),
        _ => Ok(resp),
    }
}

/// The `result` member of a response envelope; any other value is returned unchanged.
pub fn unwrap_result(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(JsonValue::Null)
        }
        other => other,
    }
}
