use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use opmap_core::HttpMethod;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EventLevel::Info => "info",
            EventLevel::Warn => "warn",
            EventLevel::Error => "error",
        }
    }
}

/// One structured entry per dispatch attempt. An invocation that fails before its
/// first attempt gets a single entry at attempt 0, without a URI and, when the key
/// did not resolve, without a method.
#[derive(Debug, Clone)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub action: String,
    pub invocation_id: Uuid,
    pub key: String,
    pub method: Option<HttpMethod>,
    pub uri: Option<String>,
    /// 0-based.
    pub attempt: u32,
    pub duration_ms: u64,
    pub http_status: Option<u16>,
    pub error: Option<String>,
    /// Request headers with credentials redacted.
    pub headers: BTreeMap<String, String>,
}

impl Event {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "action": self.action,
            "invocation_id": self.invocation_id.to_string(),
            "key": self.key,
            "method": self.method.map(|m| m.as_str()),
            "uri": self.uri,
            "attempt": self.attempt,
            "duration_ms": self.duration_ms,
            "http_status": self.http_status,
            "error": self.error,
            "headers": self.headers,
        })
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.add(sink);
        self
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes each event as a single JSON line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to the `tracing` subscriber at the event's level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        let method = event.method.map_or("-", |m| m.as_str());
        let uri = event.uri.as_deref().unwrap_or("-");
        macro_rules! log_event {
            ($mac:ident) => {
                tracing::$mac!(
                    action = %event.action,
                    invocation_id = %event.invocation_id,
                    key = %event.key,
                    method,
                    uri,
                    attempt = event.attempt,
                    duration_ms = event.duration_ms,
                    http_status = ?event.http_status,
                    error = ?event.error,
                    "operation attempt"
                )
            };
        }
        match event.level {
            EventLevel::Info => log_event!(info),
            EventLevel::Warn => log_event!(warn),
            EventLevel::Error => log_event!(error),
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
