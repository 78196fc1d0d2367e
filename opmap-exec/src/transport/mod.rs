mod error;
mod reqwest_client;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use opmap_core::HttpMethod;
use serde_json::Value as JsonValue;

pub use error::TransportError;
pub use reqwest_client::ReqwestTransport;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Sent as `application/json` when present.
    pub body: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// Decoded JSON body; `Null` for an empty body.
    pub body: JsonValue,
}

/// Sends one request. Implementations fail on network errors and on non-2xx statuses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError>;
}
