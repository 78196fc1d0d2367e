use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use opmap_core::HttpMethod;
use serde_json::Value as JsonValue;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("opmap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let mut rb = self
            .client
            .request(to_reqwest_method(req.method), &req.url)
            .timeout(timeout);

        for (k, v) in &req.headers {
            rb = rb.header(k, v);
        }
        if let Some(body) = &req.body {
            rb = rb.json(body);
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let bytes = resp.bytes().await.map_err(map_reqwest_error)?;
        if !(200..300).contains(&status) {
            return Err(TransportError::status_error(
                status,
                req.method,
                req.url,
                &String::from_utf8_lossy(&bytes),
            ));
        }

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        return TransportError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return TransportError::Network(e.to_string());
    }
    TransportError::Other(e.to_string())
}
