use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::config::{ConfigError, Settings, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use crate::retry::{RetryOn, RetryPolicy};

/// Values for `{name}` placeholders, one map per call.
pub type CallParams = opmap_core::TemplateParams;

/// Per-call overrides. Unset fields fall back to settings, then to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Extra headers; replace same-named (case-insensitive) generated headers.
    pub headers: BTreeMap<String, String>,
    /// Extra query parameters; replace map-derived ones. `Null` removes a parameter.
    pub query: BTreeMap<String, JsonValue>,
    pub retry_count: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub timeout: Option<Duration>,
    /// Exact status a successful response must carry.
    pub expect_status: Option<u16>,
    pub retry_on: Option<RetryOn>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn retry_count(mut self, n: u32) -> Self {
        self.retry_count = Some(n);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expect_status = Some(status);
        self
    }

    pub fn retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = Some(retry_on);
        self
    }
}

/// Execution knobs after layering call options over settings and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveOptions {
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub expect_status: Option<u16>,
}

impl EffectiveOptions {
    pub fn resolve(options: &CallOptions, settings: &Settings) -> Result<Self, ConfigError> {
        let max_retries = match options.retry_count {
            Some(n) => n,
            None => settings.retry_count()?.unwrap_or(DEFAULT_RETRY_COUNT),
        };
        let initial_delay = match options.retry_delay {
            Some(d) => d,
            None => settings.retry_delay()?.unwrap_or(DEFAULT_RETRY_DELAY),
        };
        let timeout = match options.timeout {
            Some(t) => t,
            None => settings.timeout()?.unwrap_or(DEFAULT_TIMEOUT),
        };
        Ok(Self {
            retry: RetryPolicy::new(max_retries, initial_delay)
                .with_retry_on(options.retry_on.unwrap_or_default()),
            timeout,
            expect_status: options.expect_status,
        })
    }
}
