#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod paginate;
pub mod registry;
pub mod request;
pub mod retry;
pub mod transport;

pub use crate::auth::{AuthError, AuthProvider, FileSecretStore, SecretStore, SecretValue, TokenSource};
pub use crate::config::{ConfigError, Settings};
pub use crate::dispatch::{
    redact_request, unwrap_result, Dispatcher, Event, EventSink, Metrics, MetricsSnapshot,
    OperationInvoker,
};
pub use crate::error::DispatchError;
pub use crate::paginate::{collect_all, Paginator};
pub use crate::registry::{MapSource, OperationRegistry};
pub use crate::request::{CallOptions, CallParams};
pub use crate::retry::{RetryOn, RetryPolicy};
pub use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
