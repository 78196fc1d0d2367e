//! The dispatch engine: resolve an operation key, build the request, send it under the
//! retry policy and report every attempt to metrics and the event sink.

mod dispatcher;
pub mod events;
pub mod metrics;
mod redact;

pub use dispatcher::{unwrap_result, Dispatcher, OperationInvoker};
pub use events::{
    CompositeEventSink, Event, EventLevel, EventSink, NoOpEventSink, StdoutEventSink,
    TracingEventSink,
};
pub use metrics::{Metrics, MetricsSnapshot, OperationMetrics, Outcome};
pub use redact::{redact_headers, redact_request};
