//! Offset/limit paging over any [`OperationInvoker`].

mod paginator;

pub use paginator::{collect_all, Paginator, DEFAULT_BATCH_SIZE, DEFAULT_RECORD_POINTER};
