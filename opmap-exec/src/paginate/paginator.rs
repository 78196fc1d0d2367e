use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::{json, Value as JsonValue};

use crate::config::{DEFAULT_LIMIT_PARAM, OFFSET_PARAM};
use crate::dispatch::OperationInvoker;
use crate::error::DispatchError;
use crate::request::{CallOptions, CallParams};

pub const DEFAULT_BATCH_SIZE: u64 = 100;
/// JSON pointer to the record array inside each response.
pub const DEFAULT_RECORD_POINTER: &str = "/result";

/// Drives an invoker round by round, advancing `sysparm_offset` by the number of
/// records actually returned.
pub struct Paginator<'a> {
    invoker: &'a dyn OperationInvoker,
    record_pointer: String,
}

#[derive(Debug, Default)]
struct PagingState {
    offset: u64,
    total_fetched: u64,
    has_more: bool,
    rounds: u32,
    buffer: VecDeque<JsonValue>,
}

struct Cursor<'a> {
    invoker: &'a dyn OperationInvoker,
    record_pointer: String,
    key: String,
    params: CallParams,
    options: CallOptions,
    batch_size: u64,
    max_records: Option<u64>,
    state: PagingState,
}

impl<'a> Paginator<'a> {
    pub fn new(invoker: &'a dyn OperationInvoker) -> Self {
        Self {
            invoker,
            record_pointer: DEFAULT_RECORD_POINTER.to_string(),
        }
    }

    pub fn with_record_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.record_pointer = pointer.into();
        self
    }

    /// Lazy, single-pass stream of records.
    ///
    /// `max_records` of `None` or `0` means unbounded. A `batch_size` of 0 is treated
    /// as 1. The first error is yielded and ends the stream.
    pub fn paginate(
        &self,
        key: &str,
        params: &CallParams,
        options: &CallOptions,
        batch_size: u64,
        max_records: Option<u64>,
    ) -> BoxStream<'a, Result<JsonValue, DispatchError>> {
        let cursor = Cursor {
            invoker: self.invoker,
            record_pointer: self.record_pointer.clone(),
            key: key.to_string(),
            params: params.clone(),
            options: options.clone(),
            batch_size: batch_size.max(1),
            max_records: max_records.filter(|m| *m > 0),
            state: PagingState {
                has_more: true,
                ..PagingState::default()
            },
        };
        stream::unfold(cursor, |mut cursor| async move {
            let item = cursor.next_record().await?;
            Some((item, cursor))
        })
        .boxed()
    }
}

impl Cursor<'_> {
    async fn next_record(&mut self) -> Option<Result<JsonValue, DispatchError>> {
        loop {
            if let Some(record) = self.state.buffer.pop_front() {
                return Some(Ok(record));
            }
            if !self.state.has_more {
                return None;
            }
            if let Err(e) = self.fetch_round().await {
                self.state.has_more = false;
                return Some(Err(e));
            }
        }
    }

    fn next_batch(&self) -> u64 {
        match self.max_records {
            Some(max) => self.batch_size.min(max.saturating_sub(self.state.total_fetched)),
            None => self.batch_size,
        }
    }

    async fn fetch_round(&mut self) -> Result<(), DispatchError> {
        let batch = self.next_batch();
        if batch == 0 {
            self.state.has_more = false;
            return Ok(());
        }

        let mut options = self.options.clone();
        options
            .query
            .insert(OFFSET_PARAM.to_string(), json!(self.state.offset));
        options
            .query
            .insert(DEFAULT_LIMIT_PARAM.to_string(), json!(batch));

        let mut response = self.invoker.invoke(&self.key, &self.params, &options).await?;
        self.state.rounds += 1;

        let mut records = match response.pointer_mut(&self.record_pointer).map(JsonValue::take) {
            Some(JsonValue::Array(records)) => records,
            _ => {
                tracing::debug!(
                    key = %self.key,
                    pointer = %self.record_pointer,
                    round = self.state.rounds,
                    "response has no record array; end of data"
                );
                self.state.has_more = false;
                return Ok(());
            }
        };
        records.truncate(usize::try_from(batch).unwrap_or(usize::MAX));

        let count = records.len() as u64;
        self.state.offset += count;
        self.state.total_fetched += count;
        if count < batch
            || self
                .max_records
                .is_some_and(|max| self.state.total_fetched >= max)
        {
            self.state.has_more = false;
        }
        tracing::debug!(
            key = %self.key,
            round = self.state.rounds,
            requested = batch,
            received = count,
            total = self.state.total_fetched,
            "page fetched"
        );
        self.state.buffer.extend(records);
        Ok(())
    }
}

/// Drain a paging stream, stopping at the first error.
pub async fn collect_all(
    stream: BoxStream<'_, Result<JsonValue, DispatchError>>,
) -> Result<Vec<JsonValue>, DispatchError> {
    stream.try_collect().await
}
