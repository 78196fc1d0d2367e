use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use opmap_exec::{CallOptions, CallParams, RetryOn};
use serde_json::Value as JsonValue;

use crate::output::OutputFormat;
use crate::utils::{parse_header, parse_kv, parse_secs};

#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    #[command(flatten)]
    pub output: OutputArgs,
    #[command(flatten)]
    pub paths: PathArgs,
    /// Where per-attempt events go.
    #[arg(long, value_enum, default_value_t = EventsMode::None, global = true)]
    pub events: EventsMode,
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PathArgs {
    /// Settings file.
    #[arg(long, env = "OPMAP_CONFIG", default_value = "opmap.json", global = true)]
    pub config: PathBuf,
    /// Operation map (JSON or YAML).
    #[arg(long, env = "OPMAP_OPERATIONS", default_value = "operations.json", global = true)]
    pub map: PathBuf,
    /// Directory-backed secret store; without it tokens come from the environment or settings.
    #[arg(long, env = "OPMAP_SECRETS_DIR", global = true)]
    pub secrets_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsMode {
    None,
    Stdout,
    Tracing,
}

#[derive(Debug, Args, Clone)]
pub struct CallArgs {
    /// Placeholder value.
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE", value_parser = parse_kv)]
    pub params: Vec<(String, JsonValue)>,
    /// Query parameter; overrides the map's query. `KEY=null` removes it.
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_kv)]
    pub query: Vec<(String, JsonValue)>,
    #[arg(long = "header", short = 'H', value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
    #[arg(long)]
    pub retry_count: Option<u32>,
    /// Initial backoff in seconds.
    #[arg(long, value_name = "SECS", value_parser = parse_secs)]
    pub retry_delay: Option<Duration>,
    /// Per-attempt timeout in seconds.
    #[arg(long, value_name = "SECS", value_parser = parse_secs)]
    pub timeout: Option<Duration>,
    #[arg(long, value_name = "CODE")]
    pub expect_status: Option<u16>,
    /// Retry only network errors, timeouts, 408, 429 and 5xx.
    #[arg(long)]
    pub transient_only: bool,
}

impl CallArgs {
    pub fn params(&self) -> CallParams {
        self.params.iter().cloned().collect()
    }

    pub fn options(&self) -> CallOptions {
        CallOptions {
            headers: self.headers.iter().cloned().collect(),
            query: self.query.iter().cloned().collect(),
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            timeout: self.timeout,
            expect_status: self.expect_status,
            retry_on: self.transient_only.then_some(RetryOn::Transient),
        }
    }
}
