use std::path::PathBuf;

use clap::Subcommand;

use crate::args::CallArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one operation and print the decoded response.
    Invoke {
        key: String,
        #[command(flatten)]
        call: CallArgs,
        /// Print only the `result` member of the response.
        #[arg(long)]
        unwrap: bool,
        /// Print metrics for the call to stderr.
        #[arg(long)]
        metrics: bool,
        /// Print the request that would be sent and exit.
        #[arg(long)]
        dry_run: bool,
    },
    /// Page through an operation, one JSON record per line.
    Paginate {
        key: String,
        #[command(flatten)]
        call: CallArgs,
        #[arg(long, default_value_t = opmap_exec::paginate::DEFAULT_BATCH_SIZE)]
        batch_size: u64,
        /// Stop after this many records; 0 means no limit.
        #[arg(long)]
        max_records: Option<u64>,
        /// JSON pointer to the record array in each response.
        #[arg(long, default_value = opmap_exec::paginate::DEFAULT_RECORD_POINTER)]
        records: String,
    },
    /// List the operations in the map.
    Operations,
    /// Parse and validate an operation map.
    Validate {
        /// Defaults to the configured map.
        path: Option<PathBuf>,
    },
    /// Manage the API token.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
    /// Read and write settings by dot-path key.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a token; read from stdin when omitted.
    Set { token: Option<String> },
    Remove,
    /// Show which source supplies the token.
    Status,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print one key, or the whole document.
    Get { key: Option<String> },
    /// VALUE is parsed as JSON when possible, otherwise stored as a string.
    Set { key: String, value: String },
    Unset { key: String },
}
