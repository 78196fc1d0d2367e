use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("instance base URI is not configured: set the `InstanceBaseUri` setting")]
    MissingBaseUri,
    #[error("invalid value for `{key}`: expected {expected}")]
    Invalid { key: String, expected: &'static str },
    #[error("invalid settings key `{0}`")]
    InvalidKey(String),
    #[error("cannot set `{key}`: `{parent}` is not a mapping")]
    NotAMapping { key: String, parent: String },
    #[error("failed to read settings {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}
