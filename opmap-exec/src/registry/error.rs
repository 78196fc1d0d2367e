use std::path::PathBuf;

use opmap_core::MapError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("unknown operation `{key}`")]
    NotFound { key: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read operation map {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid operation map {origin}: {source}")]
    Invalid {
        origin: String,
        #[source]
        source: MapError,
    },
}
