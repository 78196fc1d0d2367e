use std::fmt;
use std::path::PathBuf;

use crate::registry::LoadError;

/// Where the operation map comes from.
#[derive(Debug, Clone)]
pub enum MapSource {
    File(PathBuf),
    /// JSON or YAML text held in memory.
    Inline(String),
}

impl MapSource {
    pub(crate) async fn read(&self) -> Result<String, LoadError> {
        match self {
            MapSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Read {
                        path: path.clone(),
                        source,
                    })
            }
            MapSource::Inline(s) => Ok(s.clone()),
        }
    }
}

impl fmt::Display for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSource::File(path) => write!(f, "{}", path.display()),
            MapSource::Inline(_) => f.write_str("<inline>"),
        }
    }
}
