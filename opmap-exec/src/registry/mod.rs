mod error;
mod source;

use std::sync::Arc;

use opmap_core::{check_map, load_map_str, OperationDefinition, OperationsMap};
use tokio::sync::OnceCell;

use crate::error::DispatchError;

pub use error::{LoadError, LookupError};
pub use source::MapSource;

/// A definition resolved from the map together with the map-wide base path.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    pub key: String,
    pub base_path: String,
    pub definition: OperationDefinition,
}

/// Loads the operation map once and serves lookups from the cached copy.
///
/// Concurrent first calls share a single load. A failed load is not cached, so the
/// next call reads the source again.
pub struct OperationRegistry {
    source: MapSource,
    cache: OnceCell<Arc<OperationsMap>>,
}

impl OperationRegistry {
    pub fn new(source: MapSource) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    /// A registry whose map is already loaded; the source is never read.
    pub fn from_map(map: OperationsMap) -> Self {
        Self {
            source: MapSource::Inline(String::new()),
            cache: OnceCell::new_with(Some(Arc::new(map))),
        }
    }

    pub fn source(&self) -> &MapSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    pub async fn map(&self) -> Result<Arc<OperationsMap>, LoadError> {
        self.cache
            .get_or_try_init(|| async {
                let raw = self.source.read().await?;
                let map = load_map_str(&raw).map_err(|source| LoadError::Invalid {
                    origin: self.source.to_string(),
                    source,
                })?;
                for w in check_map(&map).warnings() {
                    tracing::warn!(source = %self.source, at = %w.path, "{}", w.message);
                }
                tracing::debug!(
                    source = %self.source,
                    operations = map.len(),
                    "operation map loaded"
                );
                Ok::<_, LoadError>(Arc::new(map))
            })
            .await
            .cloned()
    }

    pub async fn resolve(&self, key: &str) -> Result<ResolvedOperation, DispatchError> {
        let map = self.map().await?;
        let definition = map
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                key: key.to_string(),
            })?;
        Ok(ResolvedOperation {
            key: key.to_string(),
            base_path: map.base_path.clone(),
            definition,
        })
    }

    pub async fn keys(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.map().await?.keys().map(str::to_string).collect())
    }
}
