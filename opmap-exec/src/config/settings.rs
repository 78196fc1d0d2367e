//! Process-wide key/value settings addressed by dot paths (`Defaults.RetryCount`).
//!
//! The document is a JSON object. A file-backed instance persists every `set`/`remove`
//! immediately by writing a sibling temp file and renaming it over the original.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::config::defaults::keys;
use crate::config::ConfigError;

#[derive(Debug)]
pub struct Settings {
    path: Option<PathBuf>,
    doc: RwLock<JsonValue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Settings {
    pub fn in_memory() -> Self {
        Self::from_value(JsonValue::Object(serde_json::Map::new()))
    }

    pub fn from_value(doc: JsonValue) -> Self {
        let doc = if doc.is_object() {
            doc
        } else {
            JsonValue::Object(serde_json::Map::new())
        };
        Self {
            path: None,
            doc: RwLock::new(doc),
        }
    }

    /// Open a file-backed store. A missing file is an empty document; it is created on
    /// the first write.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => JsonValue::Object(serde_json::Map::new()),
            Ok(content) => {
                let v: JsonValue =
                    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                if !v.is_object() {
                    return Err(ConfigError::Invalid {
                        key: path.display().to_string(),
                        expected: "a JSON object at the top level",
                    });
                }
                v
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                JsonValue::Object(serde_json::Map::new())
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Ok(Self {
            path: Some(path),
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<JsonValue> {
        let doc = self.read();
        let mut cur = &*doc;
        for seg in key.split('.') {
            cur = cur.as_object()?.get(seg)?;
        }
        Some(cur.clone())
    }

    /// String form of a scalar setting; empty strings count as unset.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            JsonValue::String(s) if s.trim().is_empty() => None,
            JsonValue::String(s) => Some(s),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn set(&self, key: &str, value: JsonValue) -> Result<(), ConfigError> {
        let segments = split_key(key)?;
        {
            let mut doc = self.write();
            let mut cur = &mut *doc;
            for (i, seg) in segments[..segments.len() - 1].iter().enumerate() {
                let map = cur.as_object_mut().ok_or_else(|| ConfigError::NotAMapping {
                    key: key.to_string(),
                    parent: segments[..i].join("."),
                })?;
                cur = map
                    .entry(seg.to_string())
                    .or_insert_with(|| JsonValue::Object(serde_json::Map::new()));
            }
            let parent = segments[..segments.len() - 1].join(".");
            let map = cur.as_object_mut().ok_or_else(|| ConfigError::NotAMapping {
                key: key.to_string(),
                parent,
            })?;
            map.insert(segments[segments.len() - 1].to_string(), value);
        }
        self.save()
    }

    pub fn remove(&self, key: &str) -> Result<Option<JsonValue>, ConfigError> {
        let segments = split_key(key)?;
        let removed = {
            let mut doc = self.write();
            let mut cur = Some(&mut *doc);
            for seg in &segments[..segments.len() - 1] {
                cur = cur
                    .and_then(|v| v.as_object_mut())
                    .and_then(|m| m.get_mut(*seg));
            }
            cur.and_then(|v| v.as_object_mut())
                .and_then(|m| m.remove(segments[segments.len() - 1]))
        };
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn snapshot(&self) -> JsonValue {
        self.read().clone()
    }

    /// Write the document to its backing file; a no-op for in-memory settings.
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let body = serde_json::to_string_pretty(&*self.read()).map_err(|e| ConfigError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.clone(),
            message: e.to_string(),
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, body).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    /// The configured instance root, checked to be an absolute http(s) URI. Returned
    /// exactly as stored since request URIs are built by concatenation.
    pub fn instance_base_uri(&self) -> Result<String, ConfigError> {
        let raw = self
            .get_str(keys::INSTANCE_BASE_URI)
            .ok_or(ConfigError::MissingBaseUri)?;
        match url::Url::parse(&raw) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => Ok(raw),
            _ => Err(ConfigError::Invalid {
                key: keys::INSTANCE_BASE_URI.to_string(),
                expected: "an absolute http(s) URI",
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.get_str(keys::TOKEN)
    }

    pub fn default_limit(&self) -> Option<JsonValue> {
        match self.get(keys::DEFAULT_LIMIT)? {
            JsonValue::Null => None,
            JsonValue::String(s) if s.trim().is_empty() => None,
            v => Some(v),
        }
    }

    pub fn retry_count(&self) -> Result<Option<u32>, ConfigError> {
        self.get_u64(keys::RETRY_COUNT)?
            .map(|n| {
                u32::try_from(n).map_err(|_| ConfigError::Invalid {
                    key: keys::RETRY_COUNT.to_string(),
                    expected: "a non-negative integer",
                })
            })
            .transpose()
    }

    pub fn retry_delay(&self) -> Result<Option<Duration>, ConfigError> {
        self.get_secs(keys::RETRY_DELAY_SEC)
    }

    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        self.get_secs(keys::TIMEOUT_SEC)
    }

    fn get_u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        let invalid = || ConfigError::Invalid {
            key: key.to_string(),
            expected: "a non-negative integer",
        };
        match self.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::Number(n)) => n.as_u64().map(Some).ok_or_else(invalid),
            Some(JsonValue::String(s)) => s.trim().parse::<u64>().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    fn get_secs(&self, key: &str) -> Result<Option<Duration>, ConfigError> {
        let invalid = || ConfigError::Invalid {
            key: key.to_string(),
            expected: "a non-negative number of seconds",
        };
        let secs = match self.get(key) {
            None | Some(JsonValue::Null) => return Ok(None),
            Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(invalid)?,
            Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
        };
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| invalid())
    }

    fn read(&self) -> RwLockReadGuard<'_, JsonValue> {
        self.doc.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, JsonValue> {
        self.doc.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    Ok(segments)
}
