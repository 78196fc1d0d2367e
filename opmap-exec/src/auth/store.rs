use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::auth::{SecretError, SecretValue};

/// External credential storage consulted before the environment and settings.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// `Ok(None)` when the secret does not exist.
    async fn get(&self, name: &str) -> Result<Option<SecretValue>, SecretError>;

    async fn set(&self, name: &str, secret: &SecretValue) -> Result<(), SecretError>;

    /// Returns whether a secret was removed.
    async fn remove(&self, name: &str) -> Result<bool, SecretError>;
}

/// One file per secret under `base_dir`. Files are created owner-readable only on unix.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    pub base_dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SecretError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(SecretError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(name))
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, name: &str) -> Result<Option<SecretValue>, SecretError> {
        let path = self.path_for(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(SecretValue::new(s.trim_end_matches(['\r', '\n'])))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SecretError::store(name, e.to_string())),
        }
    }

    async fn set(&self, name: &str, secret: &SecretValue) -> Result<(), SecretError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| SecretError::store(name, e.to_string()))?;
        write_private(&path, secret.expose().as_bytes())
            .await
            .map_err(|e| SecretError::store(name, e.to_string()))
    }

    async fn remove(&self, name: &str) -> Result<bool, SecretError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SecretError::store(name, e.to_string())),
        }
    }
}

/// Created as 0600; an existing file with wider permissions is narrowed before the write.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut opts = tokio::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(0o600);
    let mut file = opts.open(path).await?;
    restrict_permissions(path).await?;
    file.write_all(contents).await?;
    file.flush().await
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
