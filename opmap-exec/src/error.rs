use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::registry::{LoadError, LookupError};
use crate::transport::TransportError;

/// Everything a dispatch can fail with. Only `Transport` is ever retried.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DispatchError {
    /// Stable label for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Lookup(_) => "lookup",
            DispatchError::Load(_) => "load",
            DispatchError::Config(_) => "config",
            DispatchError::Auth(_) => "auth",
            DispatchError::Transport(_) => "transport",
        }
    }

    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            DispatchError::Transport(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the final failed attempt, when there was one.
    pub fn status(&self) -> Option<u16> {
        self.as_transport().and_then(TransportError::status)
    }
}
