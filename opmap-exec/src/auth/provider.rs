use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::auth::{AuthError, SecretStore, SecretValue};
use crate::config::{keys, Settings};

pub const TOKEN_ENV_VAR: &str = "OPMAP_TOKEN";
pub const TOKEN_SECRET_NAME: &str = "opmap-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    SecretStore,
    Environment,
    Settings,
}

/// Resolves the bearer token from, in order: the secret store, the environment, settings.
pub struct AuthProvider {
    secrets: Option<Arc<dyn SecretStore>>,
    settings: Arc<Settings>,
    env_var: String,
    secret_name: String,
}

impl AuthProvider {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            secrets: None,
            settings,
            env_var: TOKEN_ENV_VAR.to_string(),
            secret_name: TOKEN_SECRET_NAME.to_string(),
        }
    }

    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secrets = Some(store);
        self
    }

    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn with_secret_name(mut self, name: impl Into<String>) -> Self {
        self.secret_name = name.into();
        self
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    pub async fn get_token(&self) -> Result<SecretValue, AuthError> {
        self.resolve().await.map(|(token, _)| token)
    }

    /// Which link of the chain currently supplies the token.
    pub async fn token_source(&self) -> Option<TokenSource> {
        self.resolve().await.ok().map(|(_, source)| source)
    }

    pub async fn resolve(&self) -> Result<(SecretValue, TokenSource), AuthError> {
        if let Some(store) = &self.secrets {
            match store.get(&self.secret_name).await {
                Ok(Some(v)) if !v.is_blank() => return Ok((v, TokenSource::SecretStore)),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "secret store lookup failed; trying environment");
                }
            }
        }

        if let Ok(v) = std::env::var(&self.env_var) {
            if !v.trim().is_empty() {
                return Ok((SecretValue::new(v), TokenSource::Environment));
            }
        }

        if let Some(v) = self.settings.token() {
            return Ok((SecretValue::new(v), TokenSource::Settings));
        }

        Err(AuthError::TokenNotFound {
            secret_name: self.secret_name.clone(),
            env_var: self.env_var.clone(),
            config_key: keys::TOKEN.to_string(),
        })
    }

    /// Store a token, preferring the secret store. Falling back to settings keeps the
    /// token in plain text and logs a warning.
    pub async fn set_token(&self, token: SecretValue) -> Result<TokenSource, AuthError> {
        if token.is_blank() {
            return Err(AuthError::Store("token must not be empty".to_string()));
        }
        match &self.secrets {
            Some(store) => match store.set(&self.secret_name, &token).await {
                Ok(()) => return Ok(TokenSource::SecretStore),
                Err(e) => tracing::warn!(
                    error = %e,
                    "secret store unavailable; storing token in settings as plain text (not secure)"
                ),
            },
            None => tracing::warn!(
                "no secret store configured; storing token in settings as plain text (not secure)"
            ),
        }

        self.settings
            .set(keys::TOKEN, JsonValue::String(token.expose().to_string()))
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(TokenSource::Settings)
    }

    /// Remove the stored token from the secret store and from settings. Returns the
    /// locations a token was actually removed from.
    pub async fn remove_token(&self) -> Result<Vec<TokenSource>, AuthError> {
        let mut removed = Vec::new();
        if let Some(store) = &self.secrets {
            match store.remove(&self.secret_name).await {
                Ok(true) => removed.push(TokenSource::SecretStore),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "failed to remove token from secret store"),
            }
        }

        let from_settings = self
            .settings
            .remove(keys::TOKEN)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        if from_settings.is_some() {
            removed.push(TokenSource::Settings);
        }

        if std::env::var(&self.env_var).is_ok_and(|v| !v.trim().is_empty()) {
            tracing::warn!(
                env_var = %self.env_var,
                "a token is still supplied through the environment"
            );
        }
        Ok(removed)
    }
}
