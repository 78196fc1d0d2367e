#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(
        "no API token found; provide one of: the secret `{secret_name}` in the secret store, \
         the environment variable `{env_var}`, or the `{config_key}` setting (stored in plain text, not secure)"
    )]
    TokenNotFound {
        secret_name: String,
        env_var: String,
        config_key: String,
    },
    #[error("failed to store token: {0}")]
    Store(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("invalid secret name `{0}`")]
    InvalidName(String),
    #[error("secret store error for `{name}`: {message}")]
    Store { name: String, message: String },
}

impl SecretError {
    pub fn store(name: &str, message: impl Into<String>) -> Self {
        Self::Store {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
