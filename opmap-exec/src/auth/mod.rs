mod error;
mod provider;
mod store;
mod value;

pub use error::{AuthError, SecretError};
pub use provider::{AuthProvider, TokenSource, TOKEN_ENV_VAR, TOKEN_SECRET_NAME};
pub use store::{FileSecretStore, SecretStore};
pub use value::SecretValue;
