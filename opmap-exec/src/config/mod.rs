mod defaults;
mod error;
mod settings;

pub use defaults::{keys, DEFAULT_LIMIT_PARAM, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, OFFSET_PARAM};
pub use error::ConfigError;
pub use settings::Settings;
