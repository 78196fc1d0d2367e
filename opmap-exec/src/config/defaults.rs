use std::time::Duration;

pub const DEFAULT_RETRY_COUNT: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Query parameter carrying the page size; also the key the configured default limit fills.
pub const DEFAULT_LIMIT_PARAM: &str = "sysparm_limit";
/// Query parameter carrying the page offset.
pub const OFFSET_PARAM: &str = "sysparm_offset";

/// Dot-path keys read from [`crate::config::Settings`].
pub mod keys {
    pub const INSTANCE_BASE_URI: &str = "InstanceBaseUri";
    pub const TOKEN: &str = "Token";
    pub const DEFAULT_LIMIT: &str = "Defaults.sysparm_limit";
    pub const RETRY_COUNT: &str = "Defaults.RetryCount";
    pub const RETRY_DELAY_SEC: &str = "Defaults.RetryDelaySec";
    pub const TIMEOUT_SEC: &str = "Defaults.TimeoutSec";
}
