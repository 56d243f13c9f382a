// -
// Watch

/// Wait index used when no revision has been observed for a key yet
/// ("block until any change since the beginning").
pub const SENTINEL_WAIT_INDEX: u64 = 1;

/// Single-slot hand-off between the watch loop and its consumer
pub(crate) const DEFAULT_WATCH_CHANNEL_CAPACITY: usize = 1;

// -
// Field tags

pub(crate) const TAG_DELIMITER: char = ':';

/// Tag option overriding the field's path segment
pub const TAG_OPTION_NAME: &str = "name";

/// Tag option providing the literal used when the key is absent
pub const TAG_OPTION_DEFAULT: &str = "default";

pub(crate) const ALLOWED_TAG_OPTIONS: [&str; 2] = [TAG_OPTION_NAME, TAG_OPTION_DEFAULT];

// -
// Service health checks

pub(crate) const DEFAULT_CHECK_TTL_MS: u64 = 3_000;
pub(crate) const DEFAULT_DEREGISTER_CRITICAL_AFTER_MS: u64 = 10_000;

// -
// Store

/// Upper bound a blocking fetch waits before answering with unchanged data
pub(crate) const DEFAULT_MAX_WAIT_MS: u64 = 5 * 60 * 1_000;

/// Prefix of environment variables overriding [`crate::ClientConfig`]
pub(crate) const ENV_PREFIX: &str = "KVFACADE";
