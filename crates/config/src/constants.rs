//! Centralized constants for the esmaint workspace.
//!
//! Default values used across crates to avoid magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
///
/// Opening an index waits for all shards to become active, so this is
/// considerably longer than a typical REST timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for throttled requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed number of retries for throttled requests.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Maintenance Defaults
// =============================================================================

/// Interval between active shard recovery polls, in seconds.
pub const DEFAULT_RECOVERY_POLL_SECS: u64 = 5;

/// Width of the `YYYY-MM-DD` suffix carried by dated index names.
pub const INDEX_DATE_SUFFIX_LEN: usize = 10;

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the configuration file location.
pub const ENV_CONFIG_PATH: &str = "ESMAINT_CONFIG_PATH";

/// Overrides `elasticsearch.url`.
pub const ENV_ES_URL: &str = "ESMAINT_ES_URL";

/// Overrides `elasticsearch.username`.
pub const ENV_ES_USERNAME: &str = "ESMAINT_ES_USERNAME";

/// Overrides `elasticsearch.password`.
pub const ENV_ES_PASSWORD: &str = "ESMAINT_ES_PASSWORD";

/// Overrides `elasticsearch.timeout` (seconds).
pub const ENV_ES_TIMEOUT: &str = "ESMAINT_ES_TIMEOUT";

/// Disables `.env` loading when set to `true` or `1`.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
