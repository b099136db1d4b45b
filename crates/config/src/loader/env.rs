//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `ESMAINT_*` environment variables.
//! - Apply them to a ConfigLoader without clobbering explicit builder values.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{
    ENV_CONFIG_PATH, ENV_ES_PASSWORD, ENV_ES_TIMEOUT, ENV_ES_URL, ENV_ES_USERNAME,
};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub(super) fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if !loader.has_config_path()
        && let Some(path) = env_var_or_none(ENV_CONFIG_PATH)
    {
        loader.set_config_path(Some(PathBuf::from(path)));
    }
    if !loader.has_es_url()
        && let Some(url) = env_var_or_none(ENV_ES_URL)
    {
        loader.set_es_url(Some(url));
    }
    if let Some(username) = env_var_or_none(ENV_ES_USERNAME) {
        loader.set_es_username(Some(username));
    }
    if let Some(password) = env_var_or_none(ENV_ES_PASSWORD) {
        loader.set_es_password(Some(SecretString::new(password.into())));
    }
    if !loader.has_timeout()
        && let Some(timeout) = env_var_or_none(ENV_ES_TIMEOUT)
    {
        let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_ES_TIMEOUT.to_string(),
            message: "must be a number".to_string(),
        })?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    Ok(())
}
