//! Builder for loading the esmaint configuration.
//!
//! Responsibilities:
//! - Resolve the configuration file path (explicit, environment, platform default).
//! - Read and deserialize the YAML document.
//! - Layer environment and CLI overrides on top of file values.
//!
//! Does NOT handle:
//! - Parsing environment variable values (see env.rs).
//!
//! Invariants:
//! - `load()` always returns a validated `Conf`.

use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{ENV_DOTENV_DISABLED, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS};
use crate::types::Conf;

/// Returns the default path to the configuration file.
///
/// - Linux: `~/.config/esmaint/esmaint.yml`
/// - macOS: `~/Library/Application Support/esmaint/esmaint.yml`
/// - Windows: `%AppData%\esmaint\esmaint.yml`
pub fn default_config_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "esmaint")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("esmaint.yml"))
}

/// Configuration loader that layers overrides on top of the YAML file.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    es_url: Option<String>,
    es_username: Option<String>,
    es_password: Option<SecretString>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Override the config file path.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Override the Elasticsearch URL.
    pub fn with_es_url(mut self, url: String) -> Self {
        self.es_url = Some(url);
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry budget for throttled requests.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Apply environment variable overrides.
    ///
    /// Values already set on the builder take precedence.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// The config path that `load()` will read.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => {
                default_config_path().map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))
            }
        }
    }

    /// Read, merge and validate the configuration.
    pub fn load(self) -> Result<Conf, ConfigError> {
        let path = self.config_path()?;
        let mut conf = read_config_file(&path)?;
        self.apply_overrides(&mut conf)?;
        conf.validate()?;
        Ok(conf)
    }

    fn apply_overrides(self, conf: &mut Conf) -> Result<(), ConfigError> {
        if let Some(url) = self.es_url {
            conf.elasticsearch.url = url;
        }
        if let Some(username) = self.es_username {
            conf.elasticsearch.username = Some(username);
        }
        if let Some(password) = self.es_password {
            conf.elasticsearch.password = Some(password);
        }
        if let Some(timeout) = self.timeout {
            conf.elasticsearch.timeout = Some(timeout);
        }
        if let Some(retries) = self.max_retries {
            conf.elasticsearch.max_retries = Some(retries);
        }

        if let Some(timeout) = conf.elasticsearch.timeout
            && (timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS)
        {
            return Err(ConfigError::InvalidValue {
                var: "elasticsearch.timeout".to_string(),
                message: format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
            });
        }
        if let Some(retries) = conf.elasticsearch.max_retries
            && retries > MAX_MAX_RETRIES
        {
            return Err(ConfigError::InvalidValue {
                var: "elasticsearch.max_retries".to_string(),
                message: format!("must be at most {MAX_MAX_RETRIES}"),
            });
        }
        Ok(())
    }

    pub(super) fn has_config_path(&self) -> bool {
        self.config_path.is_some()
    }

    pub(super) fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub(super) fn has_es_url(&self) -> bool {
        self.es_url.is_some()
    }

    pub(super) fn set_es_url(&mut self, url: Option<String>) {
        self.es_url = url;
    }

    pub(super) fn set_es_username(&mut self, username: Option<String>) {
        self.es_username = username;
    }

    pub(super) fn set_es_password(&mut self, password: Option<SecretString>) {
        self.es_password = password;
    }

    pub(super) fn has_timeout(&self) -> bool {
        self.timeout.is_some()
    }

    pub(super) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

/// Read and deserialize a YAML configuration file.
pub(crate) fn read_config_file(path: &Path) -> Result<Conf, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    })
}
