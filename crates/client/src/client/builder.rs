//! Client builder for constructing [`ElasticsearchClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating the required base URL
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, redirects, TLS verification)
//!
//! # Invariants
//! - `base_url` is required and must be provided before calling `build()`
//! - The base URL is always normalized to have no trailing slashes
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use secrecy::SecretString;
use std::time::Duration;

use crate::auth::Credentials;
use crate::client::ElasticsearchClient;
use crate::error::{ClientError, Result};
use esmaint_config::ElasticsearchConfig;
use esmaint_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// Builder for creating a new [`ElasticsearchClient`].
pub struct ElasticsearchClientBuilder {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    skip_verify: bool,
    timeout: Duration,
    max_retries: usize,
}

impl Default for ElasticsearchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            credentials: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ElasticsearchClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cluster URL, e.g. `http://127.0.0.1:9200`.
    ///
    /// Trailing slashes will be automatically removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Send HTTP basic authentication with every request.
    pub fn basic_auth(mut self, username: String, password: SecretString) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this against clusters with self-signed certificates you control.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for throttled (HTTP 429) requests.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Pre-configure the builder from the `elasticsearch` config section.
    ///
    /// Credentials are only attached when both username and password are set.
    pub fn from_config(mut self, config: &ElasticsearchConfig) -> Self {
        self.base_url = Some(config.url.clone());
        self.credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        };
        self.skip_verify = config.skip_verify;
        self.timeout = config.timeout_or_default();
        self.max_retries = config.max_retries_or_default();
        self
    }

    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`ElasticsearchClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided or is empty.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<ElasticsearchClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);
        if base_url.is_empty() {
            return Err(ClientError::InvalidUrl("base_url is empty".to_string()));
        }

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        Ok(ElasticsearchClient {
            http,
            base_url,
            credentials: self.credentials,
            max_retries: self.max_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es_config(yaml: &str) -> ElasticsearchConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_from_config_with_credentials() {
        let config = es_config("url: https://es.example.com:9200\nusername: elastic\npassword: changeme\n");

        let client = ElasticsearchClient::builder()
            .from_config(&config)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://es.example.com:9200");
        assert!(client.has_credentials());
    }

    #[test]
    fn test_from_config_without_password_skips_auth() {
        let config = es_config("url: http://es:9200\nusername: elastic\n");

        let client = ElasticsearchClient::builder()
            .from_config(&config)
            .build()
            .unwrap();

        assert!(!client.has_credentials());
    }

    #[test]
    fn test_from_config_preserves_settings() {
        let config = es_config("url: http://es:9200\ntimeout: 15\nmax_retries: 5\nskip_verify: true\n");

        let builder = ElasticsearchClient::builder().from_config(&config);

        assert_eq!(builder.base_url.as_deref(), Some("http://es:9200"));
        assert_eq!(builder.timeout, Duration::from_secs(15));
        assert_eq!(builder.max_retries, 5);
        assert!(builder.skip_verify);
    }

    #[test]
    fn test_missing_base_url() {
        let result = ElasticsearchClient::builder().build();
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_normalize_base_url_trailing_slash() {
        assert_eq!(
            ElasticsearchClientBuilder::normalize_base_url("http://localhost:9200/".to_string()),
            "http://localhost:9200"
        );
        assert_eq!(
            ElasticsearchClientBuilder::normalize_base_url("http://localhost:9200//".to_string()),
            "http://localhost:9200"
        );
        assert_eq!(
            ElasticsearchClientBuilder::normalize_base_url("http://localhost:9200".to_string()),
            "http://localhost:9200"
        );
    }
}
