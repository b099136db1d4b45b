//! Elasticsearch REST API client.
//!
//! This module provides [`ElasticsearchClient`], which holds the connection
//! settings and delegates each call to the matching function in
//! [`crate::endpoints`].
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `indices`: Listing, open/close, force-merge and deletion
//! - `settings`: Flat settings reads and updates
//! - `recovery`: Active shard recoveries
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Cancellation and deadlines (applied by the caller around each call)

pub mod builder;

mod indices;
mod recovery;
mod settings;

use crate::auth::Credentials;

/// Elasticsearch REST API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use esmaint_client::ElasticsearchClient;
///
/// let client = ElasticsearchClient::builder()
///     .base_url("http://127.0.0.1:9200".to_string())
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) max_retries: usize,
}

impl ElasticsearchClient {
    /// Create a new client builder.
    pub fn builder() -> builder::ElasticsearchClientBuilder {
        builder::ElasticsearchClientBuilder::new()
    }

    /// The normalized cluster URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests carry basic authentication.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}
