//! REST API endpoint implementations.
//!
//! Every endpoint is a free async function over a `reqwest::Client` so it can
//! be exercised directly against a mock server; [`crate::ElasticsearchClient`]
//! wraps them with its stored connection settings.

mod indices;
mod recovery;
mod request;
mod settings;
pub mod url_encoding;

pub use indices::{close_index, delete_index, force_merge, list_indices, open_index};
pub use recovery::list_active_recoveries;
pub use request::send_request_with_retry;
pub use settings::{get_settings, put_settings};
pub use url_encoding::encode_path_segment;

use reqwest::Url;

use crate::error::{ClientError, Result};

/// Build `{base_url}/{index}{suffix}` with the index name encoded as a single path segment.
pub(crate) fn index_url(base_url: &str, index: &str, suffix: &str) -> Result<Url> {
    if index.is_empty() {
        return Err(ClientError::InvalidUrl("index name is empty".to_string()));
    }
    let raw = format!("{}/{}{}", base_url, encode_path_segment(index), suffix);
    Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("Invalid index URL: {}", e)))
}

/// Build `{base_url}{path}` for cluster-level APIs.
pub(crate) fn cluster_url(base_url: &str, path: &str) -> Result<Url> {
    Url::parse(&format!("{}{}", base_url, path))
        .map_err(|e| ClientError::InvalidUrl(format!("Invalid base URL: {}", e)))
}
