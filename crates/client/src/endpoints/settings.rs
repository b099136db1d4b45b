//! Index settings endpoints (always in flat form).

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::auth::{Credentials, authorize};
use crate::endpoints::{index_url, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::models::{FlatSettings, SettingsPatch};

#[derive(Debug, Deserialize)]
struct IndexSettingsEntry {
    #[serde(default)]
    settings: FlatSettings,
}

/// Fetch the flat settings of one index.
///
/// Returns `Ok(None)` when the cluster does not know the index, either
/// because it answers 404 or because the response has no entry for it.
pub async fn get_settings(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    max_retries: usize,
) -> Result<Option<FlatSettings>> {
    let url = index_url(base_url, index, "/_settings")?;
    debug!(index, "fetching index settings");

    let builder = authorize(client.get(url), credentials).query(&[("flat_settings", "true")]);
    let response = match send_request_with_retry(builder, max_retries).await {
        Ok(response) => response,
        Err(ClientError::ApiError { status: 404, .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut entries: HashMap<String, IndexSettingsEntry> = response.json().await?;
    Ok(entries.remove(index).map(|entry| entry.settings))
}

/// Apply a settings patch to one index.
pub async fn put_settings(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    patch: &SettingsPatch,
    max_retries: usize,
) -> Result<()> {
    let url = index_url(base_url, index, "/_settings")?;
    debug!(index, ?patch, "updating index settings");

    let builder = authorize(client.put(url), credentials)
        .query(&[("flat_settings", "true")])
        .json(patch);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}
