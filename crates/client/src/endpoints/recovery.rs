//! Shard recovery endpoint.

use reqwest::Client;
use tracing::debug;

use crate::auth::{Credentials, authorize};
use crate::endpoints::{cluster_url, send_request_with_retry};
use crate::error::Result;
use crate::models::ElasticsearchRecovery;

/// List shard recoveries that are still in progress.
pub async fn list_active_recoveries(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    max_retries: usize,
) -> Result<Vec<ElasticsearchRecovery>> {
    let url = cluster_url(base_url, "/_cat/recovery")?;
    debug!(%url, "listing active recoveries");

    let builder = authorize(client.get(url), credentials).query(&[
        ("format", "json"),
        ("active_only", "true"),
        ("h", "index,shard,bytes_percent"),
    ]);
    let response = send_request_with_retry(builder, max_retries).await?;

    Ok(response.json().await?)
}
