//! Index lifecycle endpoints: listing, open/close, force-merge and deletion.

use reqwest::Client;
use tracing::debug;

use crate::auth::{Credentials, authorize};
use crate::endpoints::{cluster_url, index_url, send_request_with_retry};
use crate::error::Result;
use crate::models::{CatIndexRow, ElasticsearchIndex};

/// Columns requested from `_cat/indices`.
const CAT_INDICES_COLUMNS: &str = "index,status,health,pri,pri.segments.count";

/// List every index with its open and merged state.
pub async fn list_indices(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    max_retries: usize,
) -> Result<Vec<ElasticsearchIndex>> {
    let url = cluster_url(base_url, "/_cat/indices")?;
    debug!(%url, "listing indices");

    let builder = authorize(client.get(url), credentials)
        .query(&[("format", "json"), ("h", CAT_INDICES_COLUMNS)]);
    let response = send_request_with_retry(builder, max_retries).await?;

    let rows: Vec<CatIndexRow> = response.json().await?;
    Ok(rows.into_iter().map(ElasticsearchIndex::from).collect())
}

/// Open an index and wait until all of its shards are active.
pub async fn open_index(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    max_retries: usize,
) -> Result<()> {
    let url = index_url(base_url, index, "/_open")?;
    debug!(index, "opening index");

    let builder =
        authorize(client.post(url), credentials).query(&[("wait_for_active_shards", "all")]);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}

/// Close an index.
pub async fn close_index(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    max_retries: usize,
) -> Result<()> {
    let url = index_url(base_url, index, "/_close")?;
    debug!(index, "closing index");

    let builder = authorize(client.post(url), credentials);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}

/// Force-merge an index down to `max_num_segments` segments per shard.
pub async fn force_merge(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    max_num_segments: u32,
    max_retries: usize,
) -> Result<()> {
    let url = index_url(base_url, index, "/_forcemerge")?;
    debug!(index, max_num_segments, "force-merging index");

    let builder = authorize(client.post(url), credentials)
        .query(&[("max_num_segments", max_num_segments.to_string())]);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}

/// Delete an index.
pub async fn delete_index(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    index: &str,
    max_retries: usize,
) -> Result<()> {
    let url = index_url(base_url, index, "")?;
    debug!(index, "deleting index");

    let builder = authorize(client.delete(url), credentials);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}
