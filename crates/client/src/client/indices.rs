//! Index lifecycle methods for [`ElasticsearchClient`].

use crate::client::ElasticsearchClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::ElasticsearchIndex;

impl ElasticsearchClient {
    /// List every index with its open and merged state.
    pub async fn list_indices(&self) -> Result<Vec<ElasticsearchIndex>> {
        endpoints::list_indices(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            self.max_retries,
        )
        .await
    }

    /// Open an index, waiting for all shards to become active.
    pub async fn open_index(&self, index: &str) -> Result<()> {
        endpoints::open_index(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            self.max_retries,
        )
        .await
    }

    /// Close an index.
    pub async fn close_index(&self, index: &str) -> Result<()> {
        endpoints::close_index(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            self.max_retries,
        )
        .await
    }

    /// Force-merge an index to at most `max_num_segments` segments per shard.
    pub async fn force_merge(&self, index: &str, max_num_segments: u32) -> Result<()> {
        endpoints::force_merge(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            max_num_segments,
            self.max_retries,
        )
        .await
    }

    /// Delete an index.
    pub async fn delete_index(&self, index: &str) -> Result<()> {
        endpoints::delete_index(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            self.max_retries,
        )
        .await
    }
}
