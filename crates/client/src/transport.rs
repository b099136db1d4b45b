//! The seam between the maintenance engine and the cluster.
//!
//! The lifecycle crate only talks to a cluster through [`ClusterTransport`],
//! which lets its task model run against an in-memory fake in tests and
//! against [`ElasticsearchClient`] in production.

use std::future::Future;

use crate::client::ElasticsearchClient;
use crate::error::Result;
use crate::models::{ElasticsearchIndex, ElasticsearchRecovery, FlatSettings, SettingsPatch};

/// Cluster operations required by index maintenance.
pub trait ClusterTransport: Send + Sync {
    /// List every index with its open and merged state.
    fn list_indices(&self) -> impl Future<Output = Result<Vec<ElasticsearchIndex>>> + Send;

    /// Open an index and wait for all of its shards to become active.
    fn open_index(&self, index: &str) -> impl Future<Output = Result<()>> + Send;

    /// Close an index.
    fn close_index(&self, index: &str) -> impl Future<Output = Result<()>> + Send;

    /// Flat settings of one index; `None` when the cluster does not know it.
    fn get_settings(&self, index: &str)
    -> impl Future<Output = Result<Option<FlatSettings>>> + Send;

    /// Apply a settings patch to one index.
    fn put_settings(
        &self,
        index: &str,
        patch: &SettingsPatch,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Force-merge an index to at most `max_num_segments` segments per shard.
    fn force_merge(
        &self,
        index: &str,
        max_num_segments: u32,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete an index.
    fn delete_index(&self, index: &str) -> impl Future<Output = Result<()>> + Send;

    /// Shard recoveries still in progress.
    fn list_active_recoveries(
        &self,
    ) -> impl Future<Output = Result<Vec<ElasticsearchRecovery>>> + Send;
}

impl ClusterTransport for ElasticsearchClient {
    async fn list_indices(&self) -> Result<Vec<ElasticsearchIndex>> {
        ElasticsearchClient::list_indices(self).await
    }

    async fn open_index(&self, index: &str) -> Result<()> {
        ElasticsearchClient::open_index(self, index).await
    }

    async fn close_index(&self, index: &str) -> Result<()> {
        ElasticsearchClient::close_index(self, index).await
    }

    async fn get_settings(&self, index: &str) -> Result<Option<FlatSettings>> {
        ElasticsearchClient::get_settings(self, index).await
    }

    async fn put_settings(&self, index: &str, patch: &SettingsPatch) -> Result<()> {
        ElasticsearchClient::put_settings(self, index, patch).await
    }

    async fn force_merge(&self, index: &str, max_num_segments: u32) -> Result<()> {
        ElasticsearchClient::force_merge(self, index, max_num_segments).await
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        ElasticsearchClient::delete_index(self, index).await
    }

    async fn list_active_recoveries(&self) -> Result<Vec<ElasticsearchRecovery>> {
        ElasticsearchClient::list_active_recoveries(self).await
    }
}
