//! Recovery methods for [`ElasticsearchClient`].

use crate::client::ElasticsearchClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::ElasticsearchRecovery;

impl ElasticsearchClient {
    /// List shard recoveries that are still in progress.
    pub async fn list_active_recoveries(&self) -> Result<Vec<ElasticsearchRecovery>> {
        endpoints::list_active_recoveries(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            self.max_retries,
        )
        .await
    }
}
