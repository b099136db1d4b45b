//! Settings methods for [`ElasticsearchClient`].

use crate::client::ElasticsearchClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{FlatSettings, SettingsPatch};

impl ElasticsearchClient {
    /// Fetch the flat settings of one index; `None` when the index is unknown.
    pub async fn get_settings(&self, index: &str) -> Result<Option<FlatSettings>> {
        endpoints::get_settings(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            self.max_retries,
        )
        .await
    }

    /// Apply a settings patch to one index.
    pub async fn put_settings(&self, index: &str, patch: &SettingsPatch) -> Result<()> {
        endpoints::put_settings(
            &self.http,
            &self.base_url,
            self.credentials.as_ref(),
            index,
            patch,
            self.max_retries,
        )
        .await
    }
}
