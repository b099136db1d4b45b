//! Shard recovery models for the `_cat/recovery` API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An in-flight shard recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticsearchRecovery {
    pub index: String,
    #[serde(deserialize_with = "crate::serde_helpers::string_from_number_or_string")]
    pub shard: String,
    #[serde(default)]
    pub bytes_percent: String,
}

impl fmt::Display for ElasticsearchRecovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.index, self.shard, self.bytes_percent)
    }
}
