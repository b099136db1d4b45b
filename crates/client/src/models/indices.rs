//! Index models for the `_cat/indices` API.

use serde::{Deserialize, Serialize};

/// Value of the `status` column for an open index.
pub const STATUS_OPEN: &str = "open";

/// One row of `GET /_cat/indices?format=json&h=index,status,health,pri,pri.segments.count`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatIndexRow {
    pub index: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub health: Option<String>,
    /// Number of primary shards.
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::u64_or_zero_from_string_or_number"
    )]
    pub pri: u64,
    /// Number of segments across primary shards. Closed indices report none.
    #[serde(
        rename = "pri.segments.count",
        default,
        deserialize_with = "crate::serde_helpers::u64_or_zero_from_string_or_number"
    )]
    pub pri_segments_count: u64,
}

/// Snapshot of one index as seen by the maintenance engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElasticsearchIndex {
    pub name: String,
    /// Whether the index is open.
    pub open: bool,
    /// Whether every primary shard is down to a single segment.
    pub merged: bool,
}

impl From<CatIndexRow> for ElasticsearchIndex {
    fn from(row: CatIndexRow) -> Self {
        Self {
            open: row.status == STATUS_OPEN,
            merged: row.pri >= row.pri_segments_count,
            name: row.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unmerged_row() {
        let row: CatIndexRow = serde_json::from_str(
            r#"{"index":"info-2020-05-05","status":"open","health":"green","pri":"5","pri.segments.count":"37"}"#,
        )
        .unwrap();
        let index = ElasticsearchIndex::from(row);
        assert_eq!(index.name, "info-2020-05-05");
        assert!(index.open);
        assert!(!index.merged);
    }

    #[test]
    fn test_merged_row() {
        let row: CatIndexRow = serde_json::from_str(
            r#"{"index":"info-2020-05-01","status":"open","health":"green","pri":"5","pri.segments.count":"5"}"#,
        )
        .unwrap();
        assert!(ElasticsearchIndex::from(row).merged);
    }

    #[test]
    fn test_closed_row_without_segment_stats() {
        let row: CatIndexRow = serde_json::from_str(
            r#"{"index":"old-2019-01-01","status":"close","health":null,"pri":"1","pri.segments.count":null}"#,
        )
        .unwrap();
        let index = ElasticsearchIndex::from(row);
        assert!(!index.open);
        assert!(index.merged);
    }
}
