//! Data models for Elasticsearch API responses and requests.
//!
//! Types are organized by resource in submodules and re-exported here
//! for convenient access.

pub mod indices;
pub mod recovery;
pub mod settings;

pub use indices::{CatIndexRow, ElasticsearchIndex, STATUS_OPEN};
pub use recovery::ElasticsearchRecovery;
pub use settings::{FlatSettings, SettingUpdate, SettingsPatch};
