//! Elasticsearch REST API client.
//!
//! This crate provides a small, type-safe client for the index maintenance
//! subset of the Elasticsearch REST API, plus the [`ClusterTransport`] seam
//! the lifecycle engine runs against.

mod auth;
pub mod client;
pub mod error;
pub mod models;
mod serde_helpers;
mod transport;

pub mod endpoints;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::Credentials;
pub use client::ElasticsearchClient;
pub use client::builder::ElasticsearchClientBuilder;
pub use error::{ClientError, Result};
pub use models::{
    CatIndexRow, ElasticsearchIndex, ElasticsearchRecovery, FlatSettings, SettingUpdate,
    SettingsPatch,
};
pub use transport::ClusterTransport;
