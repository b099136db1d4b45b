//! Command implementations.
//!
//! `check-config` and `resolve` work offline from the loaded configuration.
//! The remaining commands talk to the cluster through an
//! [`ElasticsearchClient`] wrapped in [`ClusterOperations`].

pub mod check_config;
pub mod plan;
pub mod resolve;
pub mod run;
pub mod wait_recoveries;

use anyhow::{Context as _, Result};
use chrono::Utc;
use esmaint_client::ElasticsearchClient;
use esmaint_config::Conf;
use esmaint_lifecycle::{
    ArchiveDisabled, CancellationToken, ClusterOperations, Context, MaintenancePass, Mode,
    PassReport,
};
use tracing::info;

/// Build an Elasticsearch client from the loaded configuration.
pub fn build_client_from_config(conf: &Conf) -> Result<ElasticsearchClient> {
    ElasticsearchClient::builder()
        .from_config(&conf.elasticsearch)
        .build()
        .context("failed to build Elasticsearch client")
}

/// Run one maintenance pass in `mode` against the configured cluster.
pub(crate) async fn execute_pass(
    conf: &Conf,
    mode: Mode,
    cancel: &CancellationToken,
) -> Result<PassReport> {
    let client = build_client_from_config(conf)?;
    info!(url = client.base_url(), "connecting to cluster");

    let ops = ClusterOperations::new(client);
    let today = Utc::now().date_naive();
    let ctx = Context::new(cancel.clone());

    MaintenancePass::new(&ops, &ArchiveDisabled, &conf.indices, today)
        .run(mode, &ctx)
        .await
        .context("maintenance pass failed")
}
