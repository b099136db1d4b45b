//! Shared test utilities for esmaint integration tests.
//!
//! Invariants / Assumptions:
//! - Every command built here is hermetic: no `.env` loading and no
//!   `ESMAINT_*` variables leaking in from the host.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Returns a hermetic `esmaint` command for integration testing.
#[allow(dead_code)]
pub fn esmaint_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("esmaint");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("ESMAINT_CONFIG_PATH")
        .env_remove("ESMAINT_ES_URL")
        .env_remove("ESMAINT_ES_USERNAME")
        .env_remove("ESMAINT_ES_PASSWORD")
        .env_remove("ESMAINT_ES_TIMEOUT")
        .env_remove("RUST_LOG");

    cmd
}

/// Write a config file with the given Elasticsearch URL and `indices` body.
#[allow(dead_code)]
pub fn write_config(dir: &Path, es_url: &str, indices: &str) -> PathBuf {
    let path = dir.join("conf.yml");
    let body = format!(
        "elasticsearch:\n  url: {es_url}\n  timeout: 5\n  max_retries: 0\nindices:\n{indices}"
    );
    std::fs::write(&path, body).expect("write config");
    path
}

/// Returns a hermetic command pointed at `config`.
#[allow(dead_code)]
pub fn esmaint_with_config(config: &Path) -> Command {
    let mut cmd = esmaint_cmd();
    cmd.env("ESMAINT_CONFIG_PATH", config);
    cmd
}

/// Index name dated `days_ago` days before today (UTC).
#[allow(dead_code)]
pub fn dated(prefix: &str, days_ago: i64) -> String {
    let date = chrono::Utc::now().date_naive() - chrono::Duration::days(days_ago);
    format!("{prefix}-{}", date.format("%Y-%m-%d"))
}
