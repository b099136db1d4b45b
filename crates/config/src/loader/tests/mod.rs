//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

pub const SAMPLE_CONFIG: &str = r#"
elasticsearch:
  url: http://127.0.0.1:9200
  timeout: 60

cos:
  url: https://bucket.cos.example.com
  secret_id: AKIDexample
  secret_key: s3cr3t
  check: "1:5"

dir:
  workspace: /workspace
  templates: /etc/esmaint.tmpl.d

indices:
  ignores:
    - "-2019-"
  rules:
    info: "3, 5, 7, 30"
    info-prod: "3, 5, 7, -"
"#;

/// Write `content` to `esmaint.yml` inside `dir`.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("esmaint.yml");
    std::fs::write(&path, content).unwrap();
    path
}
