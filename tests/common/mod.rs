//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use leafdb::Value;
use tempfile::TempDir;

/// Routes `leafdb` events to the test writer; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("leafdb=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn temp_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// `{"a": 1, "b": {"c": 2}}`
pub fn sample_document() -> Value {
    serde_json::json!({"a": 1, "b": {"c": 2}}).into()
}
