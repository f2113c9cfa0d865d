//! Shared test utilities for envlayer integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory.
//! - Create scratch app roots with dot-env files.
//!
//! Invariants / Assumptions:
//! - Variables that change which files are loaded are cleared from the host.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a hermetic `envlayer` command rooted at `app_root`.
pub fn envlayer_cmd(app_root: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envlayer");

    cmd.env_remove("NODE_ENV")
        .env_remove("ENV_PATH")
        .env_remove("ENVLAYER_APP_ROOT")
        .env_remove("RUST_LOG");

    cmd.arg("--app-root").arg(app_root);
    cmd
}

/// Create a scratch app root containing `files`.
pub fn app_root(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("create temp dir");
    for (name, contents) in files {
        fs::write(temp_dir.path().join(name), contents).expect("write dot-env file");
    }
    temp_dir
}
