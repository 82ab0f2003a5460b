// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `outbox` with a clean environment pointed at `state_dir`.
pub fn outbox(state_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("outbox");
    cmd.env("OUTBOX_STATE_DIR", state_dir)
        .env_remove("OUTBOX_REMOTE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `config.toml` into the state directory.
pub fn write_config(temp: &TempDir, content: &str) {
    std::fs::write(temp.path().join("config.toml"), content).unwrap();
}

/// Enqueues an action and returns the printed id.
pub fn enqueue(temp: &TempDir, kind: &str, payload: &str) -> String {
    let output = outbox(temp.path())
        .args(["enqueue", kind, payload])
        .output()
        .unwrap();
    assert!(output.status.success(), "enqueue failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Stdout of `outbox list`, one action per line.
pub fn list_lines(temp: &TempDir) -> Vec<String> {
    let output = outbox(temp.path()).arg("list").output().unwrap();
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
