// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the outboxrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] outbox_core::Error),

    #[error("no remote configured\n  hint: set [remote] url in config.toml or OUTBOX_REMOTE_URL")]
    NoRemote,

    #[error("invalid remote URL '{url}': {reason}")]
    InvalidRemoteUrl { url: String, reason: String },

    #[error("invalid payload: {0}\n  hint: payload must be a JSON value, e.g. '{{\"item\":\"arroz\"}}'")]
    InvalidPayload(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("could not determine a state directory\n  hint: pass --state-dir or set OUTBOX_STATE_DIR")]
    NoStateDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for outboxrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
