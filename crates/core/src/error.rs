// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for outbox-core operations.

use thiserror::Error;

/// All possible errors that can occur in outbox-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The transactional store could not be opened. Recovered by falling back.
    #[error("transactional store unavailable: {0}")]
    StoreUnavailable(String),

    /// A queue mutation failed at the storage layer. The action is not saved.
    #[error("failed to {operation} queued action: {source}")]
    WriteFailure {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid action type: '{0}'\n  hint: valid types are: checklist-progress, production-event, shortage-report")]
    InvalidActionKind(String),

    #[error("invalid action id: '{0}'\n  hint: ids are positive integers, see 'outbox list'")]
    InvalidActionId(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Wraps a storage error as a failed mutation.
    pub(crate) fn write_failure(operation: &'static str, source: Error) -> Self {
        Error::WriteFailure {
            operation,
            source: Box::new(source),
        }
    }
}

/// A specialized Result type for outbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
