// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage backends for the action queue.
//!
//! ```text
//! ┌──────────────┐   open ok    ┌──────────────┐
//! │  open_store  │─────────────►│ SqliteStore  │  (transactional)
//! │              │              └──────────────┘
//! │              │  unavailable ┌──────────────┐
//! │              │─────────────►│ FallbackStore│  (whole-blob JSON)
//! └──────────────┘              └──────────────┘
//! ```
//!
//! The backend is chosen once, when the store is opened, and kept for the
//! lifetime of the process. There is no per-operation retry of the preferred
//! backend, so records never end up split across two stores.

mod fallback;
mod sqlite;

pub use fallback::FallbackStore;
pub use sqlite::SqliteStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionId, NewAction};
use crate::error::{Error, Result};

const DB_FILE_NAME: &str = "outbox.db";
const FALLBACK_FILE_NAME: &str = "outbox-fallback.json";

/// A crash-durable, ordered append/delete log of actions.
pub trait DurableStore: Send {
    /// Which backend this is.
    fn backend(&self) -> Backend;

    /// Persists one action and assigns its identifier before returning.
    ///
    /// Either the whole record is stored or nothing is.
    fn append(&mut self, action: &NewAction, created_at: DateTime<Utc>) -> Result<Action>;

    /// Returns a snapshot of all persisted actions in insertion order.
    fn list_all(&self) -> Result<Vec<Action>>;

    /// Removes one action. Removing an unknown id is a no-op.
    fn delete_by_id(&mut self, id: ActionId) -> Result<()>;

    /// Removes every action and returns how many were removed.
    fn clear(&mut self) -> Result<usize>;
}

/// The storage strategy in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SQLite database with atomic transactions.
    Transactional,
    /// Single JSON blob rewritten on every mutation.
    Fallback,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Transactional => "transactional",
            Backend::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which backend to try first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    /// Transactional store, falling back when it cannot be opened.
    #[default]
    Auto,
    /// Always use the fallback store.
    Fallback,
}

impl FromStr for BackendPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            "fallback" => Ok(BackendPreference::Fallback),
            _ => Err(Error::InvalidInput(format!(
                "invalid store backend: '{s}'\n  hint: valid backends are: auto, fallback"
            ))),
        }
    }
}

/// On-disk locations of both backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// SQLite database file.
    pub database: PathBuf,
    /// Fallback JSON blob.
    pub fallback: PathBuf,
}

impl StorePaths {
    /// Standard file names inside a state directory.
    pub fn in_dir(dir: &Path) -> Self {
        StorePaths {
            database: dir.join(DB_FILE_NAME),
            fallback: dir.join(FALLBACK_FILE_NAME),
        }
    }
}

/// Opens the store for this process.
///
/// Tries the transactional store unless the fallback is forced. Any failure to
/// open it selects the fallback store; only a failure to prepare the fallback
/// itself is returned as an error.
pub fn open_store(
    paths: &StorePaths,
    preference: BackendPreference,
) -> Result<Box<dyn DurableStore>> {
    if preference == BackendPreference::Auto {
        match SqliteStore::open(&paths.database) {
            Ok(store) => {
                tracing::debug!(path = %paths.database.display(), "opened transactional store");
                return Ok(Box::new(store));
            }
            Err(e) => {
                tracing::warn!(error = %e, "transactional store unavailable, using fallback store");
            }
        }
    }

    let store = FallbackStore::open(&paths.fallback)?;
    tracing::debug!(path = %paths.fallback.display(), "opened fallback store");
    Ok(Box::new(store))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
