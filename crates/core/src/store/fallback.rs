// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-blob JSON fallback store.
//!
//! The queue is kept as one JSON array. Every mutation reads the array, edits
//! it and writes it back in full: the new content goes to a temp file that is
//! fsynced and renamed over the old one, so readers see either the previous or
//! the next state. An exclusive lock on a sibling `.lock` file serializes
//! mutations between processes.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;

use super::{Backend, DurableStore};
use crate::action::{Action, ActionId, NewAction};
use crate::clock::MonotonicClock;
use crate::error::Result;

/// Fallback store backed by a single JSON file.
pub struct FallbackStore {
    path: PathBuf,
    clock: MonotonicClock,
}

impl FallbackStore {
    /// Opens the store at `path`, creating its directory if needed.
    ///
    /// The blob itself is created lazily on the first mutation.
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_clock(path, MonotonicClock::new())
    }

    /// Opens the store with a custom identifier clock.
    pub fn with_clock(path: &Path, clock: MonotonicClock) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(FallbackStore {
            path: path.to_path_buf(),
            clock,
        })
    }

    /// Opens the store with a raw clock source (wrapped to be monotonic).
    #[cfg(test)]
    pub(crate) fn with_clock_source(
        path: &Path,
        source: impl crate::clock::ClockSource + 'static,
    ) -> Result<Self> {
        Self::with_clock(path, MonotonicClock::with_source(source))
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Runs `f` while holding the exclusive store lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.sibling(".lock"))?;
        FileExt::lock_exclusive(&lock)?;
        // Closing the file releases the lock.
        f()
    }

    /// Reads the blob.
    ///
    /// A missing or empty file is an empty queue. A malformed blob is moved
    /// aside to `<path>.corrupt` and also treated as empty.
    fn load(&self) -> Result<Vec<Action>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Action>>(&content) {
            Ok(actions) => Ok(actions),
            Err(e) => {
                let quarantine = self.sibling(".corrupt");
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "fallback queue is unreadable, treating it as empty"
                );
                if let Err(rename_err) = fs::rename(&self.path, &quarantine) {
                    tracing::warn!(error = %rename_err, "failed to move unreadable queue aside");
                }
                Ok(Vec::new())
            }
        }
    }

    /// Atomically replaces the blob with `actions`.
    fn persist(&self, actions: &[Action]) -> Result<()> {
        let tmp = self.sibling(".tmp");
        let json = serde_json::to_string(actions)?;

        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Next identifier: time-based, but always past every stored id.
    fn next_id(&self, existing: &[Action]) -> ActionId {
        let floor = existing
            .iter()
            .map(|a| a.id.get())
            .max()
            .map(|max| u64::try_from(max).unwrap_or(0).saturating_add(1))
            .unwrap_or(0);
        let raw = self.clock.at_least(floor);
        ActionId::new(i64::try_from(raw).unwrap_or(i64::MAX))
    }
}

impl DurableStore for FallbackStore {
    fn backend(&self) -> Backend {
        Backend::Fallback
    }

    fn append(&mut self, action: &NewAction, created_at: DateTime<Utc>) -> Result<Action> {
        self.locked(|| {
            let mut actions = self.load()?;
            let stored = Action::from_new(self.next_id(&actions), action, created_at);
            actions.push(stored.clone());
            self.persist(&actions)?;
            Ok(stored)
        })
    }

    fn list_all(&self) -> Result<Vec<Action>> {
        self.locked(|| self.load())
    }

    fn delete_by_id(&mut self, id: ActionId) -> Result<()> {
        self.locked(|| {
            let mut actions = self.load()?;
            let before = actions.len();
            actions.retain(|a| a.id != id);
            if actions.len() != before {
                self.persist(&actions)?;
            }
            Ok(())
        })
    }

    fn clear(&mut self) -> Result<usize> {
        self.locked(|| {
            let removed = self.load()?.len();
            self.persist(&[])?;
            Ok(removed)
        })
    }
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod tests;
