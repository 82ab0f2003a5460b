// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Action queue over the active durable store.
//!
//! [`ActionQueue`] hides which backend is in use. All store calls go through a
//! mutex, so an enqueue from a producer and a delete from a drain never
//! interleave inside the store.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::action::{timestamp_from_ms, Action, ActionId, NewAction};
use crate::clock::MonotonicClock;
use crate::error::{Error, Result};
use crate::store::{open_store, Backend, BackendPreference, DurableStore, StorePaths};

/// Durable FIFO of actions waiting for delivery.
pub struct ActionQueue {
    store: Mutex<Box<dyn DurableStore>>,
    clock: MonotonicClock,
    backend: Backend,
}

impl ActionQueue {
    /// Wraps an already opened store.
    pub fn new(store: Box<dyn DurableStore>) -> Self {
        Self::with_clock(store, MonotonicClock::new())
    }

    /// Wraps a store, taking capture timestamps from `clock`.
    pub fn with_clock(store: Box<dyn DurableStore>, clock: MonotonicClock) -> Self {
        let backend = store.backend();
        ActionQueue {
            store: Mutex::new(store),
            clock,
            backend,
        }
    }

    /// Opens the store under `paths` and wraps it.
    pub fn open(paths: &StorePaths, preference: BackendPreference) -> Result<Self> {
        Ok(Self::new(open_store(paths, preference)?))
    }

    /// The backend selected when the queue was opened.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn store(&self) -> MutexGuard<'_, Box<dyn DurableStore>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Durably enqueues an action and returns its id.
    ///
    /// Once this returns the action is visible to [`list`](Self::list). On
    /// error nothing was stored and the caller should tell the user.
    pub fn enqueue(&self, action: NewAction) -> Result<ActionId> {
        let created_at = timestamp_from_ms(self.clock.now_ms());
        let stored = self
            .store()
            .append(&action, created_at)
            .map_err(|e| Error::write_failure("enqueue", e))?;

        tracing::debug!(id = %stored.id, kind = %stored.kind, "enqueued action");
        Ok(stored.id)
    }

    /// Returns a snapshot of the queue, oldest first.
    pub fn list(&self) -> Result<Vec<Action>> {
        self.store().list_all()
    }

    /// Removes an action. Unknown ids are ignored.
    pub fn remove(&self, id: ActionId) -> Result<()> {
        self.store()
            .delete_by_id(id)
            .map_err(|e| Error::write_failure("remove", e))?;
        tracing::debug!(%id, "removed action");
        Ok(())
    }

    /// Removes every action and returns how many were removed.
    ///
    /// Not used by the drain; explicit resets only.
    pub fn clear(&self) -> Result<usize> {
        self.store()
            .clear()
            .map_err(|e| Error::write_failure("clear", e))
    }

    /// Number of queued actions.
    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Lazily opened, process-wide queue handle.
///
/// The composition root owns one `LazyQueue` and hands out the `Arc` it
/// returns. The first [`get`](Self::get) opens the store while holding the
/// slot lock, so concurrent first callers share a single open.
pub struct LazyQueue {
    paths: StorePaths,
    preference: BackendPreference,
    slot: Mutex<Option<Arc<ActionQueue>>>,
}

impl LazyQueue {
    pub fn new(paths: StorePaths, preference: BackendPreference) -> Self {
        LazyQueue {
            paths,
            preference,
            slot: Mutex::new(None),
        }
    }

    /// Returns the queue, opening it on first use.
    pub fn get(&self) -> Result<Arc<ActionQueue>> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(queue) = slot.as_ref() {
            return Ok(Arc::clone(queue));
        }

        let queue = Arc::new(ActionQueue::open(&self.paths, self.preference)?);
        tracing::info!(backend = %queue.backend(), "action queue ready");
        *slot = Some(Arc::clone(&queue));
        Ok(queue)
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
