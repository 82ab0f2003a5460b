// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use outbox_core::{ActionId, ActionQueue, LazyQueue};

use crate::error::Result;

pub fn run(lazy: &LazyQueue, id: ActionId) -> Result<()> {
    run_impl(&*lazy.get()?, id)
}

/// Removing an id that is not queued succeeds without changes.
pub(crate) fn run_impl(queue: &ActionQueue, id: ActionId) -> Result<()> {
    queue.remove(id)?;
    tracing::debug!(%id, "removed action");
    Ok(())
}

#[cfg(test)]
#[path = "remove_tests.rs"]
mod tests;
