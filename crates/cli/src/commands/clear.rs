// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::{ActionQueue, LazyQueue};

use crate::error::Result;

pub fn run(lazy: &LazyQueue) -> Result<()> {
    run_impl(&*lazy.get()?, &mut std::io::stdout().lock())
}

/// Internal implementation that accepts the queue for testing.
pub(crate) fn run_impl(queue: &ActionQueue, out: &mut impl Write) -> Result<()> {
    match queue.clear()? {
        1 => writeln!(out, "1 action removed")?,
        n => writeln!(out, "{n} actions removed")?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
