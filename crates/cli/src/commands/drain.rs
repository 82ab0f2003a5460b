// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use outbox_core::LazyQueue;

use crate::config::Context;
use crate::error::Result;
use crate::sync::{RemoteSubmitter, SyncCoordinator};

use super::{coordinator_for, runtime};

pub fn run(ctx: &Context, lazy: &LazyQueue) -> Result<()> {
    let remote = ctx.config.require_remote()?;
    let coordinator = coordinator_for(lazy.get()?, remote)?;
    runtime()?.block_on(run_impl(&coordinator, &mut std::io::stdout().lock()))
}

/// Runs one drain and prints the synced count.
///
/// A failed submission is reported on stderr but is not an error: the
/// remaining actions stay queued for the next drain.
pub(crate) async fn run_impl<S: RemoteSubmitter>(
    coordinator: &SyncCoordinator<S>,
    out: &mut impl Write,
) -> Result<()> {
    let report = coordinator.drain().await?;
    writeln!(out, "{report}")?;

    if let Some(failure) = &report.failure {
        eprintln!(
            "warning: {failure}\n  {} still queued, run 'outbox drain' again once the remote is back",
            pending(report.remaining)
        );
    }
    Ok(())
}

fn pending(n: usize) -> String {
    match n {
        1 => "1 action".to_string(),
        n => format!("{n} actions"),
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
