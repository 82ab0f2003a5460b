// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use outbox_core::LazyQueue;

use crate::config::Context;
use crate::error::Result;
use crate::sync::{watch, ConnectivityMonitor, ConnectivityProbe, RemoteSubmitter, SyncCoordinator};

use super::{coordinator_for, probe_for, runtime};

/// Pending transitions between the watcher and the coordinator.
const EVENT_BUFFER: usize = 8;

/// Runs until Ctrl-C, draining whenever the remote becomes reachable.
pub fn run(ctx: &Context, lazy: &LazyQueue) -> Result<()> {
    let remote = ctx.config.require_remote()?;
    let coordinator = coordinator_for(lazy.get()?, remote)?;
    let probe = probe_for(remote)?;
    let interval = remote.probe_interval();
    tracing::info!(remote = %remote.url, probe = %probe.addr(), "watching connectivity");

    runtime()?.block_on(async {
        let cancel = CancellationToken::new();
        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupted, stopping");
                }
                cancel.cancel();
            }
        });
        run_impl(&coordinator, probe, interval, cancel, &mut std::io::stdout()).await
    })
}

/// Probes once for the initial state, then runs the watcher and the
/// coordinator loop until `cancel` fires.
pub(crate) async fn run_impl<S, P>(
    coordinator: &SyncCoordinator<S>,
    probe: P,
    interval: Duration,
    cancel: CancellationToken,
    out: &mut (impl Write + Send),
) -> Result<()>
where
    S: RemoteSubmitter,
    P: ConnectivityProbe + 'static,
{
    let initial = probe.probe().await;
    tracing::debug!(reachable = initial, "initial connectivity");

    let (events, rx) = mpsc::channel(EVENT_BUFFER);
    let watcher = tokio::spawn(watch(
        probe,
        ConnectivityMonitor::new(initial),
        interval,
        events,
        cancel.clone(),
    ));

    coordinator
        .run(initial, rx, cancel.clone(), |report| {
            if let Err(e) = writeln!(out, "{report}") {
                tracing::warn!(error = %e, "failed to print drain report");
            }
        })
        .await;

    cancel.cancel();
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "connectivity watcher panicked");
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
