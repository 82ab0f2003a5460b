// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use outbox_core::{ActionKind, ActionQueue, LazyQueue, NewAction};

use crate::config::Context;
use crate::error::{Error, Result};
use crate::sync::{
    ConnectivityProbe, RemoteSubmitter, SyncCoordinator, TcpProbe, WebSocketSubmitter,
};

use super::{coordinator_for, probe_for, runtime};

pub fn run(
    ctx: &Context,
    lazy: &LazyQueue,
    kind: ActionKind,
    payload: Option<&str>,
    sync: bool,
) -> Result<()> {
    let action = NewAction::new(kind, parse_payload(payload)?);
    let queue = lazy.get()?;
    let mut out = std::io::stdout().lock();

    if !sync {
        return run_impl(&queue, action, &mut out);
    }

    match sync_targets(ctx, Arc::clone(&queue)) {
        Ok((coordinator, probe)) => {
            runtime()?.block_on(dispatch_impl(&coordinator, &probe, action, &mut out))
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot sync, action only queued");
            run_impl(&queue, action, &mut out)?;
            eprintln!("warning: queued for later delivery: {e}");
            Ok(())
        }
    }
}

/// Coordinator and probe for the configured remote, if there is a usable one.
fn sync_targets(
    ctx: &Context,
    queue: Arc<ActionQueue>,
) -> Result<(SyncCoordinator<WebSocketSubmitter>, TcpProbe)> {
    let remote = ctx.config.require_remote()?;
    let probe = probe_for(remote)?;
    Ok((coordinator_for(queue, remote)?, probe))
}

/// Internal implementation that accepts the queue for testing.
pub(crate) fn run_impl(queue: &ActionQueue, action: NewAction, out: &mut impl Write) -> Result<()> {
    let id = queue.enqueue(action)?;
    writeln!(out, "{id}")?;
    Ok(())
}

/// Queues `action`, then delivers it right away when the probe reaches the remote.
pub(crate) async fn dispatch_impl<S, P>(
    coordinator: &SyncCoordinator<S>,
    probe: &P,
    action: NewAction,
    out: &mut impl Write,
) -> Result<()>
where
    S: RemoteSubmitter,
    P: ConnectivityProbe,
{
    let reachable = probe.probe().await;
    let outcome = coordinator.dispatch(action, reachable).await?;
    writeln!(out, "{}", outcome.id)?;

    if !outcome.delivered {
        match outcome.report.as_ref().and_then(|r| r.failure.as_ref()) {
            Some(failure) => eprintln!("warning: queued for later delivery: {failure}"),
            None if !reachable => eprintln!("warning: remote unreachable, queued for later delivery"),
            None => {}
        }
    }
    Ok(())
}

/// Parses the payload argument, defaulting to an empty object.
pub(crate) fn parse_payload(payload: Option<&str>) -> Result<Value> {
    match payload {
        None => Ok(Value::Object(Default::default())),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| Error::InvalidPayload(e.to_string()))
        }
    }
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
