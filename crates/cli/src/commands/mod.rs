// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod drain;
pub mod enqueue;
pub mod list;
pub mod remove;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::sync::Arc;

use outbox_core::ActionQueue;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::sync::{SyncCoordinator, TcpProbe, WebSocketSubmitter};

/// Builds the single-threaded runtime the async commands block on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Coordinator submitting over a WebSocket to the configured remote.
pub(crate) fn coordinator_for(
    queue: Arc<ActionQueue>,
    remote: &RemoteConfig,
) -> Result<SyncCoordinator<WebSocketSubmitter>> {
    remote.uri()?;
    let submitter = WebSocketSubmitter::new(remote.url.clone(), remote.connect_timeout());
    Ok(SyncCoordinator::new(queue, submitter, remote.submit_timeout()))
}

/// Reachability probe for the configured remote.
pub(crate) fn probe_for(remote: &RemoteConfig) -> Result<TcpProbe> {
    let uri = remote.uri()?;
    TcpProbe::for_uri(&uri, remote.probe_timeout()).ok_or_else(|| Error::InvalidRemoteUrl {
        url: remote.url.clone(),
        reason: "missing host".to_string(),
    })
}
