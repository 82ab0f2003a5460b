// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draining the action queue into the remote.
//!
//! A drain reads the queue once, submits the batch in order, removes each
//! action after the remote accepts it and stops at the first failure. Actions
//! enqueued while a drain runs wait for the next one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use outbox_core::{ActionId, ActionQueue, NewAction};

use super::monitor::ConnectivityEvent;
use super::submitter::{RemoteSubmitter, SubmitError};
use crate::error::Result;

/// Outcome of one drain.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Actions accepted by the remote and removed from the queue.
    pub synced: usize,
    /// Actions of the batch still queued.
    pub remaining: usize,
    /// The failure that stopped the drain, if any.
    pub failure: Option<SubmitError>,
}

impl DrainReport {
    /// Returns true if the whole batch was delivered.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for DrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.synced {
            1 => write!(f, "1 action synced"),
            n => write!(f, "{n} actions synced"),
        }
    }
}

/// Result of handing a new action to [`SyncCoordinator::dispatch`].
#[derive(Debug)]
pub struct Dispatched {
    pub id: ActionId,
    /// True once the remote accepted the action and it left the queue.
    pub delivered: bool,
    /// The drain that ran, when the remote was reachable.
    pub report: Option<DrainReport>,
}

/// Replays queued actions through a [`RemoteSubmitter`].
///
/// The submitter lock is held for a whole drain, so drains never overlap.
pub struct SyncCoordinator<S: RemoteSubmitter> {
    queue: Arc<ActionQueue>,
    submitter: Mutex<S>,
    submit_timeout: Duration,
}

impl<S: RemoteSubmitter> SyncCoordinator<S> {
    pub fn new(queue: Arc<ActionQueue>, submitter: S, submit_timeout: Duration) -> Self {
        SyncCoordinator {
            queue,
            submitter: Mutex::new(submitter),
            submit_timeout,
        }
    }

    /// Submits the current queue contents in order, stopping at the first failure.
    ///
    /// Submission failures are reported in the [`DrainReport`]. Only store
    /// errors are returned as `Err`.
    pub async fn drain(&self) -> Result<DrainReport> {
        let mut submitter = self.submitter.lock().await;
        let batch = self.queue.list()?;
        let total = batch.len();
        if total == 0 {
            return Ok(DrainReport::default());
        }

        tracing::debug!(pending = total, "draining queue");
        let mut synced = 0;
        for action in &batch {
            let outcome =
                match tokio::time::timeout(self.submit_timeout, submitter.submit(action)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        submitter.reset();
                        Err(SubmitError::Timeout(self.submit_timeout))
                    }
                };

            if let Err(failure) = outcome {
                tracing::warn!(
                    id = %action.id,
                    kind = %action.kind,
                    error = %failure,
                    synced,
                    "submission failed, keeping remaining actions queued"
                );
                return Ok(DrainReport {
                    synced,
                    remaining: total - synced,
                    failure: Some(failure),
                });
            }

            self.queue.remove(action.id)?;
            synced += 1;
            tracing::debug!(id = %action.id, bucket = %action.kind.bucket(), "action synced");
        }

        tracing::info!(synced, "queue drained");
        Ok(DrainReport {
            synced,
            remaining: 0,
            failure: None,
        })
    }

    /// Producer path: stores `action`, then drains if the remote is reachable.
    ///
    /// The action is always enqueued first, so it is durable before any
    /// network I/O and never overtakes older queued actions. Only a failed
    /// enqueue is an error: once the action is stored, store errors during
    /// the follow-up drain are logged and the action counts as undelivered.
    pub async fn dispatch(&self, action: NewAction, reachable: bool) -> Result<Dispatched> {
        let id = self.queue.enqueue(action)?;
        if !reachable {
            tracing::info!(%id, "remote unreachable, action queued");
            return Ok(Dispatched {
                id,
                delivered: false,
                report: None,
            });
        }

        let report = match self.drain().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(%id, error = %e, "drain failed, action stays queued");
                return Ok(Dispatched {
                    id,
                    delivered: false,
                    report: None,
                });
            }
        };

        let delivered = match self.queue.list() {
            Ok(pending) => !pending.iter().any(|a| a.id == id),
            Err(e) => {
                tracing::error!(%id, error = %e, "could not confirm delivery");
                false
            }
        };
        Ok(Dispatched {
            id,
            delivered,
            report: Some(report),
        })
    }

    /// Drains on startup when already reachable, then on every `Reachable` event.
    ///
    /// `on_report` is called for each drain that synced at least one action.
    /// Errors are logged and never end the loop; it returns when `cancel`
    /// fires or the event channel closes.
    pub async fn run<F>(
        &self,
        initial_reachable: bool,
        mut events: mpsc::Receiver<ConnectivityEvent>,
        cancel: CancellationToken,
        mut on_report: F,
    ) where
        F: FnMut(&DrainReport) + Send,
    {
        if initial_reachable {
            tracing::info!("remote reachable at startup, draining queue");
            self.drain_and_report(&mut on_report).await;
        }

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match event {
                ConnectivityEvent::Reachable => {
                    tracing::info!("remote reachable, draining queue");
                    self.drain_and_report(&mut on_report).await;
                }
                ConnectivityEvent::Unreachable => {
                    tracing::info!("remote unreachable, new actions will be queued");
                }
            }
        }
    }

    async fn drain_and_report<F>(&self, on_report: &mut F)
    where
        F: FnMut(&DrainReport) + Send,
    {
        match self.drain().await {
            Ok(report) if report.synced > 0 => on_report(&report),
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "drain failed"),
        }
    }
}
