// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! A [`ConnectivityProbe`] answers "is the remote reachable right now". The
//! [`ConnectivityMonitor`] turns those level readings into edge events, and
//! [`watch`] polls a probe in the background and forwards the edges.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_util::sync::CancellationToken;

/// A reachability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Reachable,
    Unreachable,
}

/// Edge detector over reachability readings.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    reachable: bool,
}

impl ConnectivityMonitor {
    /// Starts from the state read once at startup. That state is not an event.
    pub fn new(initial: bool) -> Self {
        ConnectivityMonitor { reachable: initial }
    }

    #[cfg(test)]
    pub(crate) fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// Records a reading and returns an event only when it differs from the last.
    pub fn observe(&mut self, reachable: bool) -> Option<ConnectivityEvent> {
        if reachable == self.reachable {
            return None;
        }
        self.reachable = reachable;
        Some(if reachable {
            ConnectivityEvent::Reachable
        } else {
            ConnectivityEvent::Unreachable
        })
    }
}

/// Source of reachability readings.
pub trait ConnectivityProbe: Send + Sync {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probe that opens a TCP connection to the remote's host and port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        TcpProbe {
            addr: addr.into(),
            timeout,
        }
    }

    /// Derives `host:port` from a `ws`/`wss` URL. Missing ports default to 80/443.
    pub fn for_uri(uri: &Uri, timeout: Duration) -> Option<Self> {
        let host = uri.host().filter(|h| !h.is_empty())?;
        let port = uri.port_u16().unwrap_or(match uri.scheme_str() {
            Some("wss") => 443,
            _ => 80,
        });
        Some(Self::new(format!("{host}:{port}"), timeout))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl ConnectivityProbe for TcpProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            matches!(
                tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await,
                Ok(Ok(_))
            )
        })
    }
}

/// Polls `probe` every `interval` and sends transitions to `events`.
///
/// Returns when `cancel` fires or the receiving side is dropped.
pub async fn watch<P: ConnectivityProbe>(
    probe: P,
    mut monitor: ConnectivityMonitor,
    interval: Duration,
    events: mpsc::Sender<ConnectivityEvent>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let reachable = tokio::select! {
            _ = cancel.cancelled() => break,
            reachable = probe.probe() => reachable,
        };

        if let Some(event) = monitor.observe(reachable) {
            tracing::info!(?event, "connectivity changed");
            if events.send(event).await.is_err() {
                break;
            }
        }
    }

    tracing::debug!("connectivity watcher stopped");
}
