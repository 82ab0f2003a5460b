// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote submission of queued actions.
//!
//! [`RemoteSubmitter`] is the seam between the coordinator and the network.
//! [`WebSocketSubmitter`] is the production implementation; tests script
//! their own.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use outbox_core::protocol::{ClientMessage, ServerMessage};
use outbox_core::{Action, ActionId};

/// Why a submission did not succeed. Every variant leaves the action queued.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The remote could not be reached or the connection dropped.
    #[error("remote unreachable: {0}")]
    Unreachable(String),

    /// The remote answered and refused the action.
    #[error("action {action_id} rejected: {reason}")]
    Rejected { action_id: ActionId, reason: String },

    /// No acknowledgement arrived before the deadline.
    #[error("no acknowledgement within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The remote sent something that does not follow the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type for submissions.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Delivers one action to the remote collection service.
pub trait RemoteSubmitter: Send {
    /// Submits `action` and resolves once the remote has accepted or refused it.
    fn submit<'a>(
        &'a mut self,
        action: &'a Action,
    ) -> Pin<Box<dyn Future<Output = SubmitResult<()>> + Send + 'a>>;

    /// Drops any connection state after an abandoned submission.
    fn reset(&mut self) {}
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WebSocketConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

/// Submitter speaking the JSON protocol over a WebSocket.
///
/// Connects on first use and keeps the connection for later submissions.
/// Any transport failure drops the connection so the next call reconnects.
pub struct WebSocketSubmitter {
    url: String,
    connect_timeout: Duration,
    ws: Option<WebSocketConnection>,
}

impl WebSocketSubmitter {
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        WebSocketSubmitter {
            url: url.into(),
            connect_timeout,
            ws: None,
        }
    }

    /// Returns true while a connection is held.
    #[cfg(test)]
    pub(crate) fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    async fn connect(&mut self) -> SubmitResult<&mut WebSocketConnection> {
        if self.ws.is_none() {
            let connecting = tokio_tungstenite::connect_async(self.url.as_str());
            let (ws_stream, _) = tokio::time::timeout(self.connect_timeout, connecting)
                .await
                .map_err(|_| {
                    SubmitError::Unreachable(format!(
                        "connect timed out after {}ms",
                        self.connect_timeout.as_millis()
                    ))
                })?
                .map_err(|e| SubmitError::Unreachable(e.to_string()))?;

            tracing::debug!(url = %self.url, "connected to remote");
            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });
        }

        self.ws
            .as_mut()
            .ok_or_else(|| SubmitError::Unreachable("not connected".to_string()))
    }

    async fn exchange(&mut self, action: &Action) -> SubmitResult<()> {
        let json = ClientMessage::submit(action)
            .to_json()
            .map_err(|e| SubmitError::Protocol(e.to_string()))?;

        let ws = self.connect().await?;
        ws.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| SubmitError::Unreachable(e.to_string()))?;
        ws.sink
            .flush()
            .await
            .map_err(|e| SubmitError::Unreachable(e.to_string()))?;

        loop {
            let text = match ws.stream.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(SubmitError::Unreachable("connection closed".to_string()));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SubmitError::Unreachable(e.to_string())),
            };

            let msg = ServerMessage::from_json(&text)
                .map_err(|e| SubmitError::Protocol(format!("unreadable message: {e}")))?;
            match msg {
                ServerMessage::Accepted { action_id } if action_id == action.id => return Ok(()),
                ServerMessage::Rejected { action_id, reason } if action_id == action.id => {
                    return Err(SubmitError::Rejected { action_id, reason });
                }
                ServerMessage::Error { message } => return Err(SubmitError::Protocol(message)),
                // Late acknowledgements for abandoned submissions, keepalives.
                other => {
                    tracing::trace!(?other, "skipping unrelated message");
                }
            }
        }
    }
}

impl RemoteSubmitter for WebSocketSubmitter {
    fn submit<'a>(
        &'a mut self,
        action: &'a Action,
    ) -> Pin<Box<dyn Future<Output = SubmitResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.exchange(action).await;
            if let Err(SubmitError::Unreachable(_) | SubmitError::Protocol(_)) = &result {
                self.ws = None;
            }
            result
        })
    }

    fn reset(&mut self) {
        self.ws = None;
    }
}
