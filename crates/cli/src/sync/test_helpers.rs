// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use outbox_core::protocol::{ClientMessage, ServerMessage};
use outbox_core::store::SqliteStore;
use outbox_core::{ActionId, ActionKind, ActionQueue, NewAction};

/// Queue over a fresh in-memory database.
pub fn memory_queue() -> Arc<ActionQueue> {
    Arc::new(ActionQueue::new(Box::new(SqliteStore::open_in_memory().unwrap())))
}

pub fn shortage(item: &str) -> NewAction {
    NewAction::new(ActionKind::ShortageReport, json!({ "item": item }))
}

pub fn production(item: &str) -> NewAction {
    NewAction::new(ActionKind::ProductionEvent, json!({ "item": item }))
}

/// Payload `item` of every queued action, oldest first.
pub fn queued_items(queue: &ActionQueue) -> Vec<String> {
    queue
        .list()
        .unwrap()
        .iter()
        .map(|a| a.payload["item"].as_str().unwrap().to_string())
        .collect()
}

/// How the test server answers one submission.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A stray acknowledgement for another action, then `accepted`.
    Accept,
    Reject(&'static str),
    /// Never answer.
    Silent,
    /// Close the connection without answering.
    Close,
    /// Send a frame that is not a protocol message.
    Garbage,
}

/// In-process WebSocket server speaking the submit protocol.
///
/// Replies follow the script in order; once it is exhausted every
/// submission is accepted.
pub struct TestServer {
    pub url: String,
    received: Arc<Mutex<Vec<ClientMessage>>>,
    connections: Arc<Mutex<usize>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(script: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let script = Arc::new(Mutex::new(VecDeque::from(script)));
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(Mutex::new(0));

        let handle = {
            let received = Arc::clone(&received);
            let connections = Arc::clone(&connections);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    *connections.lock().unwrap() += 1;
                    let script = Arc::clone(&script);
                    let received = Arc::clone(&received);
                    tokio::spawn(async move {
                        let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
                            return;
                        };
                        serve(ws, script, received).await;
                    });
                }
            })
        };

        TestServer {
            url,
            received,
            connections,
            handle,
        }
    }

    /// Every client message received so far.
    pub fn received(&self) -> Vec<ClientMessage> {
        self.received.lock().unwrap().clone()
    }

    /// Payload `item` of every submission received so far.
    pub fn submitted_items(&self) -> Vec<String> {
        self.received()
            .into_iter()
            .map(|ClientMessage::Submit { payload, .. }| {
                payload["item"].as_str().unwrap().to_string()
            })
            .collect()
    }

    /// Number of accepted TCP connections.
    pub fn connections(&self) -> usize {
        *self.connections.lock().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    script: Arc<Mutex<VecDeque<Reply>>>,
    received: Arc<Mutex<Vec<ClientMessage>>>,
) {
    let (mut sink, mut stream) = ws.split();
    let encode = |msg: ServerMessage| Message::Text(msg.to_json().unwrap().into());

    while let Some(Ok(frame)) = stream.next().await {
        let Message::Text(text) = frame else {
            continue;
        };
        let msg = ClientMessage::from_json(&text).unwrap();
        received.lock().unwrap().push(msg.clone());

        let ClientMessage::Submit { action_id, .. } = msg;

        let reply = script.lock().unwrap().pop_front().unwrap_or(Reply::Accept);
        let outcome = match reply {
            Reply::Accept => {
                let stray = ActionId::new(action_id.get() + 1_000_000);
                let _ = sink.send(encode(ServerMessage::accepted(stray))).await;
                sink.send(encode(ServerMessage::accepted(action_id))).await
            }
            Reply::Reject(reason) => {
                sink.send(encode(ServerMessage::rejected(action_id, reason)))
                    .await
            }
            Reply::Silent => Ok(()),
            Reply::Close => {
                let _ = sink.close().await;
                return;
            }
            Reply::Garbage => sink.send(Message::Text("not json".into())).await,
        };
        if outcome.is_err() {
            return;
        }
    }
}
