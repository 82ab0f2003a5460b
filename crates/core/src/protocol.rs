// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket messages exchanged with the remote collection service.
//!
//! The client submits one queued action at a time and waits for the server
//! to accept or reject it before moving on to the next.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionId, ActionKind};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Deliver a queued action into its bucket.
    Submit {
        /// Local queue id, echoed in the acknowledgement.
        action_id: ActionId,
        kind: ActionKind,
        /// Remote collection name, `offline-<kind>`.
        bucket: String,
        payload: serde_json::Value,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The action was stored remotely.
    Accepted { action_id: ActionId },

    /// The server refused the action. It stays queued for a later attempt.
    Rejected { action_id: ActionId, reason: String },

    /// Error not tied to a specific submission.
    Error { message: String },
}

impl ClientMessage {
    /// Builds the submission for a queued action.
    pub fn submit(action: &Action) -> Self {
        ClientMessage::Submit {
            action_id: action.id,
            kind: action.kind,
            bucket: action.kind.bucket(),
            payload: action.payload.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    pub fn accepted(action_id: ActionId) -> Self {
        ServerMessage::Accepted { action_id }
    }

    pub fn rejected(action_id: ActionId, reason: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            action_id,
            reason: reason.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
