// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Action data model.
//!
//! An [`Action`] is a state change that could not be sent to the remote
//! immediately. Actions are append/remove only: once enqueued they are never
//! mutated, only delivered and deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifier of a queued action, unique within its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(i64);

impl ActionId {
    /// Wraps a raw identifier.
    pub fn new(raw: i64) -> Self {
        ActionId(raw)
    }

    /// Returns the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(ActionId(raw)),
            _ => Err(Error::InvalidActionId(s.to_string())),
        }
    }
}

/// Which remote operation an action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Progress on a station checklist.
    ChecklistProgress,
    /// A production event (batch started, finished, discarded).
    ProductionEvent,
    /// A shortage report for an ingredient or supply.
    ShortageReport,
}

impl ActionKind {
    /// All kinds, in declaration order.
    pub const ALL: [ActionKind; 3] = [
        ActionKind::ChecklistProgress,
        ActionKind::ProductionEvent,
        ActionKind::ShortageReport,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ChecklistProgress => "checklist-progress",
            ActionKind::ProductionEvent => "production-event",
            ActionKind::ShortageReport => "shortage-report",
        }
    }

    /// Remote bucket that replayed actions of this kind are delivered to.
    pub fn bucket(&self) -> String {
        format!("offline-{}", self.as_str())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "checklist-progress" => Ok(ActionKind::ChecklistProgress),
            "production-event" => Ok(ActionKind::ProductionEvent),
            "shortage-report" => Ok(ActionKind::ShortageReport),
            _ => Err(Error::InvalidActionKind(s.to_string())),
        }
    }
}

/// An action as handed over by a producer, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Caller-defined data, forwarded verbatim to the remote.
    pub payload: serde_json::Value,
}

impl NewAction {
    pub fn new(kind: ActionKind, payload: serde_json::Value) -> Self {
        NewAction { kind, payload }
    }
}

/// A durably queued action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub payload: serde_json::Value,
    /// Capture time, stored as milliseconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Action {
    /// Builds the persisted form of `new` with its assigned id and capture time.
    pub fn from_new(id: ActionId, new: &NewAction, created_at: DateTime<Utc>) -> Self {
        Action {
            id,
            kind: new.kind,
            payload: new.payload.clone(),
            created_at,
        }
    }
}

/// Converts clock milliseconds into a timestamp, clamping unrepresentable values.
pub fn timestamp_from_ms(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
