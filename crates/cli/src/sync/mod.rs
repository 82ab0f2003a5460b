// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued actions to the remote collection service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ events ┌─────────────────┐ submit ┌─────────────┐
//! │   watch     │───────►│ SyncCoordinator │───────►│  Submitter  │──► remote
//! │ (probe +    │        │  (drain/dispatch)│◄───────│   (trait)   │
//! │  monitor)   │        └─────────────────┘  ack   └─────────────┘
//! └─────────────┘                 │
//!                                 ▼
//!                        ┌─────────────────┐
//!                        │   ActionQueue   │  (durable, outbox-core)
//!                        └─────────────────┘
//! ```
//!
//! - Edge-triggered connectivity events from a polling probe
//! - In-order drain that stops at the first failed submission
//! - Removal only after the remote acknowledges an action
//! - Injectable submitter and probe traits for testing

mod coordinator;
mod monitor;
mod submitter;

pub use coordinator::{Dispatched, DrainReport, SyncCoordinator};
pub use monitor::{watch, ConnectivityEvent, ConnectivityMonitor, ConnectivityProbe, TcpProbe};
pub use submitter::{RemoteSubmitter, SubmitError, SubmitResult, WebSocketSubmitter};

#[cfg(test)]
pub(crate) mod test_helpers;
