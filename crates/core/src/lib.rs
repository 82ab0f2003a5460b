// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outbox-core: durable action queue for offline-first clients.
//!
//! This crate holds the data model, the two durable stores (SQLite and a
//! single-file JSON fallback), the queue facade over them, and the wire
//! protocol used to replay queued actions to the remote service.

pub mod action;
pub mod clock;
pub mod error;
pub mod protocol;
pub mod queue;
pub mod store;

pub use action::{Action, ActionId, ActionKind, NewAction};
pub use clock::{ClockSource, MonotonicClock, SystemClock};
pub use error::{Error, Result};
pub use protocol::{ClientMessage, ServerMessage};
pub use queue::{ActionQueue, LazyQueue};
pub use store::{open_store, Backend, BackendPreference, DurableStore, StorePaths};
