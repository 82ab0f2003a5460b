// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic millisecond clock.
//!
//! Capture timestamps and fallback-store identifiers both come from a
//! [`MonotonicClock`], which never returns the same reading twice within a
//! process even if the wall clock stalls or steps backwards.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that produces strictly increasing millisecond readings.
pub struct MonotonicClock {
    source: Box<dyn ClockSource>,
    last_ms: Mutex<u64>,
}

impl MonotonicClock {
    /// Creates a monotonic clock backed by the system clock.
    pub fn new() -> Self {
        Self::with_source(SystemClock)
    }

    /// Creates a monotonic clock with a custom clock source.
    pub fn with_source(source: impl ClockSource + 'static) -> Self {
        MonotonicClock {
            source: Box::new(source),
            last_ms: Mutex::new(0),
        }
    }

    /// Returns the next reading: the wall clock if it advanced, otherwise
    /// one past the previous reading.
    pub fn now_ms(&self) -> u64 {
        self.at_least(0)
    }

    /// Returns the next reading, no smaller than `floor`.
    ///
    /// Used to keep identifiers ahead of ones persisted by earlier processes.
    pub fn at_least(&self, floor: u64) -> u64 {
        let physical = self.source.now_ms();
        let mut last = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());

        let next = physical.max(floor).max(last.saturating_add(1));
        *last = next;
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last = *self.last_ms.lock().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("MonotonicClock")
            .field("last_ms", &last)
            .finish()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
