// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing.
//!
//! `TestContext` owns a temporary state directory and the lazily opened
//! queue inside it, so commands run against real storage without touching
//! the user's state.
//!
//! ```rust,ignore
//! use crate::commands::testing::TestContext;
//!
//! #[test]
//! fn test_some_command() {
//!     let ctx = TestContext::new();
//!     ctx.enqueue(ActionKind::ShortageReport, "arroz");
//!     // Run command logic against ctx.queue()
//! }
//! ```

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use outbox_core::{ActionId, ActionKind, ActionQueue, BackendPreference, LazyQueue, NewAction};

use crate::config::{Config, Context, RemoteConfig};
use crate::sync::test_helpers::queued_items;

/// Temporary state directory plus the queue living in it.
pub struct TestContext {
    pub ctx: Context,
    pub lazy: LazyQueue,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Context whose config forces the fallback store.
    pub fn fallback() -> Self {
        let mut config = Config::default();
        config.store.backend = BackendPreference::Fallback;
        Self::with_config(config)
    }

    /// Context with a remote configured at `url`.
    pub fn with_remote(url: &str) -> Self {
        Self::with_config(Config {
            remote: Some(RemoteConfig::new(url)),
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let ctx = Context {
            state_dir: temp_dir.path().to_path_buf(),
            config,
        };
        let lazy = LazyQueue::new(ctx.store_paths(), ctx.config.store.backend);
        TestContext {
            ctx,
            lazy,
            _temp_dir: temp_dir,
        }
    }

    pub fn queue(&self) -> Arc<ActionQueue> {
        self.lazy.get().unwrap()
    }

    /// Enqueues an action with payload `{"item": item}`.
    pub fn enqueue(&self, kind: ActionKind, item: &str) -> ActionId {
        self.queue()
            .enqueue(NewAction::new(kind, json!({ "item": item })))
            .unwrap()
    }

    pub fn items(&self) -> Vec<String> {
        queued_items(&self.queue())
    }
}

/// Captured output as text.
pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

mod helpers {
    use super::*;
    use crate::commands::{coordinator_for, probe_for};
    use crate::error::Error;
    use yare::parameterized;

    #[test]
    fn test_context_is_isolated() {
        let a = TestContext::new();
        let b = TestContext::new();
        a.enqueue(ActionKind::ShortageReport, "arroz");

        assert_eq!(a.items(), vec!["arroz"]);
        assert!(b.items().is_empty());
    }

    #[test]
    fn test_fallback_context_uses_fallback_backend() {
        let ctx = TestContext::fallback();
        assert_eq!(ctx.queue().backend(), outbox_core::Backend::Fallback);
    }

    #[test]
    fn test_probe_for_remote() {
        let probe = probe_for(&RemoteConfig::new("wss://sync.example.com/outbox")).unwrap();
        assert_eq!(probe.addr(), "sync.example.com:443");
    }

    #[parameterized(
        http = { "http://sync.example.com" },
        no_host = { "ws:///path" },
        garbage = { "not a url" },
    )]
    fn test_invalid_remote_rejected(url: &str) {
        let remote = RemoteConfig::new(url);
        let ctx = TestContext::new();

        assert!(matches!(
            probe_for(&remote),
            Err(Error::InvalidRemoteUrl { .. })
        ));
        assert!(matches!(
            coordinator_for(ctx.queue(), &remote),
            Err(Error::InvalidRemoteUrl { .. })
        ));
    }
}
