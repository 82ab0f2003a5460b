// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! outboxrs - durable offline action queue with in-order replay.
//!
//! This crate provides the `outbox` CLI: actions that could not reach the
//! remote collection service are queued locally (see [`outbox_core`]) and
//! replayed, oldest first, once the remote is reachable again.
//!
//! # Main Components
//!
//! - [`sync`] - Submitter, connectivity monitor and drain coordinator
//! - [`Config`] - `config.toml` in the state directory
//! - [`Error`] - Error types for all operations
//!
//! # Draining from code
//!
//! ```rust,ignore
//! use outboxrs::sync::{SyncCoordinator, WebSocketSubmitter};
//!
//! let queue = Arc::new(ActionQueue::open(&paths, BackendPreference::Auto)?);
//! let submitter = WebSocketSubmitter::new("ws://localhost:7890", connect_timeout);
//! let coordinator = SyncCoordinator::new(queue, submitter, submit_timeout);
//! let report = coordinator.drain().await?;
//! println!("{report}");
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{Config, Context, RemoteConfig};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;
use outbox_core::LazyQueue;
use tracing_subscriber::EnvFilter;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(log_level(&cli));

    if let Command::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "outbox", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::load(cli.state_dir)?;
    tracing::debug!(state_dir = %ctx.state_dir.display(), "context loaded");
    let queue = LazyQueue::new(ctx.store_paths(), ctx.config.store.backend);

    match cli.command {
        Command::Enqueue {
            kind,
            payload,
            sync,
        } => commands::enqueue::run(&ctx, &queue, kind, payload.as_deref(), sync),
        Command::List { output } => commands::list::run(&queue, output),
        Command::Remove { id } => commands::remove::run(&queue, id),
        Command::Clear => commands::clear::run(&queue),
        Command::Drain => commands::drain::run(&ctx, &queue),
        Command::Status { output } => commands::status::run(&ctx, &queue, output),
        Command::Watch => commands::watch::run(&ctx, &queue),
        Command::Completion { .. } => Ok(()),
    }
}

/// Default filter: `debug` with `-v`, `info` for `watch`, otherwise `warn`.
pub(crate) fn log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if matches!(cli.command, Command::Watch) {
        "info"
    } else {
        "warn"
    }
}

/// Logs to stderr so stdout stays machine readable. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
