// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use outbox_core::{ActionId, ActionKind};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_kind(s: &str) -> Result<ActionKind, String> {
    s.parse().map_err(|e: outbox_core::Error| e.to_string())
}

fn parse_id(s: &str) -> Result<ActionId, String> {
    s.parse().map_err(|e: outbox_core::Error| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "outbox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Durable offline action queue with in-order replay to a remote service")]
#[command(
    long_about = "Durable offline action queue with in-order replay to a remote service.\n\n\
    Actions captured while the remote is unreachable are stored locally and \
    submitted, oldest first, once it comes back."
)]
pub struct Cli {
    /// Directory holding the queue and config.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Queue an action for delivery
    #[command(after_help = "\
Examples:
  outbox enqueue shortage-report '{\"item\":\"arroz\"}'
  outbox enqueue production-event '{\"item\":\"feijão\"}' --sync
  outbox enqueue checklist-progress")]
    Enqueue {
        /// Action type: checklist-progress, production-event, shortage-report
        #[arg(value_parser = parse_kind)]
        kind: ActionKind,

        /// JSON payload forwarded verbatim to the remote (default: {})
        payload: Option<String>,

        /// Deliver right away if the remote is reachable
        #[arg(long)]
        sync: bool,
    },

    /// List queued actions, oldest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Remove one queued action (no-op if the id is unknown)
    #[command(arg_required_else_help = true)]
    Remove {
        /// Action id, as shown by `outbox list`
        #[arg(value_parser = parse_id)]
        id: ActionId,
    },

    /// Remove every queued action
    Clear,

    /// Submit queued actions to the remote now, stopping at the first failure
    Drain,

    /// Show the storage backend, pending count and remote
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Watch connectivity and drain whenever the remote becomes reachable
    Watch,

    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
