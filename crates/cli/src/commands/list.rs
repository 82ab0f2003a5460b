// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::SecondsFormat;
use serde::Serialize;

use outbox_core::{Action, ActionQueue, LazyQueue};

use crate::cli::OutputFormat;
use crate::error::Result;

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    actions: &'a [Action],
}

pub fn run(lazy: &LazyQueue, output: OutputFormat) -> Result<()> {
    run_impl(&*lazy.get()?, output, &mut std::io::stdout().lock())
}

/// Internal implementation that accepts the queue for testing.
pub(crate) fn run_impl(queue: &ActionQueue, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let actions = queue.list()?;

    match output {
        OutputFormat::Text => {
            for action in &actions {
                writeln!(out, "{}", format_action_line(action))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &ListOutputJson { actions: &actions })?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One tab-separated line: id, type, capture time, payload.
pub(crate) fn format_action_line(action: &Action) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        action.id,
        action.kind,
        action.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        action.payload
    )
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
