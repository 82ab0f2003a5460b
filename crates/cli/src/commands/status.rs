// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use outbox_core::{ActionQueue, Backend, LazyQueue};

use crate::cli::OutputFormat;
use crate::config::Context;
use crate::error::Result;

/// JSON output structure for the status command.
#[derive(Serialize)]
struct StatusJson<'a> {
    backend: Backend,
    pending: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote: Option<&'a str>,
    state_dir: &'a Path,
}

pub fn run(ctx: &Context, lazy: &LazyQueue, output: OutputFormat) -> Result<()> {
    run_impl(ctx, &*lazy.get()?, output, &mut std::io::stdout().lock())
}

/// Internal implementation that accepts the queue for testing.
pub(crate) fn run_impl(
    ctx: &Context,
    queue: &ActionQueue,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let status = StatusJson {
        backend: queue.backend(),
        pending: queue.len()?,
        remote: ctx.config.remote.as_ref().map(|r| r.url.as_str()),
        state_dir: &ctx.state_dir,
    };

    match output {
        OutputFormat::Text => {
            writeln!(out, "backend:   {}", status.backend)?;
            writeln!(out, "pending:   {}", status.pending)?;
            writeln!(out, "remote:    {}", status.remote.unwrap_or("(none)"))?;
            writeln!(out, "state dir: {}", status.state_dir.display())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &status)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
