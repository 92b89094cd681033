//! Complete command handler.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::{CliOutput, format_error_output, log_info};
use sigdex_domain::CompletionEntry;
use sigdex_infra::{LocalRunOptions, run_complete_local};
use std::path::Path;

/// Crawl, then print the completion entries for `prefix`.
pub fn run_complete(
    mode: OutputMode,
    options: &LocalRunOptions,
    prefix: &str,
    buffer: Option<&Path>,
) -> Result<CliOutput, CliError> {
    let entries = match run_complete_local(options, prefix, buffer) {
        Ok(entries) => entries,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(
        &mut stderr,
        &format!("{} completions", entries.len()),
        mode.quiet,
    );

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "kind": "complete",
            "prefix": prefix,
            "entries": entries,
        }))?
    } else {
        format_entries_text(&entries)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// One `label => template` line per entry, in serving order.
fn format_entries_text(entries: &[CompletionEntry]) -> String {
    entries.iter().map(|entry| format!("{entry}\n")).collect()
}
