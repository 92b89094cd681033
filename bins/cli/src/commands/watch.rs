//! Watch command handler.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::{CliOutput, format_error_output, log_info};
use sigdex_infra::{LocalRunOptions, WatchReport, run_watch_local};
use std::time::Duration;

/// Run the root-change watcher for `duration`, then report the index size.
pub fn run_watch(
    mode: OutputMode,
    options: &LocalRunOptions,
    duration: Duration,
) -> Result<CliOutput, CliError> {
    let mut stderr = String::new();
    log_info(
        &mut stderr,
        &format!("watching for {}s", duration.as_secs()),
        mode.quiet,
    );

    let report = match run_watch_local(options, duration) {
        Ok(report) => report,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    log_info(&mut stderr, "watcher stopped", mode.quiet);

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "kind": "watch",
            "report": report,
        }))?
    } else {
        format_watch_text(&report)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn format_watch_text(report: &WatchReport) -> String {
    let last_scan = report
        .last_scan
        .map_or_else(|| "none".to_owned(), |stats| stats.to_string());
    format!(
        "status: ok\nwatchedMs: {}\nlastScan: {last_scan}\nindexedFiles: {}\nfunctions: {}\n",
        report.watched_ms, report.indexed_files, report.functions
    )
}
