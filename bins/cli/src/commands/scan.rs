//! Scan command handler.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::{CliOutput, format_error_output, log_info};
use sigdex_infra::{LocalRunOptions, ScanReport, run_scan_local};

/// Run one full crawl over the given roots.
pub fn run_scan(mode: OutputMode, options: &LocalRunOptions) -> Result<CliOutput, CliError> {
    let report = match run_scan_local(options) {
        Ok(report) => report,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    let message = if report.stats.aborted {
        "scan stopped at its deadline"
    } else {
        "scan completed"
    };
    log_info(&mut stderr, message, mode.quiet);

    let stdout = if mode.is_json() {
        pretty_json(&serde_json::json!({
            "status": "ok",
            "kind": "scan",
            "report": report,
        }))?
    } else {
        format_scan_text(&report)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn format_scan_text(report: &ScanReport) -> String {
    let mut out = String::from("status: ok\n");
    for root in &report.roots {
        out.push_str("root: ");
        out.push_str(root);
        out.push('\n');
    }
    out.push_str(&format!(
        "stats: {}\nindexedFiles: {}\nfunctions: {}\n",
        report.stats, report.indexed_files, report.functions
    ));
    out
}
