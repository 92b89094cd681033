//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, pretty_json};
use crate::{CliOutput, format_error_output, log_info};
use clap::ValueEnum;
use sigdex_infra::{ConfigFormat, load_effective_config, load_effective_config_json, validate_env_parsing};
use std::collections::BTreeMap;
use std::path::Path;

/// Rendering choices for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormatArg {
    /// Pretty JSON.
    Json,
    /// Pretty TOML.
    Toml,
}

impl From<ConfigFormatArg> for ConfigFormat {
    fn from(value: ConfigFormatArg) -> Self {
        match value {
            ConfigFormatArg::Json => Self::Json,
            ConfigFormatArg::Toml => Self::Toml,
        }
    }
}

/// Print the effective config in `format`.
///
/// The raw rendering goes to stdout in text mode; `--output json` wraps it.
pub fn run_config_show(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
    format: ConfigFormatArg,
) -> Result<CliOutput, CliError> {
    let rendered = match load_effective_config(env, path, overrides_json, format.into()) {
        Ok(rendered) => rendered,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let stdout = if mode.is_json() {
        let effective = match format {
            ConfigFormatArg::Json => serde_json::from_str(rendered.trim())?,
            ConfigFormatArg::Toml => serde_json::Value::String(rendered),
        };
        pretty_json(&serde_json::json!({
            "status": "ok",
            "effectiveConfig": effective,
        }))?
    } else {
        ensure_trailing_newline(rendered)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Validate env overrides and config sources without printing the config.
pub fn run_config_check(
    mode: OutputMode,
    env: &BTreeMap<String, String>,
    path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<CliOutput, CliError> {
    let checked = validate_env_parsing(env)
        .and_then(|()| load_effective_config_json(env, path, overrides_json));
    let config_json = match checked {
        Ok(config) => config,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.quiet);

    let stdout = if mode.is_json() {
        let config_value: serde_json::Value = serde_json::from_str(config_json.trim())?;
        pretty_json(&serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().into_owned()),
            "effectiveConfig": config_value,
        }))?
    } else {
        path.map_or_else(
            || "status: ok\nconfig: ok\n".to_owned(),
            |path| format!("status: ok\nconfig: ok\npath: {}\n", path.to_string_lossy()),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
