//! Config loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{IndexerConfig, IndexerEnv, ValidatedIndexerConfig, apply_env_overrides};
use sigdex_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load the indexer config from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`IndexerEnv`)
/// - overrides JSON (partial config)
/// - config JSON (file content)
/// - defaults (`IndexerConfig::default()`)
pub fn load_indexer_config_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &IndexerEnv,
) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let mut config = match config_json {
        None => IndexerConfig::default(),
        Some(input) => parse_config_unvalidated(input, ConfigFormat::Json)?,
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        overrides.apply(&mut config);
    }

    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the indexer config from an optional file path.
pub fn load_indexer_config_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &IndexerEnv,
) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let mut config = match config_path {
        None => IndexerConfig::default(),
        Some(path) => {
            let config_text = read_config_file(path)?;
            let format = detect_config_format(path)?;
            parse_config_unvalidated(&config_text, format)?
        },
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        overrides.apply(&mut config);
    }

    apply_env_overrides(config, env)
}

/// Load the indexer config from std env and an optional file path.
pub fn load_indexer_config_std_env(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let env = IndexerEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_indexer_config_from_path(config_path, overrides_json, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &IndexerConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &IndexerConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<IndexerConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<IndexerConfigOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

/// Partial config: every field optional, unknown keys rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct IndexerConfigOverrides {
    version: Option<u32>,
    excluded_files_or_folders: Option<Vec<Box<str>>>,
    forget_deleted_files: Option<bool>,
    always_on_completions: Option<Vec<Box<str>>>,
    scan_timeout_seconds: Option<u64>,
    root_change_check_interval_seconds: Option<u64>,
    max_line_length: Option<u32>,
    file_extensions: Option<Vec<Box<str>>>,
    skip_minified_files: Option<bool>,
    signature_patterns: Option<Vec<Box<str>>>,
}

impl IndexerConfigOverrides {
    fn apply(self, config: &mut IndexerConfig) {
        set(&mut config.version, self.version);
        set(
            &mut config.excluded_files_or_folders,
            self.excluded_files_or_folders,
        );
        set(&mut config.forget_deleted_files, self.forget_deleted_files);
        set(&mut config.always_on_completions, self.always_on_completions);
        set(&mut config.scan_timeout_seconds, self.scan_timeout_seconds);
        set(
            &mut config.root_change_check_interval_seconds,
            self.root_change_check_interval_seconds,
        );
        set(&mut config.max_line_length, self.max_line_length);
        set(&mut config.file_extensions, self.file_extensions);
        set(&mut config.skip_minified_files, self.skip_minified_files);
        set(&mut config.signature_patterns, self.signature_patterns);
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
