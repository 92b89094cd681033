//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a present-but-invalid value fails fast instead of
//! silently falling back to the file or default value.

use crate::schema::{IndexerConfig, ValidatedIndexerConfig, normalize_extension};
use sigdex_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: CSV of excluded path substrings.
pub const ENV_EXCLUDED_FILES_OR_FOLDERS: &str = "SIGDEX_EXCLUDED_FILES_OR_FOLDERS";
/// Env var: hide completions from deleted files.
pub const ENV_FORGET_DELETED_FILES: &str = "SIGDEX_FORGET_DELETED_FILES";
/// Env var: CSV of always-on completion templates.
pub const ENV_ALWAYS_ON_COMPLETIONS: &str = "SIGDEX_ALWAYS_ON_COMPLETIONS";
/// Env var: crawl budget in seconds.
pub const ENV_SCAN_TIMEOUT_SECONDS: &str = "SIGDEX_SCAN_TIMEOUT_SECONDS";
/// Env var: watcher period in seconds.
pub const ENV_ROOT_CHANGE_CHECK_INTERVAL_SECONDS: &str =
    "SIGDEX_ROOT_CHANGE_CHECK_INTERVAL_SECONDS";
/// Env var: candidate line length cap.
pub const ENV_MAX_LINE_LENGTH: &str = "SIGDEX_MAX_LINE_LENGTH";
/// Env var: CSV of eligible file extensions.
pub const ENV_FILE_EXTENSIONS: &str = "SIGDEX_FILE_EXTENSIONS";
/// Env var: skip minified files.
pub const ENV_SKIP_MINIFIED_FILES: &str = "SIGDEX_SKIP_MINIFIED_FILES";

const ALL_ENV_VARS: [&str; 8] = [
    ENV_EXCLUDED_FILES_OR_FOLDERS,
    ENV_FORGET_DELETED_FILES,
    ENV_ALWAYS_ON_COMPLETIONS,
    ENV_SCAN_TIMEOUT_SECONDS,
    ENV_ROOT_CHANGE_CHECK_INTERVAL_SECONDS,
    ENV_MAX_LINE_LENGTH,
    ENV_FILE_EXTENSIONS,
    ENV_SKIP_MINIFIED_FILES,
];

const MAX_CSV_ITEMS: usize = 512;

/// Typed env-derived overrides for `IndexerConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexerEnv {
    /// Override for `excludedFilesOrFolders`.
    pub excluded_files_or_folders: Option<Vec<Box<str>>>,
    /// Override for `forgetDeletedFiles`.
    pub forget_deleted_files: Option<bool>,
    /// Override for `alwaysOnCompletions`.
    pub always_on_completions: Option<Vec<Box<str>>>,
    /// Override for `scanTimeoutSeconds`.
    pub scan_timeout_seconds: Option<u64>,
    /// Override for `rootChangeCheckIntervalSeconds`.
    pub root_change_check_interval_seconds: Option<u64>,
    /// Override for `maxLineLength`.
    pub max_line_length: Option<u32>,
    /// Override for `fileExtensions`.
    pub file_extensions: Option<Vec<Box<str>>>,
    /// Override for `skipMinifiedFiles`.
    pub skip_minified_files: Option<bool>,
}

impl IndexerEnv {
    /// Parse overrides from an explicit key/value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            excluded_files_or_folders: parse_optional_csv(map, ENV_EXCLUDED_FILES_OR_FOLDERS)?,
            forget_deleted_files: parse_optional_bool(map, ENV_FORGET_DELETED_FILES)?,
            always_on_completions: parse_optional_csv(map, ENV_ALWAYS_ON_COMPLETIONS)?,
            scan_timeout_seconds: parse_optional_u64(map, ENV_SCAN_TIMEOUT_SECONDS)?,
            root_change_check_interval_seconds: parse_optional_u64(
                map,
                ENV_ROOT_CHANGE_CHECK_INTERVAL_SECONDS,
            )?,
            max_line_length: parse_optional_u32(map, ENV_MAX_LINE_LENGTH)?,
            file_extensions: parse_optional_csv_extensions(map, ENV_FILE_EXTENSIONS)?,
            skip_minified_files: parse_optional_bool(map, ENV_SKIP_MINIFIED_FILES)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_owned(), value);
            }
        }
        Self::from_map(&map)
    }

    /// True when no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Apply env overrides on top of `base`, then validate and normalize.
pub fn apply_env_overrides(
    base: IndexerConfig,
    env: &IndexerEnv,
) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(value) = &env.excluded_files_or_folders {
        config.excluded_files_or_folders.clone_from(value);
    }
    if let Some(value) = env.forget_deleted_files {
        config.forget_deleted_files = value;
    }
    if let Some(value) = &env.always_on_completions {
        config.always_on_completions.clone_from(value);
    }
    if let Some(value) = env.scan_timeout_seconds {
        config.scan_timeout_seconds = value;
    }
    if let Some(value) = env.root_change_check_interval_seconds {
        config.root_change_check_interval_seconds = value;
    }
    if let Some(value) = env.max_line_length {
        config.max_line_length = value;
    }
    if let Some(value) = &env.file_extensions {
        config.file_extensions.clone_from(value);
    }
    if let Some(value) = env.skip_minified_files {
        config.skip_minified_files = value;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Typed env parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// CSV list exceeds a safety limit.
    CsvTooLarge {
        /// Env var name.
        var: &'static str,
        /// Number of parsed items.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// CSV contained an invalid extension entry.
    InvalidExtensionEntry {
        /// Env var name.
        var: &'static str,
        /// Invalid entry.
        entry: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::CsvTooLarge { .. } | Self::InvalidExtensionEntry { .. } => {
                ErrorCode::new("config", "invalid_env_csv")
            },
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
            Self::InvalidExtensionEntry { var, entry } => {
                write!(formatter, "{var} contains invalid extension entry: {entry}")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => {
                envelope = envelope.with_metadata("env_var", var);
            },
            EnvParseError::InvalidBool { var, value } | EnvParseError::InvalidInt { var, value } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value);
            },
            EnvParseError::CsvTooLarge { var, len, max } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
            EnvParseError::InvalidExtensionEntry { var, entry } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("entry", entry);
            },
        }

        envelope
    }
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: raw.clone(),
        }),
    }
}

/// A present-but-empty CSV var clears the list.
fn parse_optional_csv(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<Box<str>>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let items = parse_csv(raw);
    if items.len() > MAX_CSV_ITEMS {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: items.len(),
            max: MAX_CSV_ITEMS,
        });
    }
    Ok(Some(items.into_iter().map(String::into_boxed_str).collect()))
}

fn parse_optional_csv_extensions(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<Box<str>>>, EnvParseError> {
    let Some(items) = parse_optional_csv(map, var)? else {
        return Ok(None);
    };

    let mut normalized = Vec::with_capacity(items.len());
    for item in items {
        let candidate =
            normalize_extension(&item).ok_or_else(|| EnvParseError::InvalidExtensionEntry {
                var,
                entry: item.to_string(),
            })?;
        normalized.push(candidate);
    }
    normalized.sort_unstable();
    normalized.dedup();
    Ok(Some(normalized))
}

fn parse_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
