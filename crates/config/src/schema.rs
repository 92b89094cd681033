//! Indexer configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization enforces stable ordering for set-like list fields; the
//!   always-on completion list keeps its declared order.

use sigdex_domain::FileTypePolicy;
use sigdex_shared::{BoundedU32, BoundedU64, ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const SCAN_TIMEOUT_MIN_SECS: u64 = 1;
const SCAN_TIMEOUT_MAX_SECS: u64 = 3_600;
const SCAN_TIMEOUT_DEFAULT_SECS: u64 = 60;
const ROOT_CHECK_INTERVAL_MIN_SECS: u64 = 1;
const ROOT_CHECK_INTERVAL_MAX_SECS: u64 = 3_600;
const ROOT_CHECK_INTERVAL_DEFAULT_SECS: u64 = 5;
const MAX_LINE_LENGTH_MIN: u32 = 1;
const MAX_LINE_LENGTH_MAX: u32 = 100_000;
const MAX_LINE_LENGTH_DEFAULT: u32 = 300;

/// Upper bound on entries of any list field after normalization.
pub const MAX_LIST_ENTRIES: usize = 512;

const SECTION: &str = "indexer";

/// Top-level indexer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct IndexerConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Case-insensitive substrings; any path containing one is skipped.
    pub excluded_files_or_folders: Vec<Box<str>>,
    /// Hide completions from indexed files that no longer exist on disk.
    pub forget_deleted_files: bool,
    /// Insertion templates offered ahead of every other completion.
    pub always_on_completions: Vec<Box<str>>,
    /// Budget for one full crawl, in seconds.
    pub scan_timeout_seconds: u64,
    /// Period of the root-change watcher, in seconds.
    pub root_change_check_interval_seconds: u64,
    /// Lines at or above this many characters are never matched.
    pub max_line_length: u32,
    /// Eligible file extensions (without the leading dot).
    pub file_extensions: Vec<Box<str>>,
    /// Skip files whose name contains `.min.`.
    pub skip_minified_files: bool,
    /// Custom signature rules; empty selects the built-in rules.
    pub signature_patterns: Vec<Box<str>>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            excluded_files_or_folders: Vec::new(),
            forget_deleted_files: false,
            always_on_completions: Vec::new(),
            scan_timeout_seconds: SCAN_TIMEOUT_DEFAULT_SECS,
            root_change_check_interval_seconds: ROOT_CHECK_INTERVAL_DEFAULT_SECS,
            max_line_length: MAX_LINE_LENGTH_DEFAULT,
            file_extensions: vec!["js".into()],
            skip_minified_files: true,
            signature_patterns: Vec::new(),
        }
    }
}

impl IndexerConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedIndexerConfig, ConfigSchemaError> {
        self.validate_version()?;

        self.excluded_files_or_folders = normalize_exclusions(&self.excluded_files_or_folders);
        self.always_on_completions = normalize_ordered_list(&self.always_on_completions);
        self.file_extensions = normalize_extensions(&self.file_extensions)?;
        self.signature_patterns = normalize_ordered_list(&self.signature_patterns);

        ensure_list_size("excludedFilesOrFolders", self.excluded_files_or_folders.len())?;
        ensure_list_size("alwaysOnCompletions", self.always_on_completions.len())?;
        ensure_list_size("fileExtensions", self.file_extensions.len())?;
        ensure_list_size("signaturePatterns", self.signature_patterns.len())?;
        if self.file_extensions.is_empty() {
            return Err(ConfigSchemaError::EmptyList {
                section: SECTION,
                field: "fileExtensions",
            });
        }

        let limits = ConfigLimits::new(&self)?;
        Ok(ValidatedIndexerConfig { raw: self, limits })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

/// Validated config wrapper carrying bounded numeric values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIndexerConfig {
    raw: IndexerConfig,
    limits: ConfigLimits,
}

impl ValidatedIndexerConfig {
    /// Access validated numeric bounds.
    #[must_use]
    pub const fn limits(&self) -> &ConfigLimits {
        &self.limits
    }

    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &IndexerConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> IndexerConfig {
        self.raw
    }

    /// Crawl budget as a duration.
    #[must_use]
    pub const fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.scan_timeout_seconds.get())
    }

    /// Watcher period as a duration.
    #[must_use]
    pub const fn root_change_check_interval(&self) -> Duration {
        Duration::from_secs(self.limits.root_change_check_interval_seconds.get())
    }

    /// Maximum candidate line length, in characters.
    #[must_use]
    pub fn max_line_length(&self) -> usize {
        usize::try_from(self.limits.max_line_length.get()).unwrap_or(usize::MAX)
    }

    /// Eligibility policy derived from `fileExtensions` and `skipMinifiedFiles`.
    #[must_use]
    pub fn file_type_policy(&self) -> FileTypePolicy {
        FileTypePolicy::new(
            self.raw.file_extensions.iter().map(AsRef::as_ref),
            self.raw.skip_minified_files,
        )
    }
}

impl AsRef<IndexerConfig> for ValidatedIndexerConfig {
    fn as_ref(&self) -> &IndexerConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedIndexerConfig {
    type Target = IndexerConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Validated numeric limits derived from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLimits {
    /// Crawl budget (seconds).
    pub scan_timeout_seconds: BoundedU64<SCAN_TIMEOUT_MIN_SECS, SCAN_TIMEOUT_MAX_SECS>,
    /// Watcher period (seconds).
    pub root_change_check_interval_seconds:
        BoundedU64<ROOT_CHECK_INTERVAL_MIN_SECS, ROOT_CHECK_INTERVAL_MAX_SECS>,
    /// Candidate line length cap.
    pub max_line_length: BoundedU32<MAX_LINE_LENGTH_MIN, MAX_LINE_LENGTH_MAX>,
}

impl ConfigLimits {
    fn new(config: &IndexerConfig) -> Result<Self, ConfigSchemaError> {
        Ok(Self {
            scan_timeout_seconds: bounded_u64(
                "scanTimeoutSeconds",
                config.scan_timeout_seconds,
                SCAN_TIMEOUT_MIN_SECS,
                SCAN_TIMEOUT_MAX_SECS,
            )?,
            root_change_check_interval_seconds: bounded_u64(
                "rootChangeCheckIntervalSeconds",
                config.root_change_check_interval_seconds,
                ROOT_CHECK_INTERVAL_MIN_SECS,
                ROOT_CHECK_INTERVAL_MAX_SECS,
            )?,
            max_line_length: bounded_u32(
                "maxLineLength",
                config.max_line_length,
                MAX_LINE_LENGTH_MIN,
                MAX_LINE_LENGTH_MAX,
            )?,
        })
    }
}

/// Parse an indexer config from a JSON string, applying validation and normalization.
pub fn parse_indexer_config_json(input: &str) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let config: IndexerConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse an indexer config from a TOML string, applying validation and normalization.
pub fn parse_indexer_config_toml(input: &str) -> Result<ValidatedIndexerConfig, ErrorEnvelope> {
    let config: IndexerConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Typed schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file (e.g. `scanTimeoutSeconds`).
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// A list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Number of entries after normalization/deduplication.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// A list field that needs at least one entry is empty.
    EmptyList {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
    },
    /// A file extension entry is invalid.
    InvalidExtension {
        /// Invalid extension value.
        extension: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::EmptyList { .. } => ErrorCode::new("config", "empty_list"),
            Self::InvalidExtension { .. } => ErrorCode::new("config", "invalid_extension"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be within [{min}, {max}] (got {value})"
            ),
            Self::ListTooLarge {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} must have at most {max} entries (got {len})"
            ),
            Self::EmptyList { section, field } => {
                write!(formatter, "{section}.{field} must not be empty")
            },
            Self::InvalidExtension { extension } => {
                write!(formatter, "invalid extension entry: {extension}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => {
                envelope = envelope
                    .with_metadata("found", found.to_string())
                    .with_metadata("supported", supported.to_string());
            },
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("value", value.to_string())
                    .with_metadata("min", min.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::ListTooLarge {
                section,
                field,
                len,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::EmptyList { section, field } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field);
            },
            ConfigSchemaError::InvalidExtension { extension } => {
                envelope = envelope.with_metadata("extension", extension);
            },
        }

        envelope
    }
}

fn bounded_u32<const MIN: u32, const MAX: u32>(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<BoundedU32<MIN, MAX>, ConfigSchemaError> {
    BoundedU32::try_new(value).map_err(|_| ConfigSchemaError::LimitOutOfRange {
        section: SECTION,
        field,
        value: u64::from(value),
        min: u64::from(min),
        max: u64::from(max),
    })
}

fn bounded_u64<const MIN: u64, const MAX: u64>(
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<BoundedU64<MIN, MAX>, ConfigSchemaError> {
    BoundedU64::try_new(value).map_err(|_| ConfigSchemaError::LimitOutOfRange {
        section: SECTION,
        field,
        value,
        min,
        max,
    })
}

const fn ensure_list_size(field: &'static str, len: usize) -> Result<(), ConfigSchemaError> {
    if len > MAX_LIST_ENTRIES {
        return Err(ConfigSchemaError::ListTooLarge {
            section: SECTION,
            field,
            len,
            max: MAX_LIST_ENTRIES,
        });
    }
    Ok(())
}

/// Normalize one extension entry: trims, drops `*.`/`.` prefixes, lowercases.
pub(crate) fn normalize_extension(raw: &str) -> Option<Box<str>> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("*.").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
    let candidate = trimmed.to_ascii_lowercase();

    if candidate.is_empty() || !candidate.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    Some(candidate.into_boxed_str())
}

fn normalize_extensions(input: &[Box<str>]) -> Result<Vec<Box<str>>, ConfigSchemaError> {
    let mut normalized = Vec::with_capacity(input.len());
    for ext in input {
        let candidate =
            normalize_extension(ext).ok_or_else(|| ConfigSchemaError::InvalidExtension {
                extension: ext.trim().to_owned(),
            })?;
        normalized.push(candidate);
    }

    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// Normalize one exclusion rule the way paths are normalized before matching.
pub(crate) fn normalize_exclusion(raw: &str) -> Option<Box<str>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let replaced = trimmed.replace('\\', "/").to_lowercase();
    Some(collapse_forward_slashes(&replaced).into_boxed_str())
}

fn normalize_exclusions(input: &[Box<str>]) -> Vec<Box<str>> {
    let mut normalized: Vec<Box<str>> = input
        .iter()
        .filter_map(|rule| normalize_exclusion(rule))
        .collect();
    normalized.sort_unstable();
    normalized.dedup();
    normalized
}

fn normalize_ordered_list(input: &[Box<str>]) -> Vec<Box<str>> {
    let mut seen = HashSet::new();
    input
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(*entry))
        .map(Into::into)
        .collect()
}

fn collapse_forward_slashes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut previous_was_slash = false;

    for ch in input.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        output.push(ch);
    }

    output
}
