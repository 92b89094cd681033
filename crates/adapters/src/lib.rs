//! # sigdex-adapters
//!
//! Adapter implementations for ports: local filesystem and path resolution,
//! substring exclusion, regex signature matching, live-buffer scanning, and
//! structured JSON logging.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod buffer;
pub mod exclusion;
pub mod fs;
pub mod log_sink;
pub mod logger;
pub mod matcher;

pub use buffer::BufferSymbolScanner;
pub use exclusion::SubstringExclusionFilter;
pub use fs::{LocalFileSystem, LocalPathNormalizer};
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use matcher::{DEFAULT_SIGNATURE_PATTERNS, MatcherError, RegexSignatureMatcher};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
