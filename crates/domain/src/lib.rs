//! # sigdex-domain
//!
//! Pure value types and algorithms for the signature index.
//!
//! - **Signatures** - `FunctionSignature`, `CompletionEntry`
//! - **Records** - `FileRecord`, `FileRecordBuilder`
//! - **Paths** - lexical normalization, descendant checks, basenames
//! - **Folders** - `FolderSet` reduction for crawl roots
//! - **Lines** - terminator-aware line splitting
//! - **Eligibility** - `FileTypePolicy`
//! - **Statistics** - `ScanStatistics`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use sigdex_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod completion;
pub mod eligibility;
pub mod folders;
pub mod lines;
pub mod paths;
pub mod record;
pub mod signature;
pub mod stats;

pub use completion::{CompletionRequest, LiveBufferSymbols};
pub use eligibility::FileTypePolicy;
pub use folders::{FolderSet, reduce_folders};
pub use lines::{SourceLine, source_lines};
pub use paths::{basename, is_descendant_or_equal, normalize_lexical, parent};
pub use record::{FileRecord, FileRecordBuilder};
pub use signature::{CompletionEntry, FunctionSignature};
pub use stats::ScanStatistics;

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_crate_compiles() {
        assert!(!domain_crate_version().is_empty());
        assert_eq!(domain_crate_version(), shared_crate_version());
    }
}
