//! # sigdex-app
//!
//! The indexing engine: signature cache, single-flight crawl scheduling,
//! root-change detection, single-file reparses, and completion serving.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod completion;
pub mod context;
pub mod coordinator;
pub mod crawler;
pub mod index;
pub mod parser;
pub mod scan_state;
pub mod workspace;

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use completion::CompletionServer;
pub use context::{AppContext, AppDeps, IndexerSettings};
pub use coordinator::{ReparseOutcome, ReparseTrigger, RootCheck, ScanCoordinator, ScanOutcome};
pub use crawler::{CrawlMode, crawl};
pub use index::FileIndex;
pub use parser::FileParser;
pub use scan_state::{ScanDeadline, ScanGuard, ScanState};
pub use workspace::WorkspaceSnapshot;
