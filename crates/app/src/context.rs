//! Application context: settings, ports, and the shared engine state.

use crate::index::FileIndex;
use crate::parser::FileParser;
use crate::scan_state::ScanState;
use sigdex_domain::{CompletionEntry, FileTypePolicy};
use sigdex_ports::{
    ExclusionPort, FileSystemPort, LoggerPort, PathNormalizerPort, SignatureMatcherPort,
    WorkspacePort,
};
use std::sync::Arc;
use std::time::Duration;

/// Runtime settings resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerSettings {
    /// Which files are indexed.
    pub file_types: FileTypePolicy,
    /// Skip indexed files that are gone from disk when completing.
    pub forget_deleted_files: bool,
    /// Entries offered ahead of everything else.
    pub always_on: Vec<CompletionEntry>,
    /// Budget for one full crawl.
    pub scan_timeout: Duration,
    /// Watcher period.
    pub root_change_check_interval: Duration,
    /// Lines at or above this many characters are skipped.
    pub max_line_length: usize,
}

impl IndexerSettings {
    /// Replace the always-on entries with ones built from templates.
    #[must_use]
    pub fn with_always_on<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.always_on = templates
            .into_iter()
            .map(|template| CompletionEntry::always_on(template.as_ref()))
            .collect();
        self
    }
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            file_types: FileTypePolicy::default(),
            forget_deleted_files: false,
            always_on: Vec::new(),
            scan_timeout: Duration::from_secs(60),
            root_change_check_interval: Duration::from_secs(5),
            max_line_length: 300,
        }
    }
}

/// Ports the engine runs against.
#[derive(Clone)]
pub struct AppDeps {
    /// File reads, directory listings, existence checks.
    pub filesystem: Arc<dyn FileSystemPort>,
    /// Canonical cache keys.
    pub path_normalizer: Arc<dyn PathNormalizerPort>,
    /// Configured exclusion rules.
    pub exclusion: Arc<dyn ExclusionPort>,
    /// Line-level signature rules.
    pub matcher: Arc<dyn SignatureMatcherPort>,
    /// Open folders and files of the host editor.
    pub workspace: Arc<dyn WorkspacePort>,
    /// Structured event sink.
    pub logger: Arc<dyn LoggerPort>,
}

/// Everything one indexer generation owns. A settings change builds a new
/// context rather than mutating this one.
pub struct AppContext {
    deps: AppDeps,
    settings: IndexerSettings,
    parser: FileParser,
    index: FileIndex,
    scan_state: ScanState,
}

impl AppContext {
    /// Assemble a context with an empty index.
    #[must_use]
    pub fn new(deps: AppDeps, settings: IndexerSettings) -> Self {
        let parser = FileParser::new(
            Arc::clone(&deps.filesystem),
            Arc::clone(&deps.matcher),
            settings.max_line_length,
        );
        Self {
            deps,
            settings,
            parser,
            index: FileIndex::new(),
            scan_state: ScanState::new(),
        }
    }

    /// Ports.
    #[must_use]
    pub const fn deps(&self) -> &AppDeps {
        &self.deps
    }

    /// Resolved settings.
    #[must_use]
    pub const fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    /// File parser sharing this context's matcher and line limit.
    #[must_use]
    pub const fn parser(&self) -> &FileParser {
        &self.parser
    }

    /// The signature cache.
    #[must_use]
    pub const fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Scan gate and diagnostics.
    #[must_use]
    pub const fn scan_state(&self) -> &ScanState {
        &self.scan_state
    }

    /// Logger port.
    #[must_use]
    pub fn logger(&self) -> &dyn LoggerPort {
        self.deps.logger.as_ref()
    }

    /// True when `path` (normalized) is excluded by configuration.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.deps.exclusion.is_excluded(path)
    }

    /// True when `path` is neither excluded nor of an ineligible type.
    #[must_use]
    pub fn is_candidate(&self, path: &str) -> bool {
        !self.is_excluded(path) && self.settings.file_types.is_eligible(path)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("indexed_files", &self.index.len())
            .field("scan_running", &self.scan_state.is_running())
            .finish_non_exhaustive()
    }
}
