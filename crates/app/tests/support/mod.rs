//! Shared fixtures for app integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use sigdex_adapters::{RegexSignatureMatcher, SubstringExclusionFilter};
use sigdex_app::{AppContext, AppDeps, IndexerSettings, ScanCoordinator};
use sigdex_testkit::in_memory::{
    InMemoryFileSystem, LexicalPathNormalizer, RecordingLogger, StaticWorkspace,
};
use std::sync::Arc;

pub struct Harness {
    pub fs: InMemoryFileSystem,
    pub workspace: StaticWorkspace,
    pub logger: RecordingLogger,
    pub app: Arc<AppContext>,
}

impl Harness {
    pub fn new(fs: InMemoryFileSystem, exclusions: &[&str], settings: IndexerSettings) -> Self {
        let workspace = StaticWorkspace::default();
        let logger = RecordingLogger::default();
        let deps = AppDeps {
            filesystem: Arc::new(fs.clone()),
            path_normalizer: Arc::new(LexicalPathNormalizer),
            exclusion: Arc::new(SubstringExclusionFilter::new(exclusions.iter().copied())),
            matcher: Arc::new(RegexSignatureMatcher::builtin()),
            workspace: Arc::new(workspace.clone()),
            logger: Arc::new(logger.clone()),
        };
        Self {
            fs,
            workspace,
            logger,
            app: Arc::new(AppContext::new(deps, settings)),
        }
    }

    pub fn coordinator(&self) -> ScanCoordinator {
        ScanCoordinator::new(Arc::clone(&self.app))
    }

    pub fn indexed_names(&self, path: &str) -> Vec<String> {
        self.app
            .index()
            .get(path)
            .map(|record| record.iter().map(|sig| sig.name().to_owned()).collect())
            .unwrap_or_default()
    }
}

/// A small project: two eligible sources, one minified bundle, one
/// dependency under `node_modules`, and a non-script file.
pub fn sample_project() -> InMemoryFileSystem {
    InMemoryFileSystem::new()
        .with_file(
            "/proj/app.js",
            "function start(port, host) {}\nvar stop = function () {}\n",
        )
        .with_file(
            "/proj/src/util.js",
            "exports.clamp = function(value, lo, hi) {}\nfunction noop() {}\n",
        )
        .with_file("/proj/dist/app.min.js", "function packed(a) {}\n")
        .with_file("/proj/node_modules/dep/index.js", "function dep() {}\n")
        .with_file("/proj/README.md", "function notCode() {}\n")
}
