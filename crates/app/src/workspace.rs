//! Point-in-time view of what the editor has open.

use crate::context::AppContext;
use sigdex_domain::{FolderSet, parent};
use std::collections::HashSet;

/// Crawl inputs derived from the editor's open folders and files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    roots: FolderSet,
    tracked_files: Vec<Box<str>>,
}

impl WorkspaceSnapshot {
    /// Build a snapshot from explicit normalized inputs.
    pub fn new<I, S>(roots: FolderSet, tracked_files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let mut seen = HashSet::new();
        let tracked_files = tracked_files
            .into_iter()
            .map(Into::into)
            .filter(|path: &Box<str>| seen.insert(path.clone()))
            .collect();
        Self {
            roots,
            tracked_files,
        }
    }

    /// Query the workspace port and normalize everything it reports.
    ///
    /// Excluded folders are dropped. Open files are tracked only when they are
    /// crawl candidates, and only tracked files contribute their directories
    /// to the roots. The result is reduced so no root nests inside another.
    pub fn capture(app: &AppContext) -> Self {
        let deps = app.deps();
        let folders: Vec<Box<str>> = deps
            .workspace
            .open_folders()
            .iter()
            .map(|folder| deps.path_normalizer.normalize(folder))
            .filter(|folder| !app.is_excluded(folder))
            .collect();
        let tracked: Vec<Box<str>> = deps
            .workspace
            .open_files()
            .iter()
            .map(|file| deps.path_normalizer.normalize(file))
            .filter(|file| app.is_candidate(file))
            .collect();

        let file_dirs = tracked.iter().filter_map(|file| parent(file));
        let roots = FolderSet::reduce(
            folders
                .iter()
                .map(AsRef::as_ref)
                .chain(file_dirs),
        );
        Self::new(roots, tracked)
    }

    /// Reduced crawl roots.
    #[must_use]
    pub const fn roots(&self) -> &FolderSet {
        &self.roots
    }

    /// Open files crawled ahead of the roots.
    #[must_use]
    pub fn tracked_files(&self) -> &[Box<str>] {
        &self.tracked_files
    }
}
