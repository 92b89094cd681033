//! Editor workspace boundary contract.

use std::path::PathBuf;

/// What the editor currently has open, as raw paths.
pub trait WorkspacePort: Send + Sync {
    /// Folders open in any editor window.
    fn open_folders(&self) -> Vec<PathBuf>;

    /// Files open in any editor view.
    fn open_files(&self) -> Vec<PathBuf>;
}
