//! Filesystem boundary contract.
//!
//! Paths are absolute. The crawler builds them from normalized roots, so the
//! port never sees relative input.

use crate::BoxFuture;
use sigdex_shared::{RequestContext, Result};
use std::path::PathBuf;

/// File system entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemEntryKind {
    /// Regular file, or a symlink resolving to one.
    File,
    /// Directory (never a symlinked one).
    Directory,
    /// Anything else: sockets, dangling links, symlinked directories.
    Other,
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemDirEntry {
    /// Entry name (single path segment).
    pub name: Box<str>,
    /// Entry kind.
    pub kind: FileSystemEntryKind,
}

impl FileSystemDirEntry {
    /// Build an entry.
    pub fn new(name: impl Into<Box<str>>, kind: FileSystemEntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Boundary contract for filesystem access.
pub trait FileSystemPort: Send + Sync {
    /// List directory entries. Order is unspecified; callers sort.
    fn read_dir(
        &self,
        ctx: &RequestContext,
        dir: PathBuf,
    ) -> BoxFuture<'_, Result<Vec<FileSystemDirEntry>>>;

    /// Read a file as text, replacing undecodable bytes with U+FFFD.
    fn read_file_lossy(
        &self,
        ctx: &RequestContext,
        file: PathBuf,
    ) -> BoxFuture<'_, Result<Box<str>>>;

    /// True when something (including a dangling symlink) exists at `path`.
    fn exists(&self, ctx: &RequestContext, path: PathBuf) -> BoxFuture<'_, bool>;
}
