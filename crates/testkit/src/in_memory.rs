//! In-memory adapter implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests of the indexing engine
//! - Deterministic crawl and completion scenarios without touching disk
//! - Asserting on structured log events

use crate::errors::{not_found_error, permission_denied_error};
use sigdex_domain::normalize_lexical;
use sigdex_ports::{
    BoxFuture, FileSystemDirEntry, FileSystemEntryKind, FileSystemPort, LogEvent, LogFields,
    LoggerPort, PathNormalizerPort, WorkspacePort,
};
use sigdex_shared::{RequestContext, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

fn key_of(path: &Path) -> String {
    normalize_lexical(&path.to_string_lossy()).into()
}

#[derive(Debug, Default)]
struct FsState {
    files: BTreeMap<String, Box<str>>,
    unreadable: BTreeSet<String>,
    read_delay: Option<Duration>,
}

/// In-memory filesystem keyed by lexical `/`-separated paths.
///
/// Directories exist implicitly whenever a file lives beneath them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSystem {
    state: Arc<Mutex<FsState>>,
    reads: Arc<AtomicUsize>,
}

impl InMemoryFileSystem {
    /// Empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file insertion.
    #[must_use]
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.write(path, contents);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or replace a file.
    pub fn write(&self, path: &str, contents: &str) {
        self.lock()
            .files
            .insert(key_of(Path::new(path)), contents.into());
    }

    /// Delete a file. Returns true when it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.lock().files.remove(&key_of(Path::new(path))).is_some()
    }

    /// Make reads of `path` fail with `core:permission_denied`.
    pub fn deny_read(&self, path: &str) {
        self.lock().unreadable.insert(key_of(Path::new(path)));
    }

    /// Sleep this long before every file read completes.
    pub fn set_read_delay(&self, delay: Duration) {
        self.lock().read_delay = Some(delay);
    }

    /// Number of `read_file_lossy` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn list(&self, dir: &str) -> Option<Vec<FileSystemDirEntry>> {
        let state = self.lock();
        let prefix = if dir.ends_with('/') {
            dir.to_owned()
        } else {
            format!("{dir}/")
        };
        let mut children: BTreeMap<&str, FileSystemEntryKind> = BTreeMap::new();
        for path in state.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child, FileSystemEntryKind::Directory);
                },
                None => {
                    children.entry(rest).or_insert(FileSystemEntryKind::File);
                },
            }
        }
        if children.is_empty() {
            return None;
        }
        Some(
            children
                .into_iter()
                .map(|(name, kind)| FileSystemDirEntry::new(name, kind))
                .collect(),
        )
    }
}

impl FileSystemPort for InMemoryFileSystem {
    fn read_dir(
        &self,
        ctx: &RequestContext,
        dir: PathBuf,
    ) -> BoxFuture<'_, Result<Vec<FileSystemDirEntry>>> {
        let ctx = ctx.clone();
        Box::pin(async move {
            ctx.ensure_not_cancelled("fs.read_dir")?;
            let key = key_of(&dir);
            self.list(&key).ok_or_else(|| not_found_error(&key))
        })
    }

    fn read_file_lossy(
        &self,
        ctx: &RequestContext,
        file: PathBuf,
    ) -> BoxFuture<'_, Result<Box<str>>> {
        let ctx = ctx.clone();
        Box::pin(async move {
            ctx.ensure_not_cancelled("fs.read_file")?;
            self.reads.fetch_add(1, Ordering::SeqCst);
            let key = key_of(&file);
            let (delay, contents, denied) = {
                let state = self.lock();
                (
                    state.read_delay,
                    state.files.get(&key).cloned(),
                    state.unreadable.contains(&key),
                )
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if denied {
                return Err(permission_denied_error(&key));
            }
            contents.ok_or_else(|| not_found_error(&key))
        })
    }

    fn exists(&self, _ctx: &RequestContext, path: PathBuf) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let key = key_of(&path);
            let is_file = self.lock().files.contains_key(&key);
            is_file || self.list(&key).is_some()
        })
    }
}

/// Path normalizer that never touches disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalPathNormalizer;

impl PathNormalizerPort for LexicalPathNormalizer {
    fn normalize(&self, path: &Path) -> Box<str> {
        normalize_lexical(&path.to_string_lossy())
    }
}

#[derive(Debug, Default)]
struct OpenItems {
    folders: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

/// Workspace whose open folders and files are set by the test.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace {
    items: Arc<Mutex<OpenItems>>,
}

impl StaticWorkspace {
    /// Workspace with the given open folders and no open files.
    pub fn with_folders<I, P>(folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let workspace = Self::default();
        workspace.set_folders(folders);
        workspace
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OpenItems> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the open folders.
    pub fn set_folders<I, P>(&self, folders: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.lock().folders = folders.into_iter().map(Into::into).collect();
    }

    /// Replace the open files.
    pub fn set_files<I, P>(&self, files: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.lock().files = files.into_iter().map(Into::into).collect();
    }
}

impl WorkspacePort for StaticWorkspace {
    fn open_folders(&self) -> Vec<PathBuf> {
        self.lock().folders.clone()
    }

    fn open_files(&self) -> Vec<PathBuf> {
        self.lock().files.clone()
    }
}

/// Logger that keeps every event, including those from child loggers.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base: LogFields,
}

impl RecordingLogger {
    /// All recorded events in emission order.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded event names in emission order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.event.into_string())
            .collect()
    }

    /// Number of events named `event`.
    pub fn count(&self, event: &str) -> usize {
        self.events()
            .iter()
            .filter(|recorded| &*recorded.event == event)
            .count()
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base.is_empty() {
            let mut fields = self.base.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base = self.base.clone();
        base.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base,
        })
    }
}
