//! The signature cache: normalized file path to extracted record.

use sigdex_domain::FileRecord;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe map of normalized paths to immutable records.
///
/// Writers replace whole records; readers clone `Arc` handles under a brief
/// read lock, so a record is never observed half-written.
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: RwLock<BTreeMap<Arc<str>, FileRecord>>,
}

impl FileIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Replace the record for `path`, returning the previous one.
    pub fn upsert(&self, path: &str, record: FileRecord) -> Option<FileRecord> {
        self.write().insert(Arc::from(path), record)
    }

    /// True when `path` has a record.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.read().contains_key(path)
    }

    /// Record for `path`, if indexed.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<FileRecord> {
        self.read().get(path).cloned()
    }

    /// Snapshot of every entry in lexical path order.
    #[must_use]
    pub fn all_entries(&self) -> Vec<(Arc<str>, FileRecord)> {
        self.read()
            .iter()
            .map(|(path, record)| (Arc::clone(path), record.clone()))
            .collect()
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Total signatures across all files.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.read().values().map(FileRecord::len).sum()
    }

    // Every critical section leaves the map consistent, so a poisoned lock is
    // still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<Arc<str>, FileRecord>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<Arc<str>, FileRecord>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
