//! Crawl statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters collected by one full crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    /// Files visited (tracked files plus every file found under the roots).
    pub files_seen: u64,
    /// Files that passed exclusion and eligibility checks.
    pub eligible_files: u64,
    /// Eligible files skipped because the index already had them.
    pub cache_hits: u64,
    /// Eligible files parsed during this crawl.
    pub cache_misses: u64,
    /// Eligible files that could not be read.
    pub failures: u64,
    /// Set when the crawl stopped at its deadline.
    pub aborted: bool,
    /// Wall time of the crawl in milliseconds.
    pub elapsed_ms: u64,
}

impl fmt::Display for ScanStatistics {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "seen={} eligible={} cacheMiss={} cacheHit={} failed={} aborted={} elapsedMs={}",
            self.files_seen,
            self.eligible_files,
            self.cache_misses,
            self.cache_hits,
            self.failures,
            self.aborted,
            self.elapsed_ms
        )
    }
}
