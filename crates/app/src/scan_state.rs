//! Single-flight scan gate, crawl deadline, and scan diagnostics.

use sigdex_domain::{FolderSet, ScanStatistics};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Shared scan bookkeeping.
#[derive(Debug, Default)]
pub struct ScanState {
    running: AtomicBool,
    aborted: AtomicBool,
    known_roots: RwLock<Arc<FolderSet>>,
    last_stats: RwLock<Option<ScanStatistics>>,
    deadline: RwLock<Option<ScanDeadline>>,
}

impl ScanState {
    /// Create an idle state with no known roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the scan slot. Returns `None` while another scan holds it.
    ///
    /// Claiming clears the `aborted` flag left by the previous scan.
    pub fn try_begin(&self) -> Option<ScanGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.aborted.store(false, Ordering::Release);
        Some(ScanGuard { state: self })
    }

    /// True while a full scan holds the slot.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// True when the last scan stopped at its deadline.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Roots used by the most recent scan.
    #[must_use]
    pub fn known_roots(&self) -> Arc<FolderSet> {
        let guard = self
            .known_roots
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// When the current or most recent scan started its crawl.
    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.deadline().map(|deadline| deadline.started)
    }

    /// Crawl budget of the current or most recent scan.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.deadline().map(|deadline| deadline.budget)
    }

    fn deadline(&self) -> Option<ScanDeadline> {
        *self.deadline.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Statistics of the most recently finished scan.
    #[must_use]
    pub fn last_stats(&self) -> Option<ScanStatistics> {
        *self
            .last_stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the scan slot; releasing happens on drop, including unwinding and
/// cancellation.
#[derive(Debug)]
pub struct ScanGuard<'a> {
    state: &'a ScanState,
}

impl ScanGuard<'_> {
    /// Record the roots this scan covers.
    pub fn set_known_roots(&self, roots: FolderSet) {
        let mut guard = self
            .state
            .known_roots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(roots);
    }

    /// Start the crawl clock and record it on the shared state.
    pub fn start_deadline(&self, budget: Duration) -> ScanDeadline {
        let deadline = ScanDeadline::start(budget);
        *self
            .state
            .deadline
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(deadline);
        deadline
    }

    /// Publish the statistics and release the slot.
    pub fn finish(self, stats: ScanStatistics) {
        self.state.aborted.store(stats.aborted, Ordering::Release);
        let mut guard = self
            .state
            .last_stats
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(stats);
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
    }
}

/// Wall-clock budget for one crawl.
#[derive(Debug, Clone, Copy)]
pub struct ScanDeadline {
    started: Instant,
    budget: Duration,
}

impl ScanDeadline {
    /// Start the clock now.
    #[must_use]
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// True once the elapsed time reaches the budget.
    #[must_use]
    pub fn is_exceeded(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    /// Elapsed milliseconds since the clock started.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_fails_until_the_guard_drops() {
        let state = ScanState::new();
        let guard = state.try_begin();
        assert!(guard.is_some());
        assert!(state.is_running());
        assert!(state.try_begin().is_none());

        drop(guard);
        assert!(!state.is_running());
        assert!(state.try_begin().is_some());
    }

    #[test]
    fn aborted_flag_persists_until_the_next_claim() {
        let state = ScanState::new();
        if let Some(guard) = state.try_begin() {
            guard.finish(ScanStatistics {
                aborted: true,
                ..ScanStatistics::default()
            });
        }
        assert!(state.is_aborted());
        assert_eq!(state.last_stats().map(|stats| stats.aborted), Some(true));

        let guard = state.try_begin();
        assert!(guard.is_some());
        assert!(!state.is_aborted());
    }

    #[test]
    fn known_roots_are_replaced_by_value() {
        let state = ScanState::new();
        assert!(state.known_roots().is_empty());
        if let Some(guard) = state.try_begin() {
            guard.set_known_roots(FolderSet::reduce(["/proj", "/proj/src"]));
        }
        assert_eq!(*state.known_roots(), FolderSet::reduce(["/proj"]));
    }

    #[test]
    fn started_crawl_exposes_its_clock_after_finishing() {
        let state = ScanState::new();
        assert!(state.started_at().is_none());
        assert!(state.timeout().is_none());

        let before = Instant::now();
        if let Some(guard) = state.try_begin() {
            let deadline = guard.start_deadline(Duration::from_secs(20));
            assert!(!deadline.is_exceeded());
            assert_eq!(state.timeout(), Some(Duration::from_secs(20)));
            guard.finish(ScanStatistics::default());
        }

        assert!(!state.is_running());
        assert!(state.started_at().is_some_and(|started| started >= before));
        assert_eq!(state.timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn zero_budget_is_exceeded_immediately() {
        assert!(ScanDeadline::start(Duration::ZERO).is_exceeded());
        assert!(!ScanDeadline::start(Duration::from_secs(3_600)).is_exceeded());
    }
}
