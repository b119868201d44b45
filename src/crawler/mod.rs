//! Crawl engine
//!
//! Ties together the frontier, pagination controller, dedup store, and retry
//! policy under one coordinator. [`run_crawl`] is the public entry point.

pub mod coordinator;
pub mod dedup;
pub mod frontier;
pub mod gate;
pub mod pagination;
pub mod retry;
pub mod task;

pub use coordinator::Coordinator;
pub use dedup::{DedupKey, DedupStore};
pub use frontier::Frontier;
pub use gate::DispatchGate;
pub use pagination::{Advance, PaginationController};
pub use retry::{DropReason, RetryDecision, RetryPolicy};
pub use task::{CrawlTask, QueuedTask};

use crate::adapter::SourceAdapter;
use crate::config::Config;
use crate::record::CanonicalRecord;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: Vec<CanonicalRecord>,
    pub stats: StatsSnapshot,
}

/// Shared atomic counters updated by the workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    events_discovered: AtomicU64,
    lists_discovered: AtomicU64,
    pages_fetched: AtomicU64,
    records_emitted: AtomicU64,
    duplicates_skipped: AtomicU64,
    transient_retries: AtomicU64,
    empty_retries: AtomicU64,
    permanent_failures: AtomicU64,
    malformed_dropped: AtomicU64,
    rate_limit_pauses: AtomicU64,
}

/// Point-in-time copy of the crawl counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub events_discovered: u64,
    pub lists_discovered: u64,
    pub pages_fetched: u64,
    pub records_emitted: u64,
    pub duplicates_skipped: u64,
    pub transient_retries: u64,
    pub empty_retries: u64,
    pub permanent_failures: u64,
    pub malformed_dropped: u64,
    pub rate_limit_pauses: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_events(&self, n: u64) {
        self.events_discovered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_lists(&self, n: u64) {
        self.lists_discovered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_page(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the running total including this record
    pub fn add_record(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_transient_retry(&self) {
        self.transient_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_empty_retry(&self) {
        self.empty_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_permanent_failure(&self) {
        self.permanent_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_malformed(&self) {
        self.malformed_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rate_limit_pause(&self) {
        self.rate_limit_pauses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_discovered: self.events_discovered.load(Ordering::Relaxed),
            lists_discovered: self.lists_discovered.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            records_emitted: self.records_emitted.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            transient_retries: self.transient_retries.load(Ordering::Relaxed),
            empty_retries: self.empty_retries.load(Ordering::Relaxed),
            permanent_failures: self.permanent_failures.load(Ordering::Relaxed),
            malformed_dropped: self.malformed_dropped.load(Ordering::Relaxed),
            rate_limit_pauses: self.rate_limit_pauses.load(Ordering::Relaxed),
        }
    }
}

/// Crawls one source to completion with the given adapter
pub async fn run_crawl<A: SourceAdapter + 'static>(config: &Config, adapter: A) -> CrawlOutcome {
    Coordinator::new(config, adapter).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_snapshot_reflects_counters() {
        let stats = CrawlStats::new();
        stats.add_events(3);
        stats.add_lists(7);
        stats.add_page();
        assert_eq!(stats.add_record(), 1);
        assert_eq!(stats.add_record(), 2);
        stats.add_duplicate();
        stats.add_rate_limit_pause();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.events_discovered, 3);
        assert_eq!(snapshot.lists_discovered, 7);
        assert_eq!(snapshot.pages_fetched, 1);
        assert_eq!(snapshot.records_emitted, 2);
        assert_eq!(snapshot.duplicates_skipped, 1);
        assert_eq!(snapshot.rate_limit_pauses, 1);
        assert_eq!(snapshot.permanent_failures, 0);
    }
}
