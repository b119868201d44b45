//! Crawl coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier, dedup store, pagination controller,
//! and retry policy, and runs a pool of workers that execute tasks against
//! the source adapter. Control flow per task:
//! - Seed discovers the event hierarchy roots
//! - Expand discovers the result listings under one event
//! - Page fetches one offset/limit page and claims its leaves
//! - Detail fetches one entity payload and normalizes it into a record
//!
//! Failures are routed through the retry policy; nothing a single branch
//! does can terminate the crawl, which ends only when the frontier drains.

use crate::adapter::{EventRef, FetchError, LeafRef, ListRef, SeedParams, SourceAdapter};
use crate::config::Config;
use crate::crawler::dedup::{DedupKey, DedupStore};
use crate::crawler::frontier::Frontier;
use crate::crawler::pagination::{Advance, PaginationController};
use crate::crawler::retry::{DropReason, RetryDecision, RetryPolicy};
use crate::crawler::task::{CrawlTask, QueuedTask};
use crate::crawler::{CrawlOutcome, CrawlStats};
use crate::record::{normalize, CanonicalRecord, RecordContext};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Main crawl coordinator structure
pub struct Coordinator<A: SourceAdapter> {
    adapter: A,
    seed: SeedParams,
    worker_count: u32,
    cooldown: Duration,
    frontier: Arc<Frontier>,
    dedup: DedupStore,
    pagination: PaginationController,
    policy: RetryPolicy,
    records: Mutex<Vec<CanonicalRecord>>,
    stats: CrawlStats,
}

impl<A: SourceAdapter + 'static> Coordinator<A> {
    /// Creates a new coordinator for one source crawl
    pub fn new(config: &Config, adapter: A) -> Self {
        let seed = SeedParams::from_config(&config.source, config.crawler.page_limit);

        Self {
            adapter,
            seed,
            worker_count: config.crawler.max_concurrent_fetches,
            cooldown: Duration::from_millis(config.crawler.rate_limit_cooldown_ms),
            frontier: Arc::new(Frontier::new()),
            dedup: DedupStore::new(),
            pagination: PaginationController::new(config.crawler.page_limit),
            policy: RetryPolicy::new(&config.crawler),
            records: Mutex::new(Vec::new()),
            stats: CrawlStats::new(),
        }
    }

    /// Runs the crawl to completion and returns the collected records
    pub async fn run(self) -> CrawlOutcome {
        let start_time = std::time::Instant::now();
        tracing::info!(
            "Starting crawl of source '{}' with {} workers",
            self.seed.source_id,
            self.worker_count
        );

        self.frontier.push(QueuedTask::new(CrawlTask::Seed));

        let this = Arc::new(self);
        let mut handles = Vec::new();
        for worker_id in 0..this.worker_count {
            let coordinator = Arc::clone(&this);
            handles.push(tokio::spawn(async move {
                coordinator.worker_loop(worker_id).await;
            }));
        }

        for handle in handles {
            // Workers only exit by draining the frontier; a panic here is a bug
            if let Err(e) = handle.await {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        let records = std::mem::take(&mut *this.records.lock().unwrap());
        let stats = this.stats.snapshot();

        tracing::info!(
            "Crawl completed: {} records in {:?} ({} duplicates skipped, {} branches dropped)",
            records.len(),
            start_time.elapsed(),
            stats.duplicates_skipped,
            stats.permanent_failures + stats.malformed_dropped
        );

        CrawlOutcome { records, stats }
    }

    async fn worker_loop(&self, worker_id: u32) {
        tracing::debug!("Worker {} started", worker_id);
        while let Some(queued) = self.frontier.next().await {
            self.execute(queued).await;
            self.frontier.complete();
        }
        tracing::debug!("Worker {} finished", worker_id);
    }

    /// Executes one task and routes any failure through the retry policy
    async fn execute(&self, queued: QueuedTask) {
        let result = match &queued.task {
            CrawlTask::Seed => self.process_seed().await,
            CrawlTask::Expand { event } => self.process_expand(event).await,
            CrawlTask::Page { list, offset } => self.process_page(list, *offset).await,
            CrawlTask::Detail { list, leaf } => self.process_detail(list, leaf).await,
        };

        if let Err(error) = result {
            self.handle_failure(queued, error);
        }
    }

    /// Seed: discover the top-level events for this source
    async fn process_seed(&self) -> Result<(), FetchError> {
        let events = self.adapter.discover_root(&self.seed).await?;

        if events.is_empty() {
            tracing::error!(
                "Root discovery for source '{}' returned no events; nothing to crawl",
                self.seed.source_id
            );
            return Ok(());
        }

        tracing::info!("Discovered {} events", events.len());
        self.stats.add_events(events.len() as u64);

        for event in events {
            self.frontier
                .push(QueuedTask::new(CrawlTask::Expand { event }));
        }
        Ok(())
    }

    /// Expand: discover the result listings under one event
    async fn process_expand(&self, event: &EventRef) -> Result<(), FetchError> {
        let lists = self.adapter.discover_children(event).await?;

        if lists.is_empty() {
            tracing::warn!(
                "Event {} ({}) has no result listings",
                event.event_id,
                event.race_name
            );
            return Ok(());
        }

        tracing::debug!(
            "Event {} expanded into {} listings",
            event.event_id,
            lists.len()
        );
        self.stats.add_lists(lists.len() as u64);

        for list in lists {
            self.frontier
                .push(QueuedTask::new(CrawlTask::Page { list, offset: 0 }));
        }
        Ok(())
    }

    /// Page: fetch one listing page, claim its leaves, schedule the next page
    async fn process_page(&self, list: &ListRef, offset: u64) -> Result<(), FetchError> {
        let limit = self.pagination.limit();
        let chunk = self.adapter.fetch_page(list, offset, limit).await?;

        // First response fixes the authoritative total for this listing
        let total = self
            .pagination
            .record_total(&list.list_id, offset, chunk.declared_total);

        // A zero-leaf page against a non-zero total is not a termination
        // signal; it re-enters through the retry policy as an empty payload
        if chunk.leaves.is_empty() && total > 0 {
            return Err(FetchError::EmptyPayload);
        }

        self.stats.add_page();
        tracing::debug!(
            "Page {} offset {} yielded {} leaves (total {})",
            list.list_id,
            offset,
            chunk.leaves.len(),
            total
        );

        for leaf in chunk.leaves {
            let key = DedupKey::new(self.seed.source_id.clone(), leaf.entity_id.clone());
            if self.dedup.try_claim(key) {
                self.frontier.push(QueuedTask::new(CrawlTask::Detail {
                    list: list.clone(),
                    leaf,
                }));
            } else {
                self.stats.add_duplicate();
            }
        }

        // Paging and draining overlap: the next listing page goes out without
        // waiting for this page's detail fetches
        if let Advance::Next(next_offset) = self.pagination.advance(&list.list_id) {
            self.frontier.push(QueuedTask::new(CrawlTask::Page {
                list: list.clone(),
                offset: next_offset,
            }));
        }
        Ok(())
    }

    /// Detail: fetch one entity payload and normalize it into a record
    async fn process_detail(&self, list: &ListRef, leaf: &LeafRef) -> Result<(), FetchError> {
        let payload = self.adapter.fetch_detail(leaf).await?;

        let context = RecordContext {
            master_event_id: list.event.master_event_id.clone(),
            event_id: list.event.event_id.clone(),
            race_name: list.event.race_name.clone(),
            race_date: list.event.race_date.clone(),
            distance_category: list.category.clone(),
            entity_id: leaf.entity_id.clone(),
        };

        match normalize(&payload, &context) {
            Ok(record) => {
                let emitted = self.stats.add_record();
                if emitted % 500 == 0 {
                    tracing::info!(
                        "Progress: {} records emitted, {} tasks queued",
                        emitted,
                        self.frontier.len()
                    );
                }
                self.records.lock().unwrap().push(record);
            }
            Err(e) => {
                // Structural failure: drop the entity, keep the branch alive
                tracing::warn!("Dropping entity {}: {}", leaf.entity_id, e);
                self.stats.add_malformed();
            }
        }
        Ok(())
    }

    /// Applies the retry policy to a failed task
    fn handle_failure(&self, queued: QueuedTask, error: FetchError) {
        match self.policy.decide(&error, queued.attempts, queued.empty_retries) {
            RetryDecision::PauseAndRetry => {
                self.stats.add_rate_limit_pause();
                // Front of the queue: this task is the first dispatched once
                // the pause ends
                self.frontier.push_front(queued);
                Arc::clone(&self.frontier).pause_for(self.cooldown);
            }

            RetryDecision::Retry => {
                self.stats.add_transient_retry();
                tracing::debug!(
                    "Retrying {} after {} (attempt {})",
                    queued.task.describe(),
                    error,
                    queued.attempts + 1
                );
                self.frontier.push(queued.retried());
            }

            RetryDecision::RetryEmpty => {
                self.stats.add_empty_retry();
                tracing::debug!(
                    "Re-fetching {} after empty payload (retry {})",
                    queued.task.describe(),
                    queued.empty_retries + 1
                );
                self.frontier.push(queued.retried_empty());
            }

            RetryDecision::Drop(reason) => self.drop_task(queued, error, reason),
        }
    }

    fn drop_task(&self, queued: QueuedTask, error: FetchError, reason: DropReason) {
        match reason {
            DropReason::Malformed => self.stats.add_malformed(),
            DropReason::RetriesExhausted | DropReason::PermanentStatus => {
                self.stats.add_permanent_failure()
            }
        }

        match &queued.task {
            // Losing a discovery task abandons a whole subtree
            CrawlTask::Seed => {
                tracing::error!("Root discovery failed permanently: {}", error);
            }
            CrawlTask::Expand { event } => {
                tracing::error!(
                    "Abandoning event {} ({}): {}",
                    event.event_id,
                    event.race_name,
                    error
                );
            }
            task => {
                tracing::warn!("Abandoning {}: {}", task.describe(), error);
            }
        }
    }
}
