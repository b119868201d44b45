//! Typed crawl tasks
//!
//! The engine's control flow is an explicit work queue of these variants
//! rather than callback chaining: each completed task may enqueue child
//! tasks, and a detail task may additionally emit one record.

use crate::adapter::{EventRef, LeafRef, ListRef};

/// A unit of crawl work, owned by the frontier until dispatched
#[derive(Debug, Clone)]
pub enum CrawlTask {
    /// Root discovery from the seed parameters
    Seed,

    /// Child-listing discovery for one event
    Expand { event: EventRef },

    /// One offset/limit page of a result listing
    Page { list: ListRef, offset: u64 },

    /// Detail fetch for one leaf entity
    Detail { list: ListRef, leaf: LeafRef },
}

impl CrawlTask {
    /// Short description for log lines
    pub fn describe(&self) -> String {
        match self {
            Self::Seed => "seed".to_string(),
            Self::Expand { event } => format!("expand event {}", event.event_id),
            Self::Page { list, offset } => {
                format!("page {} offset {}", list.list_id, offset)
            }
            Self::Detail { leaf, .. } => format!("detail entity {}", leaf.entity_id),
        }
    }
}

/// A task plus its retry bookkeeping
///
/// Attempt counters travel with the task through re-enqueues so the retry
/// policy can bound them without any shared per-task state.
#[derive(Debug, Clone)]
pub struct QueuedTask {
    pub task: CrawlTask,
    pub attempts: u32,
    pub empty_retries: u32,
}

impl QueuedTask {
    pub fn new(task: CrawlTask) -> Self {
        Self {
            task,
            attempts: 0,
            empty_retries: 0,
        }
    }

    /// Copy of this task with the transient-attempt counter bumped
    pub fn retried(&self) -> Self {
        Self {
            task: self.task.clone(),
            attempts: self.attempts + 1,
            empty_retries: self.empty_retries,
        }
    }

    /// Copy of this task with the empty-payload counter bumped
    pub fn retried_empty(&self) -> Self {
        Self {
            task: self.task.clone(),
            attempts: self.attempts,
            empty_retries: self.empty_retries + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::EventRef;

    #[test]
    fn test_retry_counters_are_independent() {
        let event = EventRef {
            master_event_id: "m1".to_string(),
            event_id: "e1".to_string(),
            race_name: "Race".to_string(),
            race_date: "2024-05-01".to_string(),
        };
        let queued = QueuedTask::new(CrawlTask::Expand { event });

        let retried = queued.retried().retried();
        assert_eq!(retried.attempts, 2);
        assert_eq!(retried.empty_retries, 0);

        let empty = retried.retried_empty();
        assert_eq!(empty.attempts, 2);
        assert_eq!(empty.empty_retries, 1);
    }
}
