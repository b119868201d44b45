//! Pagination Controller
//!
//! Tracks offset/limit progress per result listing. The declared total is
//! read from the first successful page response and treated as authoritative
//! for the remainder of the crawl; later pages never revise it. Paging for a
//! listing stops exactly when `offset + limit >= declared_total`.

use std::collections::HashMap;
use std::sync::Mutex;

/// Outcome of asking for the next page offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Issue a page request at this offset
    Next(u64),
    /// The listing is exhausted
    Done,
}

#[derive(Debug)]
struct ListProgress {
    /// Highest offset issued so far
    last_offset: u64,
    /// Fixed by the first page response; None until then
    declared_total: Option<u64>,
}

/// Per-listing pagination state, keyed by list id
#[derive(Debug)]
pub struct PaginationController {
    limit: u64,
    lists: Mutex<HashMap<String, ListProgress>>,
}

impl PaginationController {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            lists: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Records the declared total from a page response
    ///
    /// Only the first call for a listing takes effect; the value returned is
    /// the authoritative total after the call.
    pub fn record_total(&self, list_id: &str, offset: u64, declared_total: u64) -> u64 {
        let mut lists = self.lists.lock().unwrap();
        let progress = lists.entry(list_id.to_string()).or_insert(ListProgress {
            last_offset: offset,
            declared_total: None,
        });

        if progress.last_offset < offset {
            progress.last_offset = offset;
        }

        match progress.declared_total {
            Some(total) => {
                if total != declared_total {
                    tracing::debug!(
                        "List {} re-declared total {} (keeping {})",
                        list_id,
                        declared_total,
                        total
                    );
                }
                total
            }
            None => {
                progress.declared_total = Some(declared_total);
                declared_total
            }
        }
    }

    /// Computes the next offset for a listing, or `Done` on exhaustion
    ///
    /// Must be called after [`record_total`]; a listing with no recorded
    /// total is treated as exhausted.
    pub fn advance(&self, list_id: &str) -> Advance {
        let mut lists = self.lists.lock().unwrap();
        let Some(progress) = lists.get_mut(list_id) else {
            return Advance::Done;
        };
        let Some(total) = progress.declared_total else {
            return Advance::Done;
        };

        // Offsets only move forward; the stop rule is offset + limit >= total
        if progress.last_offset + self.limit >= total {
            return Advance::Done;
        }

        progress.last_offset += self.limit;
        Advance::Next(progress.last_offset)
    }

    /// Authoritative total for a listing, if its first page has been seen
    pub fn declared_total(&self, list_id: &str) -> Option<u64> {
        let lists = self.lists.lock().unwrap();
        lists.get(list_id).and_then(|p| p.declared_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drains all offsets for a listing after its first page response
    fn drain_offsets(controller: &PaginationController, list_id: &str, total: u64) -> Vec<u64> {
        let mut offsets = vec![0];
        controller.record_total(list_id, 0, total);
        while let Advance::Next(offset) = controller.advance(list_id) {
            offsets.push(offset);
        }
        offsets
    }

    #[test]
    fn test_offsets_for_total_237_limit_50() {
        let controller = PaginationController::new(50);
        let offsets = drain_offsets(&controller, "course-1", 237);
        assert_eq!(offsets, vec![0, 50, 100, 150, 200]);
        assert!(offsets.iter().all(|&o| o < 237));
    }

    #[test]
    fn test_exact_multiple_total() {
        let controller = PaginationController::new(50);
        let offsets = drain_offsets(&controller, "course-1", 100);
        assert_eq!(offsets, vec![0, 50]);
    }

    #[test]
    fn test_total_within_first_page() {
        let controller = PaginationController::new(50);
        let offsets = drain_offsets(&controller, "course-1", 37);
        assert_eq!(offsets, vec![0]);
    }

    #[test]
    fn test_zero_total_is_done() {
        let controller = PaginationController::new(50);
        controller.record_total("course-1", 0, 0);
        assert_eq!(controller.advance("course-1"), Advance::Done);
    }

    #[test]
    fn test_first_total_is_authoritative() {
        let controller = PaginationController::new(50);
        assert_eq!(controller.record_total("course-1", 0, 237), 237);
        // A later page declaring a different total does not revise it
        assert_eq!(controller.record_total("course-1", 50, 9000), 237);
        assert_eq!(controller.declared_total("course-1"), Some(237));
    }

    #[test]
    fn test_unknown_list_is_done() {
        let controller = PaginationController::new(50);
        assert_eq!(controller.advance("never-seen"), Advance::Done);
    }

    #[test]
    fn test_lists_progress_independently() {
        let controller = PaginationController::new(50);
        controller.record_total("a", 0, 120);
        controller.record_total("b", 0, 60);

        assert_eq!(controller.advance("a"), Advance::Next(50));
        assert_eq!(controller.advance("b"), Advance::Next(50));
        assert_eq!(controller.advance("b"), Advance::Done);
        assert_eq!(controller.advance("a"), Advance::Next(100));
        assert_eq!(controller.advance("a"), Advance::Done);
    }
}
