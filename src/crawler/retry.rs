//! Retry & backoff policy
//!
//! Every adapter call is wrapped by this policy. It classifies a fetch
//! failure together with the task's attempt counters into one decision:
//! pause the whole scheduler, re-enqueue, or drop the branch. Failures are
//! always contained to their branch; nothing here aborts the crawl.

use crate::adapter::FetchError;
use crate::config::CrawlerConfig;

/// What the coordinator should do with a failed task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Close the dispatch gate for the cool-down and retry this task first
    PauseAndRetry,

    /// Re-enqueue with the transient-attempt counter bumped
    Retry,

    /// Re-enqueue with the empty-payload counter bumped, bypassing dedup
    RetryEmpty,

    /// Abandon the branch: log and continue the crawl without it
    Drop(DropReason),
}

/// Why a branch was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Bounded transient retries exhausted
    RetriesExhausted,

    /// Payload could not be decoded, or empty re-fetches ran out
    Malformed,

    /// Non-retryable HTTP status (e.g. 404)
    PermanentStatus,
}

/// Failure classifier, configured from the `[crawler]` section
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    retry_status_codes: Vec<u16>,
    max_transient_retries: u32,
    max_empty_retries: u32,
}

impl RetryPolicy {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            retry_status_codes: config.retry_status_codes.clone(),
            max_transient_retries: config.max_transient_retries,
            max_empty_retries: config.max_empty_retries,
        }
    }

    /// Classifies one failure given the task's counters so far
    pub fn decide(&self, error: &FetchError, attempts: u32, empty_retries: u32) -> RetryDecision {
        match error {
            FetchError::RateLimited => RetryDecision::PauseAndRetry,

            FetchError::Http { status } => {
                if self.retry_status_codes.contains(status) {
                    self.bounded_retry(attempts)
                } else {
                    RetryDecision::Drop(DropReason::PermanentStatus)
                }
            }

            FetchError::Transport(_) => self.bounded_retry(attempts),

            // The observed behavior retried these forever; the bound is
            // deliberate, with exhaustion treated as a malformed payload
            FetchError::EmptyPayload => {
                if empty_retries < self.max_empty_retries {
                    RetryDecision::RetryEmpty
                } else {
                    RetryDecision::Drop(DropReason::Malformed)
                }
            }

            FetchError::Malformed(_) => RetryDecision::Drop(DropReason::Malformed),
        }
    }

    fn bounded_retry(&self, attempts: u32) -> RetryDecision {
        if attempts < self.max_transient_retries {
            RetryDecision::Retry
        } else {
            RetryDecision::Drop(DropReason::RetriesExhausted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            retry_status_codes: vec![500, 502, 503, 504, 522, 524, 408],
            max_transient_retries: 3,
            max_empty_retries: 5,
        }
    }

    #[test]
    fn test_rate_limited_pauses_regardless_of_attempts() {
        let policy = policy();
        assert_eq!(
            policy.decide(&FetchError::RateLimited, 0, 0),
            RetryDecision::PauseAndRetry
        );
        assert_eq!(
            policy.decide(&FetchError::RateLimited, 99, 0),
            RetryDecision::PauseAndRetry
        );
    }

    #[test]
    fn test_retryable_status_bounded() {
        let policy = policy();
        let error = FetchError::Http { status: 503 };
        assert_eq!(policy.decide(&error, 0, 0), RetryDecision::Retry);
        assert_eq!(policy.decide(&error, 2, 0), RetryDecision::Retry);
        assert_eq!(
            policy.decide(&error, 3, 0),
            RetryDecision::Drop(DropReason::RetriesExhausted)
        );
    }

    #[test]
    fn test_non_retryable_status_drops() {
        let policy = policy();
        assert_eq!(
            policy.decide(&FetchError::Http { status: 404 }, 0, 0),
            RetryDecision::Drop(DropReason::PermanentStatus)
        );
    }

    #[test]
    fn test_transport_errors_retry() {
        let policy = policy();
        let error = FetchError::Transport("request timeout".to_string());
        assert_eq!(policy.decide(&error, 0, 0), RetryDecision::Retry);
        assert_eq!(
            policy.decide(&error, 3, 0),
            RetryDecision::Drop(DropReason::RetriesExhausted)
        );
    }

    #[test]
    fn test_empty_payload_bounded_separately() {
        let policy = policy();
        let error = FetchError::EmptyPayload;
        // Transient attempts do not count against the empty-payload bound
        assert_eq!(policy.decide(&error, 3, 0), RetryDecision::RetryEmpty);
        assert_eq!(policy.decide(&error, 0, 4), RetryDecision::RetryEmpty);
        assert_eq!(
            policy.decide(&error, 0, 5),
            RetryDecision::Drop(DropReason::Malformed)
        );
    }

    #[test]
    fn test_malformed_drops_immediately() {
        let policy = policy();
        assert_eq!(
            policy.decide(&FetchError::Malformed("bad base64".to_string()), 0, 0),
            RetryDecision::Drop(DropReason::Malformed)
        );
    }
}
