//! Dedup store
//!
//! The same leaf entity is frequently discoverable through several
//! independent paths: curated top-result listings, per-category listings,
//! and brute-force identifier enumeration. The store guarantees each entity
//! is detail-fetched at most once per session, whatever path reaches it
//! first.

use dashmap::DashSet;

/// Composite identity of one entity within one source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub source_id: String,
    pub entity_id: String,
}

impl DedupKey {
    pub fn new(source_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            entity_id: entity_id.into(),
        }
    }
}

/// Session-scoped set of claimed entity identities
///
/// Claims are atomic: concurrent callers racing on the same key see exactly
/// one winner. There is no cross-run persistence.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: DashSet<DedupKey>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a key, returning true only for the first caller
    pub fn try_claim(&self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }

    /// Number of claimed keys
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
