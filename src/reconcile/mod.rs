//! Count reconciliation
//!
//! Pure functions over a collected record set: aggregate local counts, then
//! compare them against an external authority ([`authority`]) or against
//! totals inferred from the records themselves ([`heuristic`]). Nothing in
//! here touches the network; reconciliation runs offline over a record file.

pub mod authority;
pub mod heuristic;
pub mod report;

pub use authority::{load_authority_counts, reconcile_against_authority, AuthorityCounts};
pub use heuristic::reconcile_by_heuristic;
pub use report::{render_table, write_csv};

use crate::record::CanonicalRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// One comparison row: local count vs authoritative count for one key
///
/// The second key component is an event id in authority mode and a distance
/// category in heuristic mode.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationRow {
    pub master_event_id: String,
    pub event_id: String,
    pub local_count: u64,
    pub authoritative_count: u64,
    pub missing_percentage: f64,
    pub is_matching: bool,
}

/// Full reconciliation result: rows plus aggregate totals
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub rows: Vec<ReconciliationRow>,
    pub total_local: u64,
    pub total_authoritative: u64,
}

impl ReconciliationReport {
    /// Aggregate shortfall across all reported rows
    pub fn difference(&self) -> i64 {
        self.total_authoritative as i64 - self.total_local as i64
    }
}

/// Percentage of authoritative records missing locally
///
/// Zero when the authority itself reports zero. Rounded to two decimals.
pub fn missing_percentage(local: u64, authoritative: u64) -> f64 {
    if authoritative == 0 {
        return 0.0;
    }
    let raw = (authoritative as f64 - local as f64) * 100.0 / authoritative as f64;
    (raw * 100.0).round() / 100.0
}

/// Local record counts keyed by (master_event_id, event_id)
pub fn count_by_event(records: &[CanonicalRecord]) -> BTreeMap<(String, String), u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts
            .entry((record.master_event_id.clone(), record.event_id.clone()))
            .or_insert(0) += 1;
    }
    counts
}

/// Local record counts keyed by (master_event_id, distance_category)
pub fn count_by_category(records: &[CanonicalRecord]) -> BTreeMap<(String, String), u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts
            .entry((
                record.master_event_id.clone(),
                record.distance_category.clone(),
            ))
            .or_insert(0) += 1;
    }
    counts
}
