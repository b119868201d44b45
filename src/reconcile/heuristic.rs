//! Self-referential expected totals
//!
//! When no external authority is available, the records themselves hint at
//! the expected count: overall ranks arrive as `rank/total` strings, so the
//! distinct denominators seen within one distance category, summed, estimate
//! how many finishers the source believes that category had.
//!
//! Known to be fragile: a category whose listing pages disagree about the
//! total (or that mixes sub-races into one rank scale) sums unrelated
//! denominators and overstates the expected count. That behavior is kept
//! as-is; treat heuristic rows as a smoke signal, not a measurement.

use crate::reconcile::{
    count_by_category, missing_percentage, ReconciliationReport, ReconciliationRow,
};
use crate::record::CanonicalRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Sum of the distinct rank denominators in one category's records
///
/// Denominators that are absent, non-numeric, or zero are ignored.
pub fn expected_total<'a, I>(rank_overall_values: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut totals: BTreeSet<u64> = BTreeSet::new();
    for rank in rank_overall_values {
        let Some(denominator) = rank.split('/').nth(1) else {
            continue;
        };
        if let Ok(total) = denominator.trim().parse::<u64>() {
            if total > 0 {
                totals.insert(total);
            }
        }
    }
    totals.iter().sum()
}

/// Reconciles each (master event, category) against its inferred total
pub fn reconcile_by_heuristic(records: &[CanonicalRecord]) -> ReconciliationReport {
    let local = count_by_category(records);

    let mut ranks_by_key: BTreeMap<(String, String), Vec<&str>> = BTreeMap::new();
    for record in records {
        ranks_by_key
            .entry((
                record.master_event_id.clone(),
                record.distance_category.clone(),
            ))
            .or_default()
            .push(&record.rank_overall);
    }

    let mut rows = Vec::new();
    let mut total_local = 0;
    let mut total_authoritative = 0;

    for ((master, category), ranks) in ranks_by_key {
        let local_count = local
            .get(&(master.clone(), category.clone()))
            .copied()
            .unwrap_or(0);
        let expected = expected_total(ranks.iter().copied());

        total_local += local_count;
        total_authoritative += expected;
        rows.push(ReconciliationRow {
            master_event_id: master,
            event_id: category,
            local_count,
            authoritative_count: expected,
            missing_percentage: missing_percentage(local_count, expected),
            is_matching: local_count == expected,
        });
    }

    ReconciliationReport {
        rows,
        total_local,
        total_authoritative,
    }
}
