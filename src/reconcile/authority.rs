//! External-authority reconciliation
//!
//! Compares local per-event counts against counts supplied by an external
//! authority (typically the source's own declared totals, exported to a JSON
//! file keyed by master event). Rows with no local records against a
//! non-zero authority count describe events the crawl never reached at all;
//! they are excluded from the report and from the aggregate totals so a
//! handful of uncrawled events cannot drown out the per-event shortfall
//! signal. An event with even one collected record is always reported.

use crate::reconcile::{count_by_event, missing_percentage, ReconciliationReport, ReconciliationRow};
use crate::record::CanonicalRecord;
use crate::{FinishlineError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Authoritative counts: master_event_id -> event_id -> record count
pub type AuthorityCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// Loads authority counts from a JSON file
pub fn load_authority_counts(path: &Path) -> Result<AuthorityCounts> {
    let content = std::fs::read_to_string(path).map_err(|e| FinishlineError::RecordFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let counts: AuthorityCounts = serde_json::from_str(&content)?;
    Ok(counts)
}

/// Reconciles collected records against external authority counts
///
/// The key set is the union of both sides: events the authority knows but
/// the crawl missed appear with a local count of zero, and events crawled
/// but unknown to the authority appear with an authoritative count of zero.
pub fn reconcile_against_authority(
    records: &[CanonicalRecord],
    authority: &AuthorityCounts,
) -> ReconciliationReport {
    let local = count_by_event(records);

    let mut keys: BTreeSet<(String, String)> = local.keys().cloned().collect();
    for (master, events) in authority {
        for event in events.keys() {
            keys.insert((master.clone(), event.clone()));
        }
    }

    let mut rows = Vec::new();
    let mut total_local = 0;
    let mut total_authoritative = 0;

    for (master, event) in keys {
        let local_count = local
            .get(&(master.clone(), event.clone()))
            .copied()
            .unwrap_or(0);
        let authoritative_count = authority
            .get(&master)
            .and_then(|events| events.get(&event))
            .copied()
            .unwrap_or(0);

        // Only a completely uncrawled event is a full shortfall; rounding
        // must not pull a partially crawled event up to the exclusion
        if local_count == 0 && authoritative_count > 0 {
            tracing::debug!(
                "Excluding event {}/{} from report: nothing crawled ({} expected)",
                master,
                event,
                authoritative_count
            );
            continue;
        }

        total_local += local_count;
        total_authoritative += authoritative_count;
        rows.push(ReconciliationRow {
            master_event_id: master,
            event_id: event,
            local_count,
            authoritative_count,
            missing_percentage: missing_percentage(local_count, authoritative_count),
            is_matching: local_count == authoritative_count,
        });
    }

    ReconciliationReport {
        rows,
        total_local,
        total_authoritative,
    }
}
