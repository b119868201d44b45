//! Report rendering
//!
//! Turns a reconciliation result into an aligned console table and a CSV
//! file. Rows are ordered by master event then event/category, comparing
//! numerically whenever both ids parse as integers so that "9" sorts before
//! "10" for the common all-numeric id schemes.

use crate::reconcile::{ReconciliationReport, ReconciliationRow};
use crate::{FinishlineError, Result};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::Path;

/// Fixed CSV column set
const CSV_HEADER: &str =
    "master_event_id,event_id,local_count,authoritative_count,is_matching,missing_percentage";

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Rows in report order: master event first, then event/category
pub fn sorted_rows(report: &ReconciliationReport) -> Vec<ReconciliationRow> {
    let mut rows = report.rows.clone();
    rows.sort_by(|a, b| {
        compare_ids(&a.master_event_id, &b.master_event_id)
            .then_with(|| compare_ids(&a.event_id, &b.event_id))
    });
    rows
}

/// Renders the report as an aligned console table
pub fn render_table(report: &ReconciliationReport) -> String {
    let rows = sorted_rows(report);

    let mut master_width = "MASTER".len();
    let mut event_width = "EVENT".len();
    for row in &rows {
        master_width = master_width.max(row.master_event_id.len());
        event_width = event_width.max(row.event_id.len());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Reconciliation report ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        out,
        "{:<master_width$}  {:<event_width$}  {:>8}  {:>9}  {:>9}  MATCH",
        "MASTER", "EVENT", "LOCAL", "AUTHORITY", "MISSING %"
    );

    for row in &rows {
        let _ = writeln!(
            out,
            "{:<master_width$}  {:<event_width$}  {:>8}  {:>9}  {:>9.2}  {}",
            row.master_event_id,
            row.event_id,
            row.local_count,
            row.authoritative_count,
            row.missing_percentage,
            if row.is_matching { "yes" } else { "NO" }
        );
    }

    let _ = writeln!(
        out,
        "Totals: {} local / {} authoritative (difference {})",
        report.total_local,
        report.total_authoritative,
        report.difference()
    );
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes the report as CSV
pub fn write_csv(report: &ReconciliationReport, path: &Path) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", CSV_HEADER);
    for row in sorted_rows(report) {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{:.2}",
            csv_field(&row.master_event_id),
            csv_field(&row.event_id),
            row.local_count,
            row.authoritative_count,
            row.is_matching,
            row.missing_percentage
        );
    }

    std::fs::write(path, out).map_err(|e| FinishlineError::RecordFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(master: &str, event: &str, local: u64, auth: u64) -> ReconciliationRow {
        ReconciliationRow {
            master_event_id: master.to_string(),
            event_id: event.to_string(),
            local_count: local,
            authoritative_count: auth,
            missing_percentage: crate::reconcile::missing_percentage(local, auth),
            is_matching: local == auth,
        }
    }

    fn report(rows: Vec<ReconciliationRow>) -> ReconciliationReport {
        let total_local = rows.iter().map(|r| r.local_count).sum();
        let total_authoritative = rows.iter().map(|r| r.authoritative_count).sum();
        ReconciliationReport {
            rows,
            total_local,
            total_authoritative,
        }
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let report = report(vec![
            row("10", "1", 5, 5),
            row("9", "1", 5, 5),
            row("9", "10", 5, 5),
            row("9", "2", 5, 5),
        ]);

        let rows = sorted_rows(&report);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.master_event_id.as_str(), r.event_id.as_str()))
            .collect();
        assert_eq!(keys, vec![("9", "1"), ("9", "2"), ("9", "10"), ("10", "1")]);
    }

    #[test]
    fn test_mixed_ids_sort_lexicographically() {
        let report = report(vec![row("m1", "half-marathon", 5, 5), row("m1", "10K", 5, 5)]);
        let rows = sorted_rows(&report);
        assert_eq!(rows[0].event_id, "10K");
        assert_eq!(rows[1].event_id, "half-marathon");
    }

    #[test]
    fn test_table_contains_rows_and_totals() {
        let table = render_table(&report(vec![row("m1", "e1", 90, 100)]));
        assert!(table.contains("MASTER"));
        assert!(table.contains("m1"));
        assert!(table.contains("10.00"));
        assert!(table.contains("Totals: 90 local / 100 authoritative (difference 10)"));
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_csv(&report(vec![row("m1", "e1", 90, 100)]), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("m1,e1,90,100,false,10.00"));
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
