//! Canonical record schema
//!
//! Every source, however it structures its payloads, normalizes into this
//! one record shape. Records are immutable once created and are only held in
//! memory for the duration of a crawl session; [`write_records`] and
//! [`load_records`] handle the JSON dump used for offline reconciliation.

mod normalize;

pub use normalize::{normalize, NormalizationError, RecordContext};

use crate::{FinishlineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Runner gender as reported by the source
///
/// Sources report this as single-letter codes ("M"/"F") or free text;
/// anything unrecognized maps to `Unknown` rather than failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Maps a raw gender value onto the enumeration
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "man" => Self::Male,
            "f" | "female" | "w" | "woman" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized race result
///
/// Optional fields default to empty strings, never null; rank fields keep
/// their verbatim `rank/total` form and time fields keep their `HH:MM:SS`
/// text form as the source reported them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub master_event_id: String,
    pub event_id: String,
    pub race_name: String,
    pub race_date: String,
    pub entity_id: String,
    pub bib_number: String,
    pub distance_category: String,
    pub runner_name: String,
    pub gender: Gender,
    pub age_category: String,
    pub finish_time_net: String,
    pub finish_time_gun: String,
    pub chip_pace: String,
    pub rank_overall: String,
    pub rank_gender: String,
    pub rank_age_category: String,

    /// Source-specific fields that have no canonical column
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Identity key: bib number when present, entity id otherwise
    ///
    /// Bib numbers are not always reliable (absent or reused), hence the
    /// fallback.
    pub fn identity(&self) -> (&str, &str) {
        if self.bib_number.is_empty() {
            (&self.event_id, &self.entity_id)
        } else {
            (&self.event_id, &self.bib_number)
        }
    }
}

/// Writes collected records to a JSON file
pub fn write_records(path: &Path, records: &[CanonicalRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).map_err(|e| FinishlineError::RecordFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// Loads records from a JSON file written by [`write_records`]
pub fn load_records(path: &Path) -> Result<Vec<CanonicalRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| FinishlineError::RecordFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let records: Vec<CanonicalRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal record for count-aggregation tests
    pub(crate) fn record_with(master: &str, event: &str, category: &str) -> CanonicalRecord {
        record_with_rank(master, event, category, "")
    }

    pub(crate) fn record_with_rank(
        master: &str,
        event: &str,
        category: &str,
        rank_overall: &str,
    ) -> CanonicalRecord {
        CanonicalRecord {
            master_event_id: master.to_string(),
            event_id: event.to_string(),
            race_name: String::new(),
            race_date: String::new(),
            entity_id: String::new(),
            bib_number: String::new(),
            distance_category: category.to_string(),
            runner_name: String::new(),
            gender: Gender::Unknown,
            age_category: String::new(),
            finish_time_net: String::new(),
            finish_time_gun: String::new(),
            chip_pace: String::new(),
            rank_overall: rank_overall.to_string(),
            rank_gender: String::new(),
            rank_age_category: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(bib: &str, entity: &str) -> CanonicalRecord {
        CanonicalRecord {
            master_event_id: "34990".to_string(),
            event_id: "167062".to_string(),
            race_name: "Alsterlauf Hamburg".to_string(),
            race_date: "SEPTEMBER 08, 2024".to_string(),
            entity_id: entity.to_string(),
            bib_number: bib.to_string(),
            distance_category: "10K".to_string(),
            runner_name: "Jane Doe".to_string(),
            gender: Gender::Female,
            age_category: "W35".to_string(),
            finish_time_net: "00:41:27".to_string(),
            finish_time_gun: String::new(),
            chip_pace: String::new(),
            rank_overall: "159/1360".to_string(),
            rank_gender: "12/540".to_string(),
            rank_age_category: "3/88".to_string(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_gender_from_raw() {
        assert_eq!(Gender::from_raw("M"), Gender::Male);
        assert_eq!(Gender::from_raw("male"), Gender::Male);
        assert_eq!(Gender::from_raw(" F "), Gender::Female);
        assert_eq!(Gender::from_raw("Female"), Gender::Female);
        assert_eq!(Gender::from_raw("W"), Gender::Female);
        assert_eq!(Gender::from_raw(""), Gender::Unknown);
        assert_eq!(Gender::from_raw("non-binary"), Gender::Unknown);
    }

    #[test]
    fn test_identity_prefers_bib() {
        let record = sample_record("4211", "entry-99");
        assert_eq!(record.identity(), ("167062", "4211"));
    }

    #[test]
    fn test_identity_falls_back_to_entity_id() {
        let record = sample_record("", "entry-99");
        assert_eq!(record.identity(), ("167062", "entry-99"));
    }

    #[test]
    fn test_record_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let records = vec![sample_record("4211", "entry-99"), sample_record("", "e2")];
        write_records(&path, &records).unwrap();

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].bib_number, "4211");
        assert_eq!(loaded[1].identity(), ("167062", "e2"));
    }
}
