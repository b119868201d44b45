//! Record Normalizer
//!
//! Maps an adapter's structured detail payload into a [`CanonicalRecord`].
//! The normalizer is deliberately forgiving about content: absent optional
//! fields become empty strings, unrecognized gender values become
//! [`Gender::Unknown`], and rank/time strings pass through verbatim. It is
//! strict about shape: a payload that is not a JSON object yields an error,
//! never a partial record.

use crate::record::{CanonicalRecord, Gender};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Normalization failures
#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("detail payload for entity '{entity_id}' is not a structured object")]
    UnexpectedShape { entity_id: String },
}

/// Crawl-side context a detail payload cannot carry itself
///
/// The hierarchy walk knows which event and listing a leaf came from; the
/// payload only describes the runner.
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub master_event_id: String,
    pub event_id: String,
    pub race_name: String,
    pub race_date: String,
    pub distance_category: String,
    pub entity_id: String,
}

/// Canonical field names recognized in detail payloads
const CANONICAL_FIELDS: &[&str] = &[
    "bib_number",
    "distance_category",
    "runner_name",
    "gender",
    "age_category",
    "finish_time_net",
    "finish_time_gun",
    "chip_pace",
    "rank_overall",
    "rank_gender",
    "rank_age_category",
];

/// Normalizes one detail payload into a canonical record
///
/// `payload` must be a JSON object; its recognized fields fill the canonical
/// columns and any other scalar fields land in the record's extension map.
/// The listing's category is used when the payload does not name one.
pub fn normalize(
    payload: &Value,
    context: &RecordContext,
) -> Result<CanonicalRecord, NormalizationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| NormalizationError::UnexpectedShape {
            entity_id: context.entity_id.clone(),
        })?;

    let field = |name: &str| -> String {
        object
            .get(name)
            .map(scalar_to_string)
            .unwrap_or_default()
    };

    let distance_category = {
        let from_payload = field("distance_category");
        if from_payload.is_empty() {
            context.distance_category.clone()
        } else {
            from_payload
        }
    };

    let mut extra = BTreeMap::new();
    for (key, value) in object {
        if CANONICAL_FIELDS.contains(&key.as_str()) {
            continue;
        }
        // Nested structures stay with the adapter; only scalars extend the record
        if !value.is_object() && !value.is_array() {
            extra.insert(key.clone(), scalar_to_string(value));
        }
    }

    Ok(CanonicalRecord {
        master_event_id: context.master_event_id.clone(),
        event_id: context.event_id.clone(),
        race_name: context.race_name.clone(),
        race_date: context.race_date.clone(),
        entity_id: context.entity_id.clone(),
        bib_number: field("bib_number"),
        distance_category,
        runner_name: field("runner_name"),
        gender: Gender::from_raw(&field("gender")),
        age_category: field("age_category"),
        finish_time_net: field("finish_time_net"),
        finish_time_gun: field("finish_time_gun"),
        chip_pace: field("chip_pace"),
        rank_overall: field("rank_overall"),
        rank_gender: field("rank_gender"),
        rank_age_category: field("rank_age_category"),
        extra,
    })
}

/// Renders a scalar JSON value as the string the record stores
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
