// ABOUTME: Shape-tolerant adapters normalizing backend payloads into canonical domain types
// ABOUTME: One explicit adapter per wire shape; nothing deeper in the pipeline branches on shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Ingestion boundary.
//!
//! The backend is shape-tolerant territory: list endpoints answer either with
//! a bare array or a keyed object, profile goals arrive structured or as a
//! legacy comma-separated string, and dates come in several formats. Each
//! accepted shape has one explicit adapter here, normalizing immediately to
//! the canonical types in [`crate::models`].
//!
//! Shape problems never error: absent fields and containers degrade to empty
//! collections, and malformed entries are skipped individually with a
//! `debug!` trace.

use crate::models::{
    BiomarkerType, Goal, GoalCadence, GoalCompletion, Profile, Reading, ReadingSource,
};
use crate::thresholds::{OverrideAuthor, OverrideBounds, OverrideSet, ThresholdOverride};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// A recommendation as supplied by the backend, normalized but not yet
/// categorized. Categorization hints are carried verbatim for the
/// synthesizer's partition heuristic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalRecommendation {
    /// Stable backend identifier
    pub id: String,
    /// Recommendation title
    pub title: String,
    /// Recommendation body
    pub description: String,
    /// Raw `biomarker` / `biomarker_type` field, when present
    pub biomarker_hint: Option<String>,
    /// Raw `goal` / `goal_id` field, when present
    pub goal_hint: Option<String>,
    /// Raw `type` / `category` / `source` strings, when present
    pub kind_hints: Vec<String>,
}

/// Parse a timestamp in any of the formats backends emit: RFC 3339, naive
/// datetime, or a bare `YYYY-MM-DD` (midnight UTC)
#[must_use]
pub fn parse_flexible_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }
    None
}

/// Parse a calendar date, also accepting full datetimes (date part taken)
#[must_use]
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_flexible_datetime(raw).map(|dt| dt.date_naive())
}

/// Numeric field that may arrive as a JSON number or a numeric string
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String field that may arrive as a JSON string or number
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_string(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| value_as_string(obj.get(*key)?))
}

/// The two container shapes list endpoints answer with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    /// Bare array of entries
    Bare(Vec<Value>),
    /// Entries nested under a wrapper key
    Keyed {
        #[serde(default)]
        recommendations: Vec<Value>,
    },
}

/// Normalize the active-recommendations payload (bare array or
/// `{"recommendations": [...]}`). Entries without usable content are skipped.
#[must_use]
pub fn parse_recommendations(payload: &Value) -> Vec<ExternalRecommendation> {
    let entries = match ListPayload::deserialize(payload) {
        Ok(ListPayload::Bare(entries)) | Ok(ListPayload::Keyed { recommendations: entries }) => {
            entries
        }
        Err(_) => {
            debug!("unrecognized recommendations container shape, treating as empty");
            Vec::new()
        }
    };

    entries
        .iter()
        .filter_map(|entry| {
            let rec = parse_recommendation_entry(entry);
            if rec.is_none() {
                debug!("skipping malformed recommendation entry");
            }
            rec
        })
        .collect()
}

fn parse_recommendation_entry(entry: &Value) -> Option<ExternalRecommendation> {
    if !entry.is_object() {
        return None;
    }
    let id = first_string(entry, &["id", "recommendation_id", "uuid"])?;
    let title = first_string(entry, &["title", "name"]).unwrap_or_default();
    let description = first_string(entry, &["description", "text", "body"]).unwrap_or_default();
    if title.is_empty() && description.is_empty() {
        return None;
    }

    let kind_hints = ["type", "category", "source"]
        .into_iter()
        .filter_map(|key| entry.get(key).and_then(value_as_string))
        .collect();

    Some(ExternalRecommendation {
        id,
        title,
        description,
        biomarker_hint: first_string(entry, &["biomarker", "biomarker_type"]),
        goal_hint: first_string(entry, &["goal", "goal_id"]),
        kind_hints,
    })
}

/// Goals field of the profile: structured entries or the legacy
/// comma-separated string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoalsField {
    Structured(Vec<RawGoal>),
    Legacy(String),
}

#[derive(Debug, Deserialize)]
struct RawGoal {
    #[serde(default)]
    goal: String,
    #[serde(default)]
    frequency: String,
}

/// Normalize the current-profile payload: goals (either shape) and
/// restrictions. Empty / missing fields yield an empty profile.
#[must_use]
pub fn parse_profile(payload: &Value) -> Profile {
    let goals = payload
        .get("goals")
        .and_then(|field| GoalsField::deserialize(field).ok())
        .map_or_else(Vec::new, |field| match field {
            GoalsField::Structured(raw) => raw
                .into_iter()
                .filter(|g| !g.goal.trim().is_empty())
                .map(|g| Goal {
                    text: g.goal.trim().to_owned(),
                    cadence: GoalCadence::parse_or_daily(&g.frequency),
                })
                .collect(),
            // Legacy profiles store goals as one comma-separated string with
            // no cadence information; each segment defaults to daily.
            GoalsField::Legacy(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(|segment| Goal {
                    text: segment.to_owned(),
                    cadence: GoalCadence::Daily,
                })
                .collect(),
        });

    let restrictions = payload
        .get("restrictions")
        .and_then(Value::as_array)
        .map_or_else(Vec::new, |entries| {
            entries.iter().filter_map(value_as_string).collect()
        });

    Profile {
        goals,
        restrictions,
    }
}

/// Normalize the goal-completions payload (array of
/// `{completion_date, goal_text, status}`); malformed rows are skipped.
#[must_use]
pub fn parse_completions(payload: &Value) -> Vec<GoalCompletion> {
    let Some(entries) = payload.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let completion_date = first_string(entry, &["completion_date", "date"])
                .as_deref()
                .and_then(parse_flexible_date)?;
            let goal_text = first_string(entry, &["goal_text", "goal"])?;
            let status = first_string(entry, &["status"]).unwrap_or_else(|| "completed".into());
            Some(GoalCompletion {
                completion_date,
                goal_text,
                status,
            })
        })
        .collect()
}

/// Normalize one raw reading object. `fallback_type` supplies the biomarker
/// when the entry itself carries none (keyed snapshot shapes).
fn parse_reading_entry(entry: &Value, fallback_type: Option<BiomarkerType>) -> Option<Reading> {
    let biomarker_type = first_string(entry, &["biomarker_type", "type", "biomarker"])
        .as_deref()
        .and_then(BiomarkerType::parse)
        .or(fallback_type)?;

    let value = entry.get("value").and_then(value_as_f64)?;

    let recorded_at = first_string(entry, &["recorded_at", "timestamp", "date"])
        .as_deref()
        .and_then(parse_flexible_datetime)
        .unwrap_or_else(Utc::now);

    let source = first_string(entry, &["source"])
        .map(|s| {
            if s.trim().eq_ignore_ascii_case("device") {
                ReadingSource::Device
            } else {
                ReadingSource::Manual
            }
        })
        .unwrap_or(ReadingSource::Manual);

    Some(Reading {
        biomarker_type,
        value,
        unit: first_string(entry, &["unit"])
            .unwrap_or_else(|| biomarker_type.canonical_unit().to_owned()),
        recorded_at,
        source,
        device_id: first_string(entry, &["device_id"]),
        notes: first_string(entry, &["notes", "note"]),
    })
}

/// Normalize the biomarker dashboard snapshot. Accepts both a keyed-by-type
/// object (`{"heart_rate": {...}, ...}`) and an array of reading objects;
/// entries with unparseable types or values are dropped.
#[must_use]
pub fn parse_snapshot(payload: &Value) -> Vec<Reading> {
    match payload {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| {
                let reading = parse_reading_entry(entry, None);
                if reading.is_none() {
                    debug!("skipping malformed snapshot entry");
                }
                reading
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, entry)| {
                let Some(biomarker_type) = BiomarkerType::parse(key) else {
                    debug!(key = %key, "skipping snapshot entry with unknown biomarker key");
                    return None;
                };
                // Keyed entries may be a full object or a bare number.
                if let Some(value) = value_as_f64(entry) {
                    return Some(Reading::manual(biomarker_type, value, Utc::now()));
                }
                parse_reading_entry(entry, Some(biomarker_type))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_override_entry(
    entry: &Value,
    biomarker_type: BiomarkerType,
    set_by: OverrideAuthor,
) -> Option<ThresholdOverride> {
    if !entry.is_object() {
        return None;
    }
    let bounds = OverrideBounds {
        warning_low: entry.get("warning_low").and_then(value_as_f64),
        warning_high: entry.get("warning_high").and_then(value_as_f64),
        critical_low: entry.get("critical_low").and_then(value_as_f64),
        critical_high: entry.get("critical_high").and_then(value_as_f64),
    };
    let mut parsed = ThresholdOverride::new(biomarker_type, set_by, bounds);
    if let Some(id) = first_string(entry, &["id", "override_id"])
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
    {
        parsed.id = id;
    }
    Some(parsed)
}

/// Normalize the threshold-overrides payload for one biomarker. Accepts a
/// tiered object (`{"provider": {...}, "patient": {...}}`) or an array of
/// entries carrying a `set_by` field; anything else yields the empty set.
#[must_use]
pub fn parse_override_set(payload: &Value, biomarker_type: BiomarkerType) -> OverrideSet {
    let mut set = OverrideSet::default();
    match payload {
        Value::Object(map) if map.contains_key("provider") || map.contains_key("patient") => {
            set.provider = map
                .get("provider")
                .and_then(|e| parse_override_entry(e, biomarker_type, OverrideAuthor::Provider));
            set.patient = map
                .get("patient")
                .and_then(|e| parse_override_entry(e, biomarker_type, OverrideAuthor::Patient));
        }
        Value::Array(entries) => {
            for entry in entries {
                let set_by = match first_string(entry, &["set_by", "scope"]).as_deref() {
                    Some(s) if s.trim().eq_ignore_ascii_case("provider") => {
                        OverrideAuthor::Provider
                    }
                    _ => OverrideAuthor::Patient,
                };
                let Some(parsed) = parse_override_entry(entry, biomarker_type, set_by) else {
                    debug!("skipping malformed threshold override entry");
                    continue;
                };
                match set_by {
                    OverrideAuthor::Provider => set.provider = Some(parsed),
                    OverrideAuthor::Patient => set.patient = Some(parsed),
                }
            }
        }
        _ => {
            debug!("unrecognized threshold overrides shape, treating as empty");
        }
    }
    set
}

/// Normalize a biomarker history payload, keeping at most `limit` of the most
/// recent readings, newest first.
#[must_use]
pub fn parse_history(payload: &Value, limit: usize) -> Vec<Reading> {
    let mut readings = parse_snapshot(payload);
    readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    readings.truncate(limit);
    readings
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendations_bare_array_and_keyed_object() {
        let bare = json!([
            {"id": "r1", "title": "Hydrate", "description": "Drink more water"}
        ]);
        let keyed = json!({
            "recommendations": [
                {"id": "r1", "title": "Hydrate", "description": "Drink more water"}
            ]
        });
        assert_eq!(parse_recommendations(&bare), parse_recommendations(&keyed));
        assert_eq!(parse_recommendations(&bare).len(), 1);
    }

    #[test]
    fn test_recommendation_id_fallbacks_and_numeric_id() {
        let payload = json!([
            {"recommendation_id": 42, "title": "Move more"},
            {"uuid": "u-1", "text": "Sleep earlier"},
            {"title": "no id, dropped"}
        ]);
        let recs = parse_recommendations(&payload);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, "42");
        assert_eq!(recs[1].id, "u-1");
        assert_eq!(recs[1].description, "Sleep earlier");
    }

    #[test]
    fn test_profile_structured_and_legacy_goals() {
        let structured = json!({
            "goals": [{"goal": "Walk 30 minutes", "frequency": "daily"}],
            "restrictions": ["low sodium"]
        });
        let profile = parse_profile(&structured);
        assert_eq!(profile.goals.len(), 1);
        assert_eq!(profile.goals[0].cadence, GoalCadence::Daily);
        assert_eq!(profile.restrictions, vec!["low sodium".to_owned()]);

        let legacy = json!({"goals": "Walk 30 minutes, Meditate , "});
        let profile = parse_profile(&legacy);
        assert_eq!(profile.goals.len(), 2);
        assert_eq!(profile.goals[1].text, "Meditate");
    }

    #[test]
    fn test_missing_containers_degrade_to_empty() {
        assert!(parse_recommendations(&json!({"unexpected": true})).is_empty());
        assert!(parse_profile(&json!({})).goals.is_empty());
        assert!(parse_completions(&json!({"not": "an array"})).is_empty());
        assert!(parse_snapshot(&json!(null)).is_empty());
    }

    #[test]
    fn test_snapshot_keyed_and_array_shapes() {
        let keyed = json!({
            "heart_rate": {"value": 72, "recorded_at": "2024-01-10T08:00:00Z"},
            "steps": 4200,
            "cholesterol": {"value": 180}
        });
        let mut readings = parse_snapshot(&keyed);
        readings.sort_by_key(|r| r.biomarker_type);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].biomarker_type, BiomarkerType::HeartRate);
        assert!((readings[0].value - 72.0).abs() < f64::EPSILON);
        assert_eq!(readings[1].biomarker_type, BiomarkerType::Steps);

        let array = json!([
            {"type": "glucose", "value": "95", "recorded_at": "2024-01-10"}
        ]);
        let readings = parse_snapshot(&array);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].biomarker_type, BiomarkerType::Glucose);
        assert!((readings[0].value - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_limit_keeps_most_recent() {
        let payload = json!([
            {"type": "heart_rate", "value": 70, "recorded_at": "2024-01-01T08:00:00Z"},
            {"type": "heart_rate", "value": 72, "recorded_at": "2024-01-03T08:00:00Z"},
            {"type": "heart_rate", "value": 71, "recorded_at": "2024-01-02T08:00:00Z"}
        ]);
        let readings = parse_history(&payload, 2);
        assert_eq!(readings.len(), 2);
        assert!((readings[0].value - 72.0).abs() < f64::EPSILON);
        assert!((readings[1].value - 71.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_set_tiered_and_array_shapes() {
        let tiered = json!({
            "provider": {"id": "f2b7a4c0-0000-0000-0000-000000000001", "warning_high": 110.0},
            "patient": {"critical_high": 130.0}
        });
        let set = parse_override_set(&tiered, BiomarkerType::HeartRate);
        let provider = set.provider.unwrap();
        assert_eq!(provider.set_by, OverrideAuthor::Provider);
        assert_eq!(provider.warning_high, Some(110.0));
        assert_eq!(
            provider.id.to_string(),
            "f2b7a4c0-0000-0000-0000-000000000001"
        );
        assert_eq!(set.patient.unwrap().critical_high, Some(130.0));

        let array = json!([
            {"set_by": "provider", "warning_low": 55.0},
            {"set_by": "patient", "warning_low": 50.0}
        ]);
        let set = parse_override_set(&array, BiomarkerType::HeartRate);
        assert_eq!(set.provider.unwrap().warning_low, Some(55.0));
        assert_eq!(set.patient.unwrap().warning_low, Some(50.0));

        assert!(parse_override_set(&json!(17), BiomarkerType::Glucose)
            .provider
            .is_none());
    }

    #[test]
    fn test_flexible_datetime_formats() {
        assert!(parse_flexible_datetime("2024-01-10T08:30:00Z").is_some());
        assert!(parse_flexible_datetime("2024-01-10T08:30:00").is_some());
        assert!(parse_flexible_datetime("2024-01-10").is_some());
        assert!(parse_flexible_datetime("next tuesday").is_none());
    }
}
