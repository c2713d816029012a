// ABOUTME: Core domain models for biomarker readings, goals, and completions
// ABOUTME: Canonical types the rest of the crate computes over, normalized at ingestion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Domain models shared across the interpretation core.
//!
//! External payloads are normalized into these types at the ingestion
//! boundary (see [`crate::ingest`]); nothing downstream branches on wire
//! shapes or alternative spellings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of measured health metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomarkerType {
    /// Resting/ambient heart rate in beats per minute
    HeartRate,
    /// Systolic blood pressure component in mmHg
    BloodPressureSystolic,
    /// Diastolic blood pressure component in mmHg
    BloodPressureDiastolic,
    /// Blood glucose in mg/dL
    Glucose,
    /// Daily step count
    Steps,
    /// Sleep duration in hours
    Sleep,
}

impl BiomarkerType {
    /// All biomarker types, in stable presentation order
    pub const ALL: [Self; 6] = [
        Self::HeartRate,
        Self::BloodPressureSystolic,
        Self::BloodPressureDiastolic,
        Self::Glucose,
        Self::Steps,
        Self::Sleep,
    ];

    /// Canonical measurement unit for this biomarker
    #[must_use]
    pub const fn canonical_unit(self) -> &'static str {
        match self {
            Self::HeartRate => "bpm",
            Self::BloodPressureSystolic | Self::BloodPressureDiastolic => "mmHg",
            Self::Glucose => "mg/dL",
            Self::Steps => "steps",
            Self::Sleep => "hours",
        }
    }

    /// Human-readable label for titles and insight text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HeartRate => "Heart Rate",
            Self::BloodPressureSystolic => "Systolic Blood Pressure",
            Self::BloodPressureDiastolic => "Diastolic Blood Pressure",
            Self::Glucose => "Glucose",
            Self::Steps => "Steps",
            Self::Sleep => "Sleep",
        }
    }

    /// Stable snake_case key, also the dedup key for merged recommendations
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::BloodPressureSystolic => "blood_pressure_systolic",
            Self::BloodPressureDiastolic => "blood_pressure_diastolic",
            Self::Glucose => "glucose",
            Self::Steps => "steps",
            Self::Sleep => "sleep",
        }
    }

    /// Whether this metric accumulates over a day (rendered as bars) rather
    /// than sampling a continuous signal (rendered as lines)
    #[must_use]
    pub const fn is_cumulative(self) -> bool {
        matches!(self, Self::Steps | Self::Sleep)
    }

    /// Parse an external type string, tolerating case, separators, and the
    /// aliases backends have been observed to emit. Returns `None` for
    /// unrecognized spellings; callers treat that as an unknown biomarker.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "heartrate" | "hr" | "pulse" | "restingheartrate" => Some(Self::HeartRate),
            "bloodpressuresystolic" | "systolic" | "bpsystolic" | "bpsys" => {
                Some(Self::BloodPressureSystolic)
            }
            "bloodpressurediastolic" | "diastolic" | "bpdiastolic" | "bpdia" => {
                Some(Self::BloodPressureDiastolic)
            }
            "glucose" | "bloodglucose" | "bloodsugar" => Some(Self::Glucose),
            "steps" | "stepcount" | "dailysteps" => Some(Self::Steps),
            "sleep" | "sleephours" | "sleepduration" => Some(Self::Sleep),
            _ => None,
        }
    }
}

impl fmt::Display for BiomarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Origin of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    /// Entered by the user through a form
    Manual,
    /// Imported from a paired device
    Device,
}

/// A single immutable biomarker measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Which biomarker was measured
    pub biomarker_type: BiomarkerType,
    /// Measured value, in `unit`
    pub value: f64,
    /// Measurement unit as recorded
    pub unit: String,
    /// When the measurement was taken
    pub recorded_at: DateTime<Utc>,
    /// How the reading entered the system
    pub source: ReadingSource,
    /// Identifier of the originating device, for device imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Free-form note attached at entry time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reading {
    /// Create a manual reading in the biomarker's canonical unit
    #[must_use]
    pub fn manual(biomarker_type: BiomarkerType, value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            biomarker_type,
            value,
            unit: biomarker_type.canonical_unit().to_owned(),
            recorded_at,
            source: ReadingSource::Manual,
            device_id: None,
            notes: None,
        }
    }

    /// UTC calendar day this reading belongs to (bucketing key)
    #[must_use]
    pub fn calendar_day(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }
}

/// How often a goal repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCadence {
    /// Repeats every day
    Daily,
    /// Repeats every week
    Weekly,
    /// Repeats every month
    Monthly,
}

impl GoalCadence {
    /// Parse an external frequency string; unrecognized values default to daily
    #[must_use]
    pub fn parse_or_daily(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Self::Weekly,
            "monthly" | "month" => Self::Monthly,
            _ => Self::Daily,
        }
    }
}

/// An active user goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal text as authored by the user
    pub text: String,
    /// Repeat cadence
    pub cadence: GoalCadence,
}

/// A recorded goal completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCompletion {
    /// Calendar day the completion was recorded for
    pub completion_date: NaiveDate,
    /// Text of the completed goal
    pub goal_text: String,
    /// Completion status as reported by the backend
    pub status: String,
}

impl GoalCompletion {
    /// Whether this row is an affirmative completion of `goal`, regardless of
    /// when it happened.
    ///
    /// Goal text matching is trimmed and case-insensitive; only affirmative
    /// statuses count (backends also record "skipped" rows).
    #[must_use]
    pub fn matches(&self, goal: &Goal) -> bool {
        self.goal_text.trim().eq_ignore_ascii_case(goal.text.trim())
            && matches!(
                self.status.trim().to_ascii_lowercase().as_str(),
                "completed" | "complete" | "done" | "true"
            )
    }

    /// Whether this completion marks `goal` as done on `day`
    #[must_use]
    pub fn completes(&self, goal: &Goal, day: NaiveDate) -> bool {
        self.completion_date == day && self.matches(goal)
    }
}

/// User profile fields the core consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Active goals
    pub goals: Vec<Goal>,
    /// Dietary/activity restriction strings, surfaced to the presentation layer
    pub restrictions: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_type_parsing_tolerates_spellings() {
        assert_eq!(
            BiomarkerType::parse("Heart Rate"),
            Some(BiomarkerType::HeartRate)
        );
        assert_eq!(
            BiomarkerType::parse("BLOOD_PRESSURE_SYSTOLIC"),
            Some(BiomarkerType::BloodPressureSystolic)
        );
        assert_eq!(
            BiomarkerType::parse("bp-dia"),
            Some(BiomarkerType::BloodPressureDiastolic)
        );
        assert_eq!(
            BiomarkerType::parse("blood sugar"),
            Some(BiomarkerType::Glucose)
        );
        assert_eq!(BiomarkerType::parse("cholesterol"), None);
    }

    #[test]
    fn test_canonical_units() {
        assert_eq!(BiomarkerType::HeartRate.canonical_unit(), "bpm");
        assert_eq!(BiomarkerType::Glucose.canonical_unit(), "mg/dL");
        assert_eq!(BiomarkerType::Sleep.canonical_unit(), "hours");
    }

    #[test]
    fn test_completion_matching() {
        let goal = Goal {
            text: "Walk 30 minutes".into(),
            cadence: GoalCadence::Daily,
        };
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let completion = GoalCompletion {
            completion_date: day,
            goal_text: "  walk 30 minutes ".into(),
            status: "Completed".into(),
        };
        assert!(completion.completes(&goal, day));

        let skipped = GoalCompletion {
            status: "skipped".into(),
            ..completion.clone()
        };
        assert!(!skipped.completes(&goal, day));
    }

    #[test]
    fn test_calendar_day_is_utc_date() {
        let reading = Reading::manual(
            BiomarkerType::Steps,
            3000.0,
            Utc.with_ymd_and_hms(2024, 1, 12, 23, 59, 0).unwrap(),
        );
        assert_eq!(
            reading.calendar_day(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()
        );
    }
}
