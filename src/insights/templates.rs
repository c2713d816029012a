// ABOUTME: Fixed template banks for derived recommendations
// ABOUTME: Goal guidance keyed by cadence; biomarker titles/bodies keyed by (type, status)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Derived-recommendation templates.
//!
//! All guidance text is canned and selected deterministically: goal entries
//! by cadence, biomarker entries by (type, status) with the governing
//! threshold numbers embedded. No randomness — identical inputs produce
//! identical text, which keeps content-derived ids stable across reloads.

use crate::classification::BiomarkerStatus;
use crate::models::{BiomarkerType, GoalCadence};
use crate::thresholds::EffectiveThreshold;

/// Title and body of one derived recommendation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationTemplate {
    /// Entry title
    pub title: String,
    /// Entry body
    pub description: String,
}

/// Canned guidance per goal cadence
#[must_use]
pub const fn goal_guidance(cadence: GoalCadence) -> &'static str {
    match cadence {
        GoalCadence::Daily => {
            "You haven't checked this off today. Small daily wins compound; find a moment for it before the day ends."
        }
        GoalCadence::Weekly => {
            "This is one of your weekly goals. Pick a day this week and put it on your calendar so it doesn't slip."
        }
        GoalCadence::Monthly => {
            "This monthly goal is still open. Break it into a smaller step you can take this week."
        }
    }
}

/// Build the derived entry for an open goal
#[must_use]
pub fn goal_template(goal_text: &str, cadence: GoalCadence) -> RecommendationTemplate {
    RecommendationTemplate {
        title: format!("Goal: {goal_text}"),
        description: goal_guidance(cadence).to_owned(),
    }
}

/// Per-type advice line appended to out-of-range biomarker bodies
#[must_use]
pub const fn biomarker_advice(biomarker_type: BiomarkerType, status: BiomarkerStatus) -> &'static str {
    match (biomarker_type, status) {
        (_, BiomarkerStatus::CriticalLow | BiomarkerStatus::CriticalHigh) => {
            "Contact your care provider promptly."
        }
        (BiomarkerType::HeartRate, BiomarkerStatus::High) => {
            "Elevated resting heart rate can reflect stress, caffeine, or poor sleep. Take a quiet moment and re-measure."
        }
        (BiomarkerType::HeartRate, BiomarkerStatus::Low) => {
            "A low resting heart rate can be normal for active people; mention it at your next check-in if you feel lightheaded."
        }
        (
            BiomarkerType::BloodPressureSystolic | BiomarkerType::BloodPressureDiastolic,
            BiomarkerStatus::High,
        ) => "Reduce sodium, stay hydrated, and re-measure after resting for five minutes.",
        (
            BiomarkerType::BloodPressureSystolic | BiomarkerType::BloodPressureDiastolic,
            BiomarkerStatus::Low,
        ) => "Stand up slowly and keep fluids up; discuss recurring low readings with your provider.",
        (BiomarkerType::Glucose, BiomarkerStatus::High) => {
            "Favor lower-glycemic meals and a short walk after eating."
        }
        (BiomarkerType::Glucose, BiomarkerStatus::Low) => {
            "Have a small snack with carbohydrates and protein, then re-check."
        }
        (BiomarkerType::Steps, BiomarkerStatus::High) => {
            "Great activity level. Keep recovery days in the mix."
        }
        (BiomarkerType::Steps, BiomarkerStatus::Low) => {
            "A short walk after meals is an easy way to close the gap."
        }
        (BiomarkerType::Sleep, BiomarkerStatus::High) => {
            "Consistently long sleep can signal poor sleep quality; keep a regular wake time."
        }
        (BiomarkerType::Sleep, BiomarkerStatus::Low) => {
            "Aim for a consistent bedtime and wind down without screens."
        }
        (_, BiomarkerStatus::Optimal) => "Keep doing what you're doing.",
        (_, BiomarkerStatus::Normal) => "You're in the normal range, with room to optimize.",
        (_, BiomarkerStatus::Unknown) => {
            "Not enough threshold information to classify this reading."
        }
    }
}

/// Format a bound for display, trimming a trailing `.0`
fn fmt_bound(value: f64) -> String {
    if (value.fract()).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Build the derived entry for a classified biomarker reading.
///
/// Titles are decorated with the status label (severity ordering critical >
/// elevated/low > optimal > normal > unclassified); bodies embed the
/// threshold numbers that governed the classification.
#[must_use]
pub fn biomarker_template(
    biomarker_type: BiomarkerType,
    status: BiomarkerStatus,
    value: f64,
    effective: &EffectiveThreshold,
) -> RecommendationTemplate {
    let label = biomarker_type.label();
    let unit = biomarker_type.canonical_unit();
    let reading = format!("Your latest {label} reading is {} {unit}", fmt_bound(value));

    let context = match status {
        BiomarkerStatus::CriticalLow => effective
            .critical_low
            .map(|cl| format!("at or below the critical threshold of {} {unit}", fmt_bound(cl))),
        BiomarkerStatus::CriticalHigh => effective
            .critical_high
            .map(|ch| format!("at or above the critical threshold of {} {unit}", fmt_bound(ch))),
        BiomarkerStatus::Optimal => effective.optimal.map(|b| {
            format!(
                "inside the optimal range of {}-{} {unit}",
                fmt_bound(b.lo),
                fmt_bound(b.hi)
            )
        }),
        BiomarkerStatus::Normal => effective.normal.map(|b| {
            format!(
                "inside the normal range of {}-{} {unit}",
                fmt_bound(b.lo),
                fmt_bound(b.hi)
            )
        }),
        BiomarkerStatus::High => effective.optimal.map(|b| {
            format!(
                "above the optimal range of {}-{} {unit}",
                fmt_bound(b.lo),
                fmt_bound(b.hi)
            )
        }),
        BiomarkerStatus::Low => effective.optimal.map(|b| {
            format!(
                "below the optimal range of {}-{} {unit}",
                fmt_bound(b.lo),
                fmt_bound(b.hi)
            )
        }),
        BiomarkerStatus::Unknown => None,
    };

    let body = context.map_or_else(
        || format!("{reading}."),
        |context| format!("{reading}, {context}."),
    );

    RecommendationTemplate {
        title: format!("{} {label}", status.label()),
        description: format!("{body} {}", biomarker_advice(biomarker_type, status)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ThresholdResolverConfig;
    use crate::thresholds::{resolve, OverrideSet};

    #[test]
    fn test_goal_guidance_is_distinct_per_cadence() {
        let daily = goal_guidance(GoalCadence::Daily);
        let weekly = goal_guidance(GoalCadence::Weekly);
        let monthly = goal_guidance(GoalCadence::Monthly);
        assert_ne!(daily, weekly);
        assert_ne!(weekly, monthly);
        assert_ne!(daily, monthly);
    }

    #[test]
    fn test_biomarker_template_embeds_threshold_numbers() {
        let effective = resolve(
            BiomarkerType::HeartRate,
            &OverrideSet::default(),
            &ThresholdResolverConfig::default(),
        )
        .effective;

        let template = biomarker_template(
            BiomarkerType::HeartRate,
            BiomarkerStatus::CriticalHigh,
            125.0,
            &effective,
        );
        assert_eq!(template.title, "Critically High Heart Rate");
        assert!(template.description.contains("125 bpm"));
        assert!(template.description.contains("120 bpm"));

        let template = biomarker_template(
            BiomarkerType::HeartRate,
            BiomarkerStatus::Normal,
            85.0,
            &effective,
        );
        assert!(template.description.contains("60-100 bpm"));
    }

    #[test]
    fn test_templates_are_deterministic() {
        let a = goal_template("Walk 30 minutes", GoalCadence::Daily);
        let b = goal_template("Walk 30 minutes", GoalCadence::Daily);
        assert_eq!(a, b);
    }
}
