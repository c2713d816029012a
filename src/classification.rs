// ABOUTME: Pure biomarker classifier mapping (value, effective thresholds) to a status label
// ABOUTME: Ordered rule table with first-match-wins precedence; unclassifiable input yields Unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Biomarker classification.
//!
//! Precedence is first match wins over [`RULE_ORDER`]; ranges may abut or
//! overlap at their boundaries, so the order is load-bearing. Boundaries are
//! inclusive for the critical, optimal, and normal rules. Missing or
//! non-finite values short-circuit to [`BiomarkerStatus::Unknown`] before any
//! rule runs; classification never errors.

use crate::thresholds::EffectiveThreshold;
use serde::{Deserialize, Serialize};

/// Classification outcome for one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomarkerStatus {
    /// At or below the critical lower bound
    CriticalLow,
    /// At or above the critical upper bound
    CriticalHigh,
    /// Inside the optimal interval
    Optimal,
    /// Inside the normal interval (but outside optimal)
    Normal,
    /// Above the optimal interval without reaching critical
    High,
    /// Below the optimal interval without reaching critical
    Low,
    /// No applicable bound, or unclassifiable input
    Unknown,
}

impl BiomarkerStatus {
    /// Severity rank used for title decoration and output ordering:
    /// critical > elevated/low > optimal > normal > unclassified
    #[must_use]
    pub const fn severity_rank(self) -> u8 {
        match self {
            Self::CriticalLow | Self::CriticalHigh => 4,
            Self::High | Self::Low => 3,
            Self::Optimal => 2,
            Self::Normal => 1,
            Self::Unknown => 0,
        }
    }

    /// Short label used in insight titles
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CriticalLow => "Critically Low",
            Self::CriticalHigh => "Critically High",
            Self::Optimal => "Optimal",
            Self::Normal => "Normal",
            Self::High => "Elevated",
            Self::Low => "Low",
            Self::Unknown => "Unclassified",
        }
    }
}

/// One rule of the classification decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// `critical_low` defined and value <= it
    CriticalLow,
    /// `critical_high` defined and value >= it
    CriticalHigh,
    /// Optimal interval defined and value inside it (inclusive)
    Optimal,
    /// Normal interval defined and value inside it (inclusive)
    Normal,
    /// Optimal interval defined and value above its upper bound
    AboveOptimal,
    /// Optimal interval defined and value below its lower bound
    BelowOptimal,
}

/// The decision table, evaluated top to bottom
pub const RULE_ORDER: [ClassificationRule; 6] = [
    ClassificationRule::CriticalLow,
    ClassificationRule::CriticalHigh,
    ClassificationRule::Optimal,
    ClassificationRule::Normal,
    ClassificationRule::AboveOptimal,
    ClassificationRule::BelowOptimal,
];

impl ClassificationRule {
    /// Apply this rule to a finite value, yielding a status when it matches
    #[must_use]
    pub fn apply(self, value: f64, effective: &EffectiveThreshold) -> Option<BiomarkerStatus> {
        match self {
            Self::CriticalLow => effective
                .critical_low
                .filter(|cl| value <= *cl)
                .map(|_| BiomarkerStatus::CriticalLow),
            Self::CriticalHigh => effective
                .critical_high
                .filter(|ch| value >= *ch)
                .map(|_| BiomarkerStatus::CriticalHigh),
            Self::Optimal => effective
                .optimal
                .filter(|b| b.contains(value))
                .map(|_| BiomarkerStatus::Optimal),
            Self::Normal => effective
                .normal
                .filter(|b| b.contains(value))
                .map(|_| BiomarkerStatus::Normal),
            Self::AboveOptimal => effective
                .optimal
                .filter(|b| value > b.hi)
                .map(|_| BiomarkerStatus::High),
            Self::BelowOptimal => effective
                .optimal
                .filter(|b| value < b.lo)
                .map(|_| BiomarkerStatus::Low),
        }
    }
}

/// Classify a value against an effective threshold set.
///
/// `None`, NaN, and infinite values are unclassifiable and return
/// [`BiomarkerStatus::Unknown`] without evaluating any bound.
#[must_use]
pub fn classify(value: Option<f64>, effective: &EffectiveThreshold) -> BiomarkerStatus {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return BiomarkerStatus::Unknown;
    };

    RULE_ORDER
        .iter()
        .find_map(|rule| rule.apply(value, effective))
        .unwrap_or(BiomarkerStatus::Unknown)
}
