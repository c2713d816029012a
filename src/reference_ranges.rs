// ABOUTME: Static per-biomarker reference range table (optimal / normal / critical bounds)
// ABOUTME: Global defaults that threshold resolution falls back to when no override exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Reference range table.
//!
//! Global, non-user-specific default bounds per biomarker type. The table is
//! read-only to the core; user- and provider-authored overrides layer on top
//! of it in [`crate::thresholds`].
//!
//! Cumulative metrics (steps, sleep) deliberately carry no critical bounds:
//! a low step count is not an emergency, and the classifier's "defined"
//! guards skip absent bounds.

use crate::models::BiomarkerType;
use serde::{Deserialize, Serialize};

/// Inclusive `[lo, hi]` interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound, inclusive
    pub lo: f64,
    /// Upper bound, inclusive
    pub hi: f64,
}

impl Bounds {
    /// Create bounds from an inclusive interval
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Whether `value` lies inside the interval, boundaries included
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Default threshold bounds for one biomarker type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    /// Optimal interval
    pub optimal: Bounds,
    /// Normal interval (contains the optimal interval)
    pub normal: Bounds,
    /// Value at or below which a reading is critically low
    pub critical_low: Option<f64>,
    /// Value at or above which a reading is critically high
    pub critical_high: Option<f64>,
}

/// Heart rate reference bounds (bpm)
pub mod heart_rate {
    /// Optimal resting range lower bound
    pub const OPTIMAL_LO: f64 = 60.0;
    /// Optimal resting range upper bound
    pub const OPTIMAL_HI: f64 = 80.0;
    /// Normal range lower bound
    pub const NORMAL_LO: f64 = 60.0;
    /// Normal range upper bound
    pub const NORMAL_HI: f64 = 100.0;
    /// Critically low threshold
    pub const CRITICAL_LOW: f64 = 40.0;
    /// Critically high threshold
    pub const CRITICAL_HIGH: f64 = 120.0;
}

/// Systolic blood pressure reference bounds (mmHg)
pub mod bp_systolic {
    /// Optimal range lower bound
    pub const OPTIMAL_LO: f64 = 90.0;
    /// Optimal range upper bound
    pub const OPTIMAL_HI: f64 = 120.0;
    /// Normal range lower bound
    pub const NORMAL_LO: f64 = 90.0;
    /// Normal range upper bound
    pub const NORMAL_HI: f64 = 130.0;
    /// Critically low threshold
    pub const CRITICAL_LOW: f64 = 70.0;
    /// Critically high threshold
    pub const CRITICAL_HIGH: f64 = 180.0;
}

/// Diastolic blood pressure reference bounds (mmHg)
pub mod bp_diastolic {
    /// Optimal range lower bound
    pub const OPTIMAL_LO: f64 = 60.0;
    /// Optimal range upper bound
    pub const OPTIMAL_HI: f64 = 80.0;
    /// Normal range lower bound
    pub const NORMAL_LO: f64 = 60.0;
    /// Normal range upper bound
    pub const NORMAL_HI: f64 = 85.0;
    /// Critically low threshold
    pub const CRITICAL_LOW: f64 = 40.0;
    /// Critically high threshold
    pub const CRITICAL_HIGH: f64 = 120.0;
}

/// Blood glucose reference bounds (mg/dL)
pub mod glucose {
    /// Optimal fasting range lower bound
    pub const OPTIMAL_LO: f64 = 70.0;
    /// Optimal fasting range upper bound
    pub const OPTIMAL_HI: f64 = 100.0;
    /// Normal range lower bound
    pub const NORMAL_LO: f64 = 70.0;
    /// Normal range upper bound
    pub const NORMAL_HI: f64 = 140.0;
    /// Critically low threshold (hypoglycemia)
    pub const CRITICAL_LOW: f64 = 54.0;
    /// Critically high threshold (hyperglycemia)
    pub const CRITICAL_HIGH: f64 = 250.0;
}

/// Daily step count reference bounds
pub mod steps {
    /// Optimal activity range lower bound
    pub const OPTIMAL_LO: f64 = 8_000.0;
    /// Optimal activity range upper bound
    pub const OPTIMAL_HI: f64 = 12_000.0;
    /// Normal activity range lower bound
    pub const NORMAL_LO: f64 = 5_000.0;
    /// Normal activity range upper bound
    pub const NORMAL_HI: f64 = 15_000.0;
}

/// Sleep duration reference bounds (hours)
pub mod sleep {
    /// Optimal duration lower bound
    pub const OPTIMAL_LO: f64 = 7.0;
    /// Optimal duration upper bound
    pub const OPTIMAL_HI: f64 = 9.0;
    /// Normal duration lower bound
    pub const NORMAL_LO: f64 = 6.0;
    /// Normal duration upper bound
    pub const NORMAL_HI: f64 = 10.0;
}

/// Look up the reference range for a biomarker type.
///
/// Total over the enum; "type not found" only arises for unparseable
/// external type strings, which ingestion already dropped.
#[must_use]
pub const fn range_for(biomarker_type: BiomarkerType) -> ReferenceRange {
    match biomarker_type {
        BiomarkerType::HeartRate => ReferenceRange {
            optimal: Bounds::new(heart_rate::OPTIMAL_LO, heart_rate::OPTIMAL_HI),
            normal: Bounds::new(heart_rate::NORMAL_LO, heart_rate::NORMAL_HI),
            critical_low: Some(heart_rate::CRITICAL_LOW),
            critical_high: Some(heart_rate::CRITICAL_HIGH),
        },
        BiomarkerType::BloodPressureSystolic => ReferenceRange {
            optimal: Bounds::new(bp_systolic::OPTIMAL_LO, bp_systolic::OPTIMAL_HI),
            normal: Bounds::new(bp_systolic::NORMAL_LO, bp_systolic::NORMAL_HI),
            critical_low: Some(bp_systolic::CRITICAL_LOW),
            critical_high: Some(bp_systolic::CRITICAL_HIGH),
        },
        BiomarkerType::BloodPressureDiastolic => ReferenceRange {
            optimal: Bounds::new(bp_diastolic::OPTIMAL_LO, bp_diastolic::OPTIMAL_HI),
            normal: Bounds::new(bp_diastolic::NORMAL_LO, bp_diastolic::NORMAL_HI),
            critical_low: Some(bp_diastolic::CRITICAL_LOW),
            critical_high: Some(bp_diastolic::CRITICAL_HIGH),
        },
        BiomarkerType::Glucose => ReferenceRange {
            optimal: Bounds::new(glucose::OPTIMAL_LO, glucose::OPTIMAL_HI),
            normal: Bounds::new(glucose::NORMAL_LO, glucose::NORMAL_HI),
            critical_low: Some(glucose::CRITICAL_LOW),
            critical_high: Some(glucose::CRITICAL_HIGH),
        },
        BiomarkerType::Steps => ReferenceRange {
            optimal: Bounds::new(steps::OPTIMAL_LO, steps::OPTIMAL_HI),
            normal: Bounds::new(steps::NORMAL_LO, steps::NORMAL_HI),
            critical_low: None,
            critical_high: None,
        },
        BiomarkerType::Sleep => ReferenceRange {
            optimal: Bounds::new(sleep::OPTIMAL_LO, sleep::OPTIMAL_HI),
            normal: Bounds::new(sleep::NORMAL_LO, sleep::NORMAL_HI),
            critical_low: None,
            critical_high: None,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_nested_in_normal() {
        for biomarker_type in BiomarkerType::ALL {
            let range = range_for(biomarker_type);
            assert!(range.normal.lo <= range.optimal.lo, "{biomarker_type}");
            assert!(range.normal.hi >= range.optimal.hi, "{biomarker_type}");
        }
    }

    #[test]
    fn test_critical_rails_outside_normal() {
        for biomarker_type in BiomarkerType::ALL {
            let range = range_for(biomarker_type);
            if let Some(cl) = range.critical_low {
                assert!(cl < range.normal.lo, "{biomarker_type}");
            }
            if let Some(ch) = range.critical_high {
                assert!(ch > range.normal.hi, "{biomarker_type}");
            }
        }
    }

    #[test]
    fn test_cumulative_metrics_have_no_critical_bounds() {
        for biomarker_type in [BiomarkerType::Steps, BiomarkerType::Sleep] {
            let range = range_for(biomarker_type);
            assert!(range.critical_low.is_none());
            assert!(range.critical_high.is_none());
        }
    }

    #[test]
    fn test_bounds_inclusive() {
        let bounds = Bounds::new(60.0, 80.0);
        assert!(bounds.contains(60.0));
        assert!(bounds.contains(80.0));
        assert!(!bounds.contains(80.1));
    }
}
