// ABOUTME: Threshold override model and effective-threshold resolution
// ABOUTME: Merges provider/patient overrides with reference defaults under provider > patient > default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Threshold resolution.
//!
//! A user+biomarker pair may carry up to one patient-authored and one
//! provider-authored override. Resolution picks the highest-priority tier
//! that exists and takes it in its entirety; bounds are never merged across
//! tiers. The default tier derives from the reference range table, with the
//! warning bounds governed by [`WarningDerivation`].

use crate::config::{ThresholdResolverConfig, WarningDerivation};
use crate::models::BiomarkerType;
use crate::reference_ranges::{range_for, Bounds, ReferenceRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a threshold override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideAuthor {
    /// The owning patient; editable from the patient side
    Patient,
    /// A care provider; read-only to the patient
    Provider,
}

/// A user- or provider-authored replacement for the default thresholds,
/// scoped to one biomarker type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    /// Stable override identifier
    pub id: Uuid,
    /// Biomarker this override applies to
    pub biomarker_type: BiomarkerType,
    /// Authoring tier
    pub set_by: OverrideAuthor,
    /// Warning lower bound
    pub warning_low: Option<f64>,
    /// Warning upper bound
    pub warning_high: Option<f64>,
    /// Critical lower bound
    pub critical_low: Option<f64>,
    /// Critical upper bound
    pub critical_high: Option<f64>,
}

/// The warning/critical bounds of an override, as edited by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideBounds {
    /// Warning lower bound
    pub warning_low: Option<f64>,
    /// Warning upper bound
    pub warning_high: Option<f64>,
    /// Critical lower bound
    pub critical_low: Option<f64>,
    /// Critical upper bound
    pub critical_high: Option<f64>,
}

impl ThresholdOverride {
    /// Create a patient-authored override with a fresh id
    #[must_use]
    pub fn patient(biomarker_type: BiomarkerType, bounds: OverrideBounds) -> Self {
        Self::new(biomarker_type, OverrideAuthor::Patient, bounds)
    }

    /// Create an override with a fresh id
    #[must_use]
    pub fn new(
        biomarker_type: BiomarkerType,
        set_by: OverrideAuthor,
        bounds: OverrideBounds,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            biomarker_type,
            set_by,
            warning_low: bounds.warning_low,
            warning_high: bounds.warning_high,
            critical_low: bounds.critical_low,
            critical_high: bounds.critical_high,
        }
    }
}

/// The overrides in play for one user+biomarker pair: at most one per tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideSet {
    /// Provider-authored override, if any
    pub provider: Option<ThresholdOverride>,
    /// Patient-authored override, if any
    pub patient: Option<ThresholdOverride>,
}

/// Which tier supplied the effective thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    /// Provider override won
    Provider,
    /// Patient override won
    Patient,
    /// Reference defaults won
    Default,
}

/// The threshold set that applies after resolving overrides by priority.
///
/// Exactly one tier populates an instance. Override tiers define
/// warning/critical bounds; the default tier defines optimal/normal/critical
/// bounds (and warning bounds only under [`WarningDerivation::FromNormal`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveThreshold {
    /// Critical lower bound
    pub critical_low: Option<f64>,
    /// Critical upper bound
    pub critical_high: Option<f64>,
    /// Warning lower bound
    pub warning_low: Option<f64>,
    /// Warning upper bound
    pub warning_high: Option<f64>,
    /// Optimal interval, present only on the default tier
    pub optimal: Option<Bounds>,
    /// Normal interval, present only on the default tier
    pub normal: Option<Bounds>,
}

impl EffectiveThreshold {
    /// Build the effective set from a single override tier
    #[must_use]
    pub const fn from_override(o: &ThresholdOverride) -> Self {
        Self {
            critical_low: o.critical_low,
            critical_high: o.critical_high,
            warning_low: o.warning_low,
            warning_high: o.warning_high,
            optimal: None,
            normal: None,
        }
    }

    /// Build the effective set from the reference defaults
    #[must_use]
    pub const fn from_defaults(range: &ReferenceRange, policy: WarningDerivation) -> Self {
        let (warning_low, warning_high) = match policy {
            WarningDerivation::Absent => (None, None),
            WarningDerivation::FromNormal => (Some(range.normal.lo), Some(range.normal.hi)),
        };
        Self {
            critical_low: range.critical_low,
            critical_high: range.critical_high,
            warning_low,
            warning_high,
            optimal: Some(range.optimal),
            normal: Some(range.normal),
        }
    }
}

/// An effective threshold set together with the tier that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedThreshold {
    /// The winning threshold set
    pub effective: EffectiveThreshold,
    /// Which tier won
    pub source: ThresholdSource,
}

/// Resolve the threshold set for one biomarker.
///
/// Priority is provider > patient > reference defaults; the winning tier is
/// taken verbatim.
#[must_use]
pub fn resolve(
    biomarker_type: BiomarkerType,
    overrides: &OverrideSet,
    config: &ThresholdResolverConfig,
) -> ResolvedThreshold {
    if let Some(provider) = &overrides.provider {
        return ResolvedThreshold {
            effective: EffectiveThreshold::from_override(provider),
            source: ThresholdSource::Provider,
        };
    }
    if let Some(patient) = &overrides.patient {
        return ResolvedThreshold {
            effective: EffectiveThreshold::from_override(patient),
            source: ThresholdSource::Patient,
        };
    }
    let range = range_for(biomarker_type);
    ResolvedThreshold {
        effective: EffectiveThreshold::from_defaults(&range, config.warning_derivation),
        source: ThresholdSource::Default,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn patient_override() -> ThresholdOverride {
        ThresholdOverride::patient(
            BiomarkerType::HeartRate,
            OverrideBounds {
                warning_low: Some(55.0),
                warning_high: Some(95.0),
                critical_low: Some(45.0),
                critical_high: Some(115.0),
            },
        )
    }

    #[test]
    fn test_provider_wins_verbatim_over_patient() {
        let provider = ThresholdOverride::new(
            BiomarkerType::HeartRate,
            OverrideAuthor::Provider,
            OverrideBounds {
                warning_low: None,
                warning_high: Some(90.0),
                critical_low: Some(50.0),
                critical_high: Some(110.0),
            },
        );
        let overrides = OverrideSet {
            provider: Some(provider.clone()),
            patient: Some(patient_override()),
        };

        let resolved = resolve(
            BiomarkerType::HeartRate,
            &overrides,
            &ThresholdResolverConfig::default(),
        );
        assert_eq!(resolved.source, ThresholdSource::Provider);
        assert_eq!(resolved.effective, EffectiveThreshold::from_override(&provider));
        // The patient's bounds never leak into the winning tier.
        assert_eq!(resolved.effective.warning_low, None);
    }

    #[test]
    fn test_patient_tier_when_no_provider() {
        let overrides = OverrideSet {
            provider: None,
            patient: Some(patient_override()),
        };
        let resolved = resolve(
            BiomarkerType::HeartRate,
            &overrides,
            &ThresholdResolverConfig::default(),
        );
        assert_eq!(resolved.source, ThresholdSource::Patient);
        assert_eq!(resolved.effective.critical_high, Some(115.0));
        assert_eq!(resolved.effective.optimal, None);
    }

    #[test]
    fn test_default_tier_warning_policy_absent() {
        let resolved = resolve(
            BiomarkerType::HeartRate,
            &OverrideSet::default(),
            &ThresholdResolverConfig::default(),
        );
        assert_eq!(resolved.source, ThresholdSource::Default);
        assert_eq!(resolved.effective.warning_low, None);
        assert_eq!(resolved.effective.warning_high, None);
        assert_eq!(resolved.effective.critical_high, Some(120.0));
        assert!(resolved.effective.optimal.is_some());
    }

    #[test]
    fn test_default_tier_warning_policy_from_normal() {
        let config = ThresholdResolverConfig {
            warning_derivation: WarningDerivation::FromNormal,
        };
        let resolved = resolve(BiomarkerType::HeartRate, &OverrideSet::default(), &config);
        assert_eq!(resolved.effective.warning_low, Some(60.0));
        assert_eq!(resolved.effective.warning_high, Some(100.0));
    }
}
