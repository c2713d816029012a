// ABOUTME: Integration tests for biomarker classification over resolved thresholds
// ABOUTME: Rule precedence, boundary inclusivity, and unclassifiable inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use vitals_intelligence::classification::{classify, BiomarkerStatus};
use vitals_intelligence::config::ThresholdResolverConfig;
use vitals_intelligence::models::BiomarkerType;
use vitals_intelligence::reference_ranges::Bounds;
use vitals_intelligence::thresholds::{resolve, EffectiveThreshold, OverrideSet};

fn defaults_for(biomarker_type: BiomarkerType) -> EffectiveThreshold {
    resolve(
        biomarker_type,
        &OverrideSet::default(),
        &ThresholdResolverConfig::default(),
    )
    .effective
}

#[test]
fn test_critical_low_wins_regardless_of_other_bounds() {
    // Bounds deliberately overlapping: the value sits inside optimal and
    // normal too, but critical_low is checked first.
    let effective = EffectiveThreshold {
        critical_low: Some(50.0),
        critical_high: Some(120.0),
        warning_low: None,
        warning_high: None,
        optimal: Some(Bounds { lo: 40.0, hi: 80.0 }),
        normal: Some(Bounds { lo: 30.0, hi: 100.0 }),
    };
    assert_eq!(
        classify(Some(45.0), &effective),
        BiomarkerStatus::CriticalLow
    );
    assert_eq!(
        classify(Some(50.0), &effective),
        BiomarkerStatus::CriticalLow
    );
}

#[test]
fn test_optimal_wins_over_enclosing_normal() {
    let effective = defaults_for(BiomarkerType::HeartRate);
    // 65 is inside both optimal (60-80) and normal (60-100).
    assert_eq!(classify(Some(65.0), &effective), BiomarkerStatus::Optimal);
}

#[test]
fn test_heart_rate_examples_with_defaults() {
    let effective = defaults_for(BiomarkerType::HeartRate);
    assert_eq!(
        classify(Some(125.0), &effective),
        BiomarkerStatus::CriticalHigh
    );
    assert_eq!(classify(Some(65.0), &effective), BiomarkerStatus::Optimal);
    assert_eq!(classify(Some(85.0), &effective), BiomarkerStatus::Normal);
}

#[test]
fn test_boundaries_are_inclusive() {
    let effective = defaults_for(BiomarkerType::HeartRate);
    // Exactly on the optimal upper bound.
    assert_eq!(classify(Some(80.0), &effective), BiomarkerStatus::Optimal);
    // Exactly on the normal upper bound.
    assert_eq!(classify(Some(100.0), &effective), BiomarkerStatus::Normal);
    // Exactly on the critical bounds.
    assert_eq!(
        classify(Some(120.0), &effective),
        BiomarkerStatus::CriticalHigh
    );
    assert_eq!(
        classify(Some(40.0), &effective),
        BiomarkerStatus::CriticalLow
    );
}

#[test]
fn test_above_and_below_optimal_outside_normal() {
    let effective = defaults_for(BiomarkerType::HeartRate);
    // Above normal but under critical.
    assert_eq!(classify(Some(110.0), &effective), BiomarkerStatus::High);
    // Below optimal but above critical.
    assert_eq!(classify(Some(50.0), &effective), BiomarkerStatus::Low);
}

#[test]
fn test_unclassifiable_inputs_are_unknown() {
    let effective = defaults_for(BiomarkerType::Glucose);
    assert_eq!(classify(None, &effective), BiomarkerStatus::Unknown);
    assert_eq!(
        classify(Some(f64::NAN), &effective),
        BiomarkerStatus::Unknown
    );
    assert_eq!(
        classify(Some(f64::INFINITY), &effective),
        BiomarkerStatus::Unknown
    );
    assert_eq!(
        classify(Some(100.0), &EffectiveThreshold::default()),
        BiomarkerStatus::Unknown
    );
}

#[test]
fn test_cumulative_types_have_no_critical_statuses_by_default() {
    let effective = defaults_for(BiomarkerType::Steps);
    assert_eq!(classify(Some(100_000.0), &effective), BiomarkerStatus::High);
    assert_eq!(classify(Some(0.0), &effective), BiomarkerStatus::Low);
}

#[test]
fn test_severity_ordering_for_presentation() {
    let mut statuses = vec![
        BiomarkerStatus::Normal,
        BiomarkerStatus::CriticalHigh,
        BiomarkerStatus::Unknown,
        BiomarkerStatus::Optimal,
        BiomarkerStatus::High,
    ];
    statuses.sort_by_key(|s| std::cmp::Reverse(s.severity_rank()));
    assert_eq!(statuses[0], BiomarkerStatus::CriticalHigh);
    assert_eq!(statuses[1], BiomarkerStatus::High);
    assert_eq!(*statuses.last().unwrap(), BiomarkerStatus::Unknown);
}
