// ABOUTME: Threshold resolver configuration types
// ABOUTME: Controls how warning bounds are derived when resolution falls back to reference defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Threshold resolver configuration.
//!
//! The reference range table defines optimal/normal/critical bounds while
//! user overrides define warning/critical bounds. The two models meet at the
//! default tier, where warning bounds have no authoritative source; the
//! [`WarningDerivation`] policy makes the choice explicit and testable.

use serde::{Deserialize, Serialize};
use std::env;

/// How warning bounds are filled in when resolution falls back to the
/// reference defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningDerivation {
    /// Leave warning bounds absent; only overrides can define them
    #[default]
    Absent,
    /// Copy the reference normal bounds into the warning bounds
    FromNormal,
}

/// Threshold resolver configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ThresholdResolverConfig {
    /// Warning-bound policy for the default tier
    pub warning_derivation: WarningDerivation,
}

impl ThresholdResolverConfig {
    /// Load resolver configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let warning_derivation = env::var("VITALS_WARNING_DERIVATION")
            .ok()
            .map(|s| match s.trim().to_ascii_lowercase().as_str() {
                "from_normal" | "normal" => WarningDerivation::FromNormal,
                _ => WarningDerivation::Absent,
            })
            .unwrap_or_default();
        Self { warning_derivation }
    }
}
