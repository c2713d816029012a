// ABOUTME: Insight engine configuration for derived recommendation synthesis
// ABOUTME: Snapshot recency window and output caps with environment overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Insight engine configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Hours a reading stays "current" for snapshot selection
pub const DEFAULT_SNAPSHOT_WINDOW_HOURS: i64 = 24;

/// Default cap on total merged recommendations
pub const DEFAULT_MAX_TOTAL_RECOMMENDATIONS: usize = 20;

/// Insight engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InsightEngineConfig {
    /// Readings newer than this many hours are preferred for the biomarker
    /// snapshot; outside the window the globally most recent reading is used
    pub snapshot_window_hours: i64,
    /// Maximum total entries in the merged recommendation view
    pub max_total_recommendations: usize,
}

impl Default for InsightEngineConfig {
    fn default() -> Self {
        Self {
            snapshot_window_hours: DEFAULT_SNAPSHOT_WINDOW_HOURS,
            max_total_recommendations: DEFAULT_MAX_TOTAL_RECOMMENDATIONS,
        }
    }
}

impl InsightEngineConfig {
    /// Load insight engine configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            snapshot_window_hours: env::var("VITALS_SNAPSHOT_WINDOW_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SNAPSHOT_WINDOW_HOURS),
            max_total_recommendations: env::var("VITALS_MAX_TOTAL_RECOMMENDATIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOTAL_RECOMMENDATIONS),
        }
    }
}
