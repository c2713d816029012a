// ABOUTME: Chart preparation configuration types
// ABOUTME: Y-domain headroom/padding percentages and axis tick count settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Chart preparation configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Headroom above the max value on bar-chart Y domains
pub const DEFAULT_BAR_HEADROOM: f64 = 0.10;

/// Padding applied to both ends of line-chart Y domains
pub const DEFAULT_LINE_PADDING: f64 = 0.05;

/// Evenly spaced tick values per axis when at least two points exist
pub const DEFAULT_TICK_COUNT: usize = 3;

/// Chart preparation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Fractional headroom above the max on bar-chart Y domains
    pub bar_headroom: f64,
    /// Fractional padding at both ends of line-chart Y domains
    pub line_padding: f64,
    /// Tick values per axis for multi-point series
    pub tick_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_headroom: DEFAULT_BAR_HEADROOM,
            line_padding: DEFAULT_LINE_PADDING,
            tick_count: DEFAULT_TICK_COUNT,
        }
    }
}

impl ChartConfig {
    /// Load chart configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bar_headroom: env::var("VITALS_CHART_BAR_HEADROOM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_BAR_HEADROOM),
            line_padding: env::var("VITALS_CHART_LINE_PADDING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LINE_PADDING),
            tick_count: env::var("VITALS_CHART_TICK_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TICK_COUNT),
        }
    }
}
