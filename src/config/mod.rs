// ABOUTME: Configuration module for the interpretation core
// ABOUTME: Per-concern config structs with env overrides, aggregated into CoreConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Configuration for the interpretation core.
//!
//! Each concern carries its own config struct with compiled-in defaults and
//! environment-variable overrides. [`CoreConfig::global`] exposes a
//! process-wide instance loaded once from the environment; components also
//! accept an explicit config for tests and embedding.

/// Chart preparation settings (headroom, padding, tick count)
pub mod chart;
/// Insight synthesis settings (snapshot window, caps)
pub mod insight;
/// Threshold resolution settings (warning-bound derivation policy)
pub mod resolver;

pub use chart::ChartConfig;
pub use insight::InsightEngineConfig;
pub use resolver::{ThresholdResolverConfig, WarningDerivation};

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Aggregate configuration for the whole core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Threshold resolution settings
    pub resolver: ThresholdResolverConfig,
    /// Insight synthesis settings
    pub insights: InsightEngineConfig,
    /// Chart preparation settings
    pub chart: ChartConfig,
}

static CORE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

impl CoreConfig {
    /// Load every section from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            resolver: ThresholdResolverConfig::from_env(),
            insights: InsightEngineConfig::from_env(),
            chart: ChartConfig::from_env(),
        }
    }

    /// Process-wide configuration, loaded from the environment on first use
    #[must_use]
    pub fn global() -> &'static Self {
        CORE_CONFIG.get_or_init(Self::from_env)
    }
}
