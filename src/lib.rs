// ABOUTME: Library entry point for the Vitals health-metric interpretation core
// ABOUTME: Threshold resolution, biomarker classification, insight synthesis, chart preparation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

#![deny(unsafe_code)]

//! # Vitals Intelligence
//!
//! Client-side interpretation layer for health metrics. Given raw backend
//! payloads, it resolves layered biomarker thresholds, classifies readings,
//! synthesizes a merged recommendation view, and prepares time-series data
//! for charting. Everything numeric is pure and deterministic; the only
//! asynchronous seam is the [`backend::HealthBackend`] port.
//!
//! ## Architecture
//!
//! - **Ingest**: shape-tolerant adapters normalizing backend payloads
//! - **Thresholds**: provider > patient > default resolution, whole tiers
//! - **Classification**: explicit ordered rule table over effective bounds
//! - **Insights**: derived + backend recommendations, deduplicated and capped
//! - **Timeseries**: bar/line chart series with domains and ticks
//!
//! ## Example Usage
//!
//! ```rust
//! use vitals_intelligence::classification::{classify, BiomarkerStatus};
//! use vitals_intelligence::config::ThresholdResolverConfig;
//! use vitals_intelligence::models::BiomarkerType;
//! use vitals_intelligence::thresholds::{resolve, OverrideSet};
//!
//! let resolved = resolve(
//!     BiomarkerType::HeartRate,
//!     &OverrideSet::default(),
//!     &ThresholdResolverConfig::default(),
//! );
//! assert_eq!(
//!     classify(Some(72.0), &resolved.effective),
//!     BiomarkerStatus::Optimal
//! );
//! ```

/// Async port to the remote health backend and the threshold service
pub mod backend;

/// Biomarker status classification over effective thresholds
pub mod classification;

/// Per-concern configuration with environment overrides
pub mod config;

/// Error codes and the crate-wide error type
pub mod errors;

/// Shape-tolerant adapters for backend payloads
pub mod ingest;

/// Insight synthesis: merged recommendation view and its lifecycle
pub mod insights;

/// Canonical domain types: biomarkers, readings, goals, profile
pub mod models;

/// Built-in reference ranges per biomarker
pub mod reference_ranges;

/// Layered threshold overrides and resolution
pub mod thresholds;

/// Chart series preparation for biomarker history
pub mod timeseries;

pub use backend::{HealthBackend, ThresholdService};
pub use classification::{classify, BiomarkerStatus};
pub use errors::{AppError, AppResult, ErrorCode};
pub use insights::{InsightEngine, InsightView, Recommendation, RecommendationCategory};
pub use models::{BiomarkerType, Reading};
pub use thresholds::{resolve, ResolvedThreshold, ThresholdSource};
pub use timeseries::{prepare, ChartMode, PreparedSeries};
