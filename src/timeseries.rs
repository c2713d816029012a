// ABOUTME: Time-series preparation for chart rendering: bucketing, filtering, domains, ticks
// ABOUTME: Daily sums for cumulative metrics, raw points for continuous ones, explicit no-data result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Chart preparation.
//!
//! Pure transformations from raw readings to a chartable series. Cumulative
//! metrics (steps, sleep) aggregate into one bar per UTC calendar day;
//! continuous metrics keep their individual points. Date-range filtering
//! compares calendar days, inclusive of both boundary days. Empty input after
//! filtering yields [`PreparedSeries::NoData`], never an error.

use crate::config::ChartConfig;
use crate::models::{BiomarkerType, Reading};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a series is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// Daily-sum bars (cumulative metrics)
    Bar,
    /// Individual points (continuous metrics)
    Line,
}

impl ChartMode {
    /// Default rendering mode for a biomarker type
    #[must_use]
    pub const fn for_type(biomarker_type: BiomarkerType) -> Self {
        if biomarker_type.is_cumulative() {
            Self::Bar
        } else {
            Self::Line
        }
    }
}

/// Inclusive calendar-day range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First included day
    pub from: NaiveDate,
    /// Last included day
    pub to: NaiveDate,
}

impl DateRange {
    /// Create a range; reversed endpoints are swapped
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// Whether `day` falls inside the range, boundaries included
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }
}

/// One chartable point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Point timestamp (day midnight for bars)
    pub timestamp: DateTime<Utc>,
    /// Point value (daily sum for bars)
    pub value: f64,
}

/// A prepared, renderable series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Points in ascending time order
    pub points: Vec<ChartPoint>,
    /// X domain: [min, max] timestamp of the filtered set
    pub x_domain: (DateTime<Utc>, DateTime<Utc>),
    /// Y domain after headroom/padding policy
    pub y_domain: (f64, f64),
    /// Evenly spaced X tick values
    pub x_ticks: Vec<DateTime<Utc>>,
    /// Evenly spaced Y tick values
    pub y_ticks: Vec<f64>,
}

/// Outcome of chart preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PreparedSeries {
    /// Nothing survived filtering; render an empty state
    NoData,
    /// A renderable series
    Chart(ChartSeries),
}

impl PreparedSeries {
    /// Whether the preparation produced renderable points
    #[must_use]
    pub const fn has_data(&self) -> bool {
        matches!(self, Self::Chart(_))
    }
}

/// Prepare readings for rendering.
///
/// Non-finite values are dropped before any other step; the range filter
/// compares UTC calendar days inclusively.
#[must_use]
pub fn prepare(
    readings: &[Reading],
    mode: ChartMode,
    range: Option<DateRange>,
    config: &ChartConfig,
) -> PreparedSeries {
    let filtered: Vec<&Reading> = readings
        .iter()
        .filter(|r| r.value.is_finite())
        .filter(|r| range.map_or(true, |range| range.contains(r.calendar_day())))
        .collect();

    if filtered.is_empty() {
        return PreparedSeries::NoData;
    }

    let points = match mode {
        ChartMode::Bar => daily_sums(&filtered),
        ChartMode::Line => {
            let mut points: Vec<ChartPoint> = filtered
                .iter()
                .map(|r| ChartPoint {
                    timestamp: r.recorded_at,
                    value: r.value,
                })
                .collect();
            points.sort_by_key(|p| p.timestamp);
            points
        }
    };

    let x_domain = x_domain_of(&points);
    let y_domain = y_domain_of(&points, mode, config);

    let x_ticks = x_ticks_of(x_domain, points.len(), config.tick_count);
    let y_ticks = y_ticks_of(y_domain, &points, config.tick_count);

    PreparedSeries::Chart(ChartSeries {
        points,
        x_domain,
        y_domain,
        x_ticks,
        y_ticks,
    })
}

/// Sum readings per UTC calendar day, one bar per day at midnight, ascending
fn daily_sums(readings: &[&Reading]) -> Vec<ChartPoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for reading in readings {
        *by_day.entry(reading.calendar_day()).or_insert(0.0) += reading.value;
    }

    by_day
        .into_iter()
        .filter_map(|(day, total)| {
            let midnight = day.and_hms_opt(0, 0, 0)?;
            Some(ChartPoint {
                timestamp: midnight.and_utc(),
                value: total,
            })
        })
        .collect()
}

fn x_domain_of(points: &[ChartPoint]) -> (DateTime<Utc>, DateTime<Utc>) {
    // Points are sorted ascending; endpoints are the domain.
    let first = points.first().map_or_else(Utc::now, |p| p.timestamp);
    let last = points.last().map_or(first, |p| p.timestamp);
    (first, last)
}

fn y_domain_of(points: &[ChartPoint], mode: ChartMode, config: &ChartConfig) -> (f64, f64) {
    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.value)
        .fold(f64::NEG_INFINITY, f64::max);

    match mode {
        // Bars are anchored at zero with headroom above the tallest bar.
        ChartMode::Bar => (0.0, max * (1.0 + config.bar_headroom)),
        ChartMode::Line => {
            if (max - min).abs() < f64::EPSILON {
                // Degenerate flat series: expand by one unit each way to
                // avoid a zero-height domain.
                (min - 1.0, max + 1.0)
            } else {
                let pad = (max - min) * config.line_padding;
                (min - pad, max + pad)
            }
        }
    }
}

fn x_ticks_of(
    domain: (DateTime<Utc>, DateTime<Utc>),
    point_count: usize,
    tick_count: usize,
) -> Vec<DateTime<Utc>> {
    if point_count < 2 || tick_count < 2 {
        return vec![domain.0];
    }
    let (start, end) = domain;
    let span_ms = (end - start).num_milliseconds();
    (0..tick_count)
        .map(|i| {
            let offset_ms = span_ms * (i as i64) / (tick_count as i64 - 1);
            start + chrono::Duration::milliseconds(offset_ms)
        })
        .collect()
}

fn y_ticks_of(domain: (f64, f64), points: &[ChartPoint], tick_count: usize) -> Vec<f64> {
    if points.len() < 2 || tick_count < 2 {
        // A lone point gets its own value as the single tick.
        return points.first().map_or_else(Vec::new, |p| vec![p.value]);
    }
    let (min, max) = domain;
    (0..tick_count)
        .map(|i| min + (max - min) * (i as f64) / (tick_count as f64 - 1.0))
        .collect()
}
