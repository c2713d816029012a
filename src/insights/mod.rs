// ABOUTME: Insight engine: merges backend recommendations with locally derived entries
// ABOUTME: Goal nudges, biomarker classifications, dedup, dismiss/feedback, epoch-guarded reloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Insight synthesis.
//!
//! The merged recommendation view combines two sources: entries the backend
//! already produced server-side, and entries derived locally from the user's
//! open goals and the latest biomarker snapshot. Derived entries carry
//! content-derived ids so they are stable across reloads and never collide
//! with backend ids.
//!
//! Merge order is goal section, biomarker section, everything else. Within
//! the biomarker section, entries are deduplicated by biomarker type with
//! derived entries winning, then ordered by severity (critical first).
//!
//! Reloads are epoch-guarded: [`InsightEngine::begin_refresh`] hands out a
//! token, and [`InsightEngine::commit`] discards any result whose token is no
//! longer the latest, so a slow fetch can never clobber a newer view.

/// Canned guidance text for derived entries
pub mod templates;

use crate::backend::HealthBackend;
use crate::classification::{classify, BiomarkerStatus};
use crate::config::{InsightEngineConfig, ThresholdResolverConfig};
use crate::errors::{AppError, AppResult};
use crate::ingest::{self, ExternalRecommendation};
use crate::models::{BiomarkerType, GoalCompletion, Profile, Reading};
use crate::thresholds::{self, OverrideSet};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Which section of the merged view an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    /// Tied to a user goal
    Goal,
    /// Tied to a biomarker reading
    Biomarker,
    /// Everything else the backend sends
    Other,
}

/// One entry of the merged recommendation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Backend id, or a content-derived `derived-` id for local entries
    pub id: String,
    /// Entry title
    pub title: String,
    /// Entry body
    pub description: String,
    /// Merge section
    pub category: RecommendationCategory,
    /// Whether this entry was synthesized locally
    pub is_derived: bool,
    /// Biomarker the entry concerns, when known
    pub biomarker_type: Option<BiomarkerType>,
    /// Classification that produced a derived biomarker entry
    pub status: Option<BiomarkerStatus>,
}

impl Recommendation {
    /// Severity rank for ordering; entries without a classification rank lowest
    #[must_use]
    pub fn severity(&self) -> u8 {
        self.status.map_or(0, BiomarkerStatus::severity_rank)
    }
}

/// Everything synthesis consumes, already normalized by [`crate::ingest`]
#[derive(Debug, Clone, Default)]
pub struct SynthesisInputs {
    /// Backend-produced recommendations, in feed order
    pub external: Vec<ExternalRecommendation>,
    /// Current profile (goals, restrictions)
    pub profile: Profile,
    /// Recorded goal completions
    pub completions: Vec<GoalCompletion>,
    /// Latest-readings snapshot
    pub snapshot: Vec<Reading>,
    /// Stored threshold overrides per biomarker
    pub overrides: BTreeMap<BiomarkerType, OverrideSet>,
}

/// The merged view handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightView {
    /// Merged, deduplicated, capped recommendation list
    pub recommendations: Vec<Recommendation>,
    /// Profile restriction strings, passed through verbatim
    pub restrictions: Vec<String>,
    /// Refresh epoch this view was built under
    pub epoch: u64,
}

/// Whether feedback left the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Feedback on a derived entry is acknowledged locally, no round-trip
    LoggedLocally,
    /// Feedback was forwarded to and confirmed by the backend
    Forwarded,
}

/// Content-derived id for a locally synthesized entry. Identical content
/// always yields the same id, and the `derived-` prefix keeps the namespace
/// disjoint from backend ids.
fn derived_id(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("derived-{}", &digest[..16])
}

/// Pick one reading per biomarker: the newest inside the recency window, or
/// the newest overall when nothing recent exists.
fn select_snapshot(
    readings: &[Reading],
    now: DateTime<Utc>,
    window: Duration,
) -> BTreeMap<BiomarkerType, Reading> {
    let cutoff = now - window;
    let mut chosen: BTreeMap<BiomarkerType, Reading> = BTreeMap::new();
    for reading in readings.iter().filter(|r| r.value.is_finite()) {
        match chosen.get(&reading.biomarker_type) {
            None => {
                chosen.insert(reading.biomarker_type, reading.clone());
            }
            Some(current) => {
                let current_recent = current.recorded_at >= cutoff;
                let candidate_recent = reading.recorded_at >= cutoff;
                let better = (candidate_recent && !current_recent)
                    || (candidate_recent == current_recent
                        && reading.recorded_at > current.recorded_at);
                if better {
                    chosen.insert(reading.biomarker_type, reading.clone());
                }
            }
        }
    }
    chosen
}

/// Partition heuristic for backend entries: an explicit biomarker hint (or a
/// "biomarker" kind hint) wins over a goal hint; everything else is `Other`.
fn categorize(rec: &ExternalRecommendation) -> (RecommendationCategory, Option<BiomarkerType>) {
    let hinted = rec.biomarker_hint.as_deref().and_then(BiomarkerType::parse);
    let kind_mentions = |needle: &str| {
        rec.kind_hints
            .iter()
            .any(|hint| hint.to_ascii_lowercase().contains(needle))
    };
    if rec.biomarker_hint.is_some() || kind_mentions("biomarker") {
        // An unrecognized biomarker name still marks the entry as biomarker
        // advice; it just never collides with a derived entry during dedup.
        return (RecommendationCategory::Biomarker, hinted);
    }
    if rec.goal_hint.is_some() || kind_mentions("goal") {
        return (RecommendationCategory::Goal, None);
    }
    (RecommendationCategory::Other, None)
}

fn external_to_recommendation(rec: &ExternalRecommendation) -> Recommendation {
    let (category, biomarker_type) = categorize(rec);
    Recommendation {
        id: rec.id.clone(),
        title: rec.title.clone(),
        description: rec.description.clone(),
        category,
        is_derived: false,
        biomarker_type,
        status: None,
    }
}

/// Build the merged view from normalized inputs. Pure and deterministic:
/// identical inputs at the same instant produce an identical view.
#[must_use]
pub fn synthesize(
    inputs: &SynthesisInputs,
    now: DateTime<Utc>,
    epoch: u64,
    config: &InsightEngineConfig,
    resolver: &ThresholdResolverConfig,
) -> InsightView {
    let today = now.date_naive();

    // Goal nudges for every goal with no affirmative completion recorded for
    // today. Earlier completions never suppress a nudge, whatever the cadence.
    let mut derived_goals = Vec::new();
    for goal in &inputs.profile.goals {
        let done = inputs
            .completions
            .iter()
            .any(|completion| completion.completes(goal, today));
        if done {
            continue;
        }
        let template = templates::goal_template(&goal.text, goal.cadence);
        derived_goals.push(Recommendation {
            id: derived_id(&[
                "goal",
                goal.text.trim().to_ascii_lowercase().as_str(),
                &format!("{:?}", goal.cadence),
            ]),
            title: template.title,
            description: template.description,
            category: RecommendationCategory::Goal,
            is_derived: true,
            biomarker_type: None,
            status: None,
        });
    }

    // One classified entry per biomarker present in the snapshot.
    let window = Duration::hours(config.snapshot_window_hours);
    let mut derived_biomarkers = Vec::new();
    for (biomarker_type, reading) in select_snapshot(&inputs.snapshot, now, window) {
        let default_set = OverrideSet::default();
        let overrides = inputs.overrides.get(&biomarker_type).unwrap_or(&default_set);
        let resolved = thresholds::resolve(biomarker_type, overrides, resolver);
        let status = classify(Some(reading.value), &resolved.effective);
        let template =
            templates::biomarker_template(biomarker_type, status, reading.value, &resolved.effective);
        derived_biomarkers.push(Recommendation {
            id: derived_id(&[
                "biomarker",
                biomarker_type.as_key(),
                status.label(),
                &format!("{}", reading.value),
            ]),
            title: template.title,
            description: template.description,
            category: RecommendationCategory::Biomarker,
            is_derived: true,
            biomarker_type: Some(biomarker_type),
            status: Some(status),
        });
    }

    let mut external_goals = Vec::new();
    let mut external_biomarkers = Vec::new();
    let mut others = Vec::new();
    for rec in &inputs.external {
        let entry = external_to_recommendation(rec);
        match entry.category {
            RecommendationCategory::Goal => external_goals.push(entry),
            RecommendationCategory::Biomarker => external_biomarkers.push(entry),
            RecommendationCategory::Other => others.push(entry),
        }
    }

    // Biomarker section: derived entries first so they win the per-type
    // dedup, then severity ordering with the type key as tiebreaker.
    let mut seen_types: HashSet<BiomarkerType> = HashSet::new();
    let mut biomarker_section: Vec<Recommendation> = derived_biomarkers
        .into_iter()
        .chain(external_biomarkers)
        .filter(|entry| match entry.biomarker_type {
            Some(biomarker_type) => seen_types.insert(biomarker_type),
            None => true,
        })
        .collect();
    biomarker_section.sort_by_key(|entry| {
        (
            Reverse(entry.severity()),
            entry.biomarker_type.map(BiomarkerType::as_key),
        )
    });

    let mut recommendations = derived_goals;
    recommendations.extend(external_goals);
    recommendations.extend(biomarker_section);
    recommendations.extend(others);
    if recommendations.len() > config.max_total_recommendations {
        debug!(
            total = recommendations.len(),
            cap = config.max_total_recommendations,
            "capping merged recommendation view"
        );
        recommendations.truncate(config.max_total_recommendations);
    }

    InsightView {
        recommendations,
        restrictions: inputs.profile.restrictions.clone(),
        epoch,
    }
}

/// Fetch and normalize everything synthesis needs.
///
/// The recommendations feed is the primary source: its failure propagates.
/// Every other sub-source degrades independently with a warning, so one
/// unavailable endpoint costs its section, not the whole view.
pub async fn gather_inputs<B: HealthBackend + ?Sized>(backend: &B) -> AppResult<SynthesisInputs> {
    let payload = backend.fetch_recommendations().await?;
    let external = ingest::parse_recommendations(&payload);

    let profile = match backend.fetch_profile().await {
        Ok(payload) => ingest::parse_profile(&payload),
        Err(err) => {
            warn!(error = %err, "profile fetch failed, continuing without goals");
            Profile::default()
        }
    };

    let completions = match backend.fetch_goal_completions().await {
        Ok(payload) => ingest::parse_completions(&payload),
        Err(err) => {
            warn!(error = %err, "goal completions fetch failed, treating all goals as open");
            Vec::new()
        }
    };

    let snapshot = match backend.fetch_biomarker_snapshot().await {
        Ok(payload) => ingest::parse_snapshot(&payload),
        Err(err) => {
            warn!(error = %err, "biomarker snapshot unavailable, skipping biomarker insights");
            Vec::new()
        }
    };

    let mut overrides = BTreeMap::new();
    for biomarker_type in BiomarkerType::ALL {
        match backend.fetch_threshold_overrides(biomarker_type).await {
            Ok(payload) => {
                overrides.insert(
                    biomarker_type,
                    ingest::parse_override_set(&payload, biomarker_type),
                );
            }
            Err(err) => {
                warn!(
                    biomarker = %biomarker_type,
                    error = %err,
                    "threshold overrides unavailable, using defaults"
                );
            }
        }
    }

    Ok(SynthesisInputs {
        external,
        profile,
        completions,
        snapshot,
        overrides,
    })
}

/// Stateful engine holding the current merged view
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightEngineConfig,
    resolver: ThresholdResolverConfig,
    epoch: u64,
    view: InsightView,
}

impl InsightEngine {
    /// Engine with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit settings
    #[must_use]
    pub fn with_config(config: InsightEngineConfig, resolver: ThresholdResolverConfig) -> Self {
        Self {
            config,
            resolver,
            epoch: 0,
            view: InsightView::default(),
        }
    }

    /// The current merged view
    #[must_use]
    pub const fn view(&self) -> &InsightView {
        &self.view
    }

    /// Entries of the current merged view
    #[must_use]
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.view.recommendations
    }

    /// Start a refresh and get its epoch token. Starting a newer refresh
    /// invalidates every earlier token.
    pub fn begin_refresh(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Commit a gathered result under `epoch`. Returns `false` (and leaves
    /// the view untouched) when a newer refresh has started since.
    pub fn commit(&mut self, inputs: &SynthesisInputs, now: DateTime<Utc>, epoch: u64) -> bool {
        if epoch != self.epoch {
            debug!(
                stale = epoch,
                current = self.epoch,
                "discarding stale refresh result"
            );
            return false;
        }
        self.view = synthesize(inputs, now, epoch, &self.config, &self.resolver);
        true
    }

    /// Fetch, synthesize, and commit in one step
    pub async fn refresh<B: HealthBackend + ?Sized>(
        &mut self,
        backend: &B,
        now: DateTime<Utc>,
    ) -> AppResult<&InsightView> {
        let epoch = self.begin_refresh();
        let inputs = gather_inputs(backend).await?;
        self.commit(&inputs, now, epoch);
        Ok(&self.view)
    }

    /// Dismiss an entry of the current view.
    ///
    /// Derived entries are removed locally. Backend entries are removed only
    /// after the backend confirms the dismissal.
    pub async fn dismiss<B: HealthBackend + ?Sized>(
        &mut self,
        backend: &B,
        id: &str,
    ) -> AppResult<()> {
        let Some(position) = self.view.recommendations.iter().position(|r| r.id == id) else {
            return Err(
                AppError::not_found("recommendation not present in the current view")
                    .with_resource_id(id),
            );
        };
        if !self.view.recommendations[position].is_derived {
            backend.dismiss_recommendation(id).await?;
        }
        self.view.recommendations.remove(position);
        Ok(())
    }

    /// Record feedback on an entry of the current view.
    ///
    /// Derived entries have no backend counterpart; feedback on them is
    /// acknowledged locally without a round-trip.
    pub async fn submit_feedback<B: HealthBackend + ?Sized>(
        &self,
        backend: &B,
        id: &str,
        feedback: &str,
    ) -> AppResult<FeedbackOutcome> {
        let Some(entry) = self.view.recommendations.iter().find(|r| r.id == id) else {
            return Err(
                AppError::not_found("recommendation not present in the current view")
                    .with_resource_id(id),
            );
        };
        if entry.is_derived {
            debug!(id = %id, "feedback on a derived entry acknowledged locally");
            return Ok(FeedbackOutcome::LoggedLocally);
        }
        backend.submit_feedback(id, feedback).await?;
        Ok(FeedbackOutcome::Forwarded)
    }
}
