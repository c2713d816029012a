// ABOUTME: Async port to the remote health backend, plus the threshold service built on it
// ABOUTME: Reads return raw JSON for the ingest adapters; mutations are backend-confirmed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vitals Health

//! Backend port.
//!
//! [`HealthBackend`] is the single seam between the pure interpretation core
//! and whatever transport an embedding application uses. Read methods answer
//! with raw [`serde_json::Value`] payloads so the shape tolerance lives
//! entirely in [`crate::ingest`]; mutation methods resolve only once the
//! backend has confirmed the change.

use crate::config::ThresholdResolverConfig;
use crate::errors::{AppError, AppResult};
use crate::ingest;
use crate::models::BiomarkerType;
use crate::thresholds::{self, OverrideAuthor, OverrideBounds, ResolvedThreshold, ThresholdOverride};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Transport-agnostic access to the remote health backend
#[async_trait]
pub trait HealthBackend: Send + Sync {
    /// Active recommendations feed
    async fn fetch_recommendations(&self) -> AppResult<Value>;

    /// Current user profile (goals, restrictions)
    async fn fetch_profile(&self) -> AppResult<Value>;

    /// Recorded goal completions
    async fn fetch_goal_completions(&self) -> AppResult<Value>;

    /// Latest-readings dashboard snapshot
    async fn fetch_biomarker_snapshot(&self) -> AppResult<Value>;

    /// Reading history for one biomarker, newest first
    async fn fetch_biomarker_history(
        &self,
        biomarker_type: BiomarkerType,
        limit: usize,
    ) -> AppResult<Value>;

    /// Stored threshold overrides for one biomarker
    async fn fetch_threshold_overrides(&self, biomarker_type: BiomarkerType) -> AppResult<Value>;

    /// Create or replace the patient-tier override for one biomarker
    async fn set_patient_threshold(
        &self,
        biomarker_type: BiomarkerType,
        bounds: OverrideBounds,
    ) -> AppResult<()>;

    /// Delete a patient-tier override by id
    async fn delete_patient_threshold(&self, id: Uuid) -> AppResult<()>;

    /// Dismiss a backend-owned recommendation
    async fn dismiss_recommendation(&self, id: &str) -> AppResult<()>;

    /// Record user feedback on a backend-owned recommendation
    async fn submit_feedback(&self, id: &str, feedback: &str) -> AppResult<()>;

    /// Mark a provider note as read
    async fn mark_note_read(&self, note_id: &str) -> AppResult<()>;
}

/// Threshold reads and writes composed over the backend port.
///
/// Resolution itself is pure ([`thresholds::resolve`]); this service adds the
/// fetch/parse step and the patient-side authorization guard.
#[derive(Debug, Clone)]
pub struct ThresholdService {
    config: ThresholdResolverConfig,
}

impl ThresholdService {
    /// Create a service with the given resolver policy
    #[must_use]
    pub const fn new(config: ThresholdResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve the effective thresholds for one biomarker.
    ///
    /// An unreadable overrides payload degrades to the built-in defaults with
    /// a warning; only transport errors propagate.
    pub async fn resolve_for<B: HealthBackend + ?Sized>(
        &self,
        backend: &B,
        biomarker_type: BiomarkerType,
    ) -> AppResult<ResolvedThreshold> {
        let payload = backend.fetch_threshold_overrides(biomarker_type).await?;
        let overrides = ingest::parse_override_set(&payload, biomarker_type);
        Ok(thresholds::resolve(biomarker_type, &overrides, &self.config))
    }

    /// Set (create or replace) the patient-tier override for one biomarker
    pub async fn set_patient_override<B: HealthBackend + ?Sized>(
        &self,
        backend: &B,
        biomarker_type: BiomarkerType,
        bounds: OverrideBounds,
    ) -> AppResult<()> {
        backend.set_patient_threshold(biomarker_type, bounds).await
    }

    /// Delete a patient-tier override.
    ///
    /// Provider-authored overrides are read-only from the patient side; the
    /// call is rejected locally before any backend round-trip.
    pub async fn delete_patient_override<B: HealthBackend + ?Sized>(
        &self,
        backend: &B,
        existing: &ThresholdOverride,
    ) -> AppResult<()> {
        if existing.set_by == OverrideAuthor::Provider {
            warn!(
                biomarker = %existing.biomarker_type,
                "rejected attempt to delete a provider-authored threshold override"
            );
            return Err(AppError::permission_denied(
                "provider-authored threshold overrides cannot be deleted by the patient",
            )
            .with_resource_id(existing.id.to_string()));
        }
        backend.delete_patient_threshold(existing.id).await
    }
}

impl Default for ThresholdService {
    fn default() -> Self {
        Self::new(ThresholdResolverConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::thresholds::OverrideAuthor;
    use serde_json::json;

    struct StaticBackend {
        overrides: Value,
    }

    #[async_trait]
    impl HealthBackend for StaticBackend {
        async fn fetch_recommendations(&self) -> AppResult<Value> {
            Ok(json!([]))
        }
        async fn fetch_profile(&self) -> AppResult<Value> {
            Ok(json!({}))
        }
        async fn fetch_goal_completions(&self) -> AppResult<Value> {
            Ok(json!([]))
        }
        async fn fetch_biomarker_snapshot(&self) -> AppResult<Value> {
            Ok(json!({}))
        }
        async fn fetch_biomarker_history(
            &self,
            _biomarker_type: BiomarkerType,
            _limit: usize,
        ) -> AppResult<Value> {
            Ok(json!([]))
        }
        async fn fetch_threshold_overrides(
            &self,
            _biomarker_type: BiomarkerType,
        ) -> AppResult<Value> {
            Ok(self.overrides.clone())
        }
        async fn set_patient_threshold(
            &self,
            _biomarker_type: BiomarkerType,
            _bounds: OverrideBounds,
        ) -> AppResult<()> {
            Ok(())
        }
        async fn delete_patient_threshold(&self, _id: Uuid) -> AppResult<()> {
            Ok(())
        }
        async fn dismiss_recommendation(&self, _id: &str) -> AppResult<()> {
            Ok(())
        }
        async fn submit_feedback(&self, _id: &str, _feedback: &str) -> AppResult<()> {
            Ok(())
        }
        async fn mark_note_read(&self, _note_id: &str) -> AppResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_resolve_for_uses_fetched_overrides() {
        let backend = StaticBackend {
            overrides: json!({"patient": {"warning_high": 95.0}}),
        };
        let service = ThresholdService::default();
        let resolved = service
            .resolve_for(&backend, BiomarkerType::HeartRate)
            .await
            .unwrap();
        assert_eq!(resolved.effective.warning_high, Some(95.0));
    }

    #[tokio::test]
    async fn test_provider_override_delete_is_rejected_locally() {
        let backend = StaticBackend {
            overrides: json!({}),
        };
        let service = ThresholdService::default();
        let provider = ThresholdOverride::new(
            BiomarkerType::Glucose,
            OverrideAuthor::Provider,
            OverrideBounds::default(),
        );
        let err = service
            .delete_patient_override(&backend, &provider)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
