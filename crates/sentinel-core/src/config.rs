//! Runtime-mutable scoring configuration, held behind an atomically
//! swappable snapshot so in-flight scorings complete against whichever
//! snapshot they read first while admin edits never block a reader.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Name-length and token-set tuning, mutable via `PUT /api/admin/config/similarity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityConfig {
    pub jaro_winkler_prefix_size: usize,
    pub length_difference_penalty_weight: f64,
    pub length_difference_cutoff_factor: f64,
    pub unmatched_index_token_weight: f64,
    pub phonetic_filtering_disabled: bool,
    pub keep_stopwords: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            jaro_winkler_prefix_size: defaults::JARO_WINKLER_PREFIX_SIZE,
            length_difference_penalty_weight: defaults::LENGTH_DIFFERENCE_PENALTY_WEIGHT,
            length_difference_cutoff_factor: defaults::LENGTH_DIFFERENCE_CUTOFF_FACTOR,
            unmatched_index_token_weight: defaults::UNMATCHED_INDEX_TOKEN_WEIGHT,
            phonetic_filtering_disabled: false,
            keep_stopwords: false,
        }
    }
}

impl SimilarityConfig {
    /// Validates the admin-editable ranges from spec §6: prefix size in
    /// [1,10], weights/factors in [0,1] where the spec treats them as ratios.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.jaro_winkler_prefix_size) {
            return Err(Error::InvalidInput(
                "Invalid configuration: jaroWinklerPrefixSize must be in [1,10]".to_string(),
            ));
        }
        for (name, value) in [
            ("lengthDifferencePenaltyWeight", self.length_difference_penalty_weight),
            ("lengthDifferenceCutoffFactor", self.length_difference_cutoff_factor),
            ("unmatchedIndexTokenWeight", self.unmatched_index_token_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "Invalid configuration: {name} must be in [0,1]"
                )));
            }
        }
        Ok(())
    }
}

/// Per-factor weights and thresholds, mutable via `PUT /api/admin/config/weights`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeightsConfig {
    pub name_weight: f64,
    pub address_weight: f64,
    pub critical_id_weight: f64,
    pub supporting_info_weight: f64,
    pub min_match: f64,
    pub exact_match_threshold: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            name_weight: defaults::NAME_WEIGHT,
            address_weight: defaults::ADDRESS_WEIGHT,
            critical_id_weight: defaults::CRITICAL_ID_WEIGHT,
            supporting_info_weight: defaults::SUPPORTING_INFO_WEIGHT,
            min_match: defaults::MIN_MATCH,
            exact_match_threshold: defaults::EXACT_MATCH_THRESHOLD,
        }
    }
}

impl WeightsConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("nameWeight", self.name_weight),
            ("addressWeight", self.address_weight),
            ("criticalIdWeight", self.critical_id_weight),
            ("supportingInfoWeight", self.supporting_info_weight),
        ] {
            if value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "Invalid configuration: {name} must be >= 0"
                )));
            }
        }
        for (name, value) in [
            ("minMatch", self.min_match),
            ("exactMatchThreshold", self.exact_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "Invalid configuration: {name} must be in [0,1]"
                )));
            }
        }
        Ok(())
    }
}

/// The full tunable bundle exposed by `GET /api/admin/config`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoringConfig {
    pub similarity: SimilarityConfig,
    pub weights: WeightsConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            weights: WeightsConfig::default(),
        }
    }
}

/// Atomically-swappable holder for `ScoringConfig`. `load()` is a cheap,
/// non-blocking `Arc` clone of the current snapshot; `store()` publishes a
/// new snapshot that subsequent `load()` calls observe immediately, without
/// affecting scorings already in flight with an older snapshot in hand.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<ArcSwap<ScoringConfig>>,
}

impl ConfigStore {
    pub fn new(initial: ScoringConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    pub fn load(&self) -> Arc<ScoringConfig> {
        self.inner.load_full()
    }

    pub fn store(&self, config: ScoringConfig) {
        self.inner.store(Arc::new(config));
    }

    pub fn reset(&self) {
        self.store(ScoringConfig::default());
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Overlays environment variables over compiled-in defaults, following the
/// worker-config `from_env` idiom: parse-or-fall-back per variable.
pub fn bulk_job_chunk_concurrency_from_env() -> usize {
    std::env::var("SENTINEL_CHUNK_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .map(|v| {
            v.clamp(
                defaults::BULK_JOB_CHUNK_CONCURRENCY_MIN,
                defaults::BULK_JOB_CHUNK_CONCURRENCY_MAX,
            )
        })
        .unwrap_or(defaults::BULK_JOB_CHUNK_CONCURRENCY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scoring_config_validates() {
        let config = ScoringConfig::default();
        config.similarity.validate().unwrap();
        config.weights.validate().unwrap();
    }

    #[test]
    fn similarity_validate_rejects_out_of_range_prefix_size() {
        let mut c = SimilarityConfig::default();
        c.jaro_winkler_prefix_size = 11;
        assert!(c.validate().is_err());
    }

    #[test]
    fn similarity_validate_rejects_negative_weight() {
        let mut c = SimilarityConfig::default();
        c.unmatched_index_token_weight = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn weights_validate_rejects_negative_weight() {
        let mut w = WeightsConfig::default();
        w.name_weight = -1.0;
        assert!(w.validate().is_err());
    }

    #[test]
    fn weights_validate_rejects_out_of_range_threshold() {
        let mut w = WeightsConfig::default();
        w.min_match = 1.5;
        assert!(w.validate().is_err());
    }

    #[test]
    fn config_store_load_reflects_latest_store() {
        let store = ConfigStore::default();
        let mut updated = *store.load();
        updated.weights.min_match = 0.5;
        store.store(updated);
        assert_eq!(store.load().weights.min_match, 0.5);
    }

    #[test]
    fn config_store_reset_restores_defaults() {
        let store = ConfigStore::default();
        let mut updated = *store.load();
        updated.weights.min_match = 0.1;
        store.store(updated);
        store.reset();
        assert_eq!(store.load().weights.min_match, defaults::MIN_MATCH);
    }

    #[test]
    fn config_store_in_flight_reader_sees_consistent_snapshot_after_concurrent_store() {
        let store = ConfigStore::default();
        let snapshot = store.load();
        let mut updated = *store.load();
        updated.weights.min_match = 0.2;
        store.store(updated);
        assert_eq!(snapshot.weights.min_match, defaults::MIN_MATCH);
    }
}
