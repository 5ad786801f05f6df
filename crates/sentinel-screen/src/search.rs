//! Search orchestration: candidate selection, phonetic pre-filtering,
//! scoring, threshold filtering, and deterministic ranking.

use std::collections::BTreeMap;

use sentinel_core::{Entity, EntitySource, EntityType, QueryEntityType, ScoreBreakdown, ScoringConfig, ScoringTrace};
use serde::{Deserialize, Serialize};

use crate::index::Index;
use crate::normalizer;
use crate::scorer;
use crate::trace::TraceContext;

/// One ranked result from a search.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchHit {
    pub entity_id: uuid::Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub source: Option<EntitySource>,
    pub source_id: Option<String>,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Full result of a `search` call: ranked hits, the total before
/// truncation to `limit`, and an optional trace.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchOutcome {
    pub entities: Vec<SearchHit>,
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ScoringTrace>,
}

/// Runs a single-name search against the index per the candidate-pool →
/// phonetic-filter → score → threshold → rank → truncate pipeline.
#[allow(clippy::too_many_arguments)]
pub fn search(
    index: &Index,
    name: &str,
    source: Option<EntitySource>,
    query_type: Option<QueryEntityType>,
    limit: usize,
    min_match: f64,
    trace_enabled: bool,
    config: &ScoringConfig,
) -> SearchOutcome {
    let mut trace_ctx = if trace_enabled { TraceContext::enabled() } else { TraceContext::DISABLED };

    if name.trim().is_empty() {
        return SearchOutcome { entities: Vec::new(), total_results: 0, trace: trace_ctx.into_trace() };
    }

    let mut query = Entity::from_query_name(name);
    query.source = source;
    if let Some(qt) = query_type {
        query.entity_type = EntityType::from(qt);
    }
    query.prepared_fields = Some(normalizer::prepare_fields(&query, config.similarity.keep_stopwords));

    let entity_type_filter = query_type.map(EntityType::from);
    let candidates = index.candidates(source, entity_type_filter);
    let query_first_token = normalizer::tokenize(name).into_iter().next();

    let mut phonetic_filtered = 0usize;
    let mut scored: Vec<(f64, ScoreBreakdown, String, Option<String>, std::sync::Arc<Entity>)> =
        Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        if !config.similarity.phonetic_filtering_disabled {
            let candidate_first_token = normalizer::tokenize(&candidate.name).into_iter().next();
            let compatible = match (&query_first_token, &candidate_first_token) {
                (Some(q), Some(c)) => normalizer::phonetically_compatible(q, c),
                _ => true,
            };
            if !compatible {
                phonetic_filtered += 1;
                continue;
            }
        }

        let mut timings = BTreeMap::new();
        let (breakdown, pieces) = crate::trace::timed_phase(&trace_ctx, &mut timings, "score", || {
            scorer::score(&query, candidate, config)
        });

        if trace_ctx.is_enabled() {
            trace_ctx.record_candidate(candidate.id, pieces, timings);
        }

        if breakdown.total_weighted_score >= min_match {
            scored.push((
                breakdown.total_weighted_score,
                breakdown,
                candidate.name.clone(),
                candidate.source_id.clone(),
                candidate.clone(),
            ));
        }
    }

    trace_ctx.set_pool_metadata(candidates.len(), phonetic_filtered);

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap()
            .then_with(|| a.3.cmp(&b.3))
    });

    let total_results = scored.len();
    tracing::debug!(
        subsystem = "screen",
        component = "search",
        op = "search",
        query = name,
        candidate_pool_size = candidates.len(),
        phonetic_filtered,
        result_count = total_results,
        "search completed",
    );

    let entities = scored
        .into_iter()
        .take(limit)
        .map(|(score, breakdown, name, source_id, candidate)| SearchHit {
            entity_id: candidate.id,
            name,
            entity_type: candidate.entity_type,
            source: candidate.source,
            source_id,
            score,
            breakdown,
        })
        .collect();

    SearchOutcome { entities, total_results, trace: trace_ctx.into_trace() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Entity;

    fn seeded_index() -> Index {
        let index = Index::new();
        let mut maduro = Entity::from_query_name("Nicolas Maduro");
        maduro.source = Some(EntitySource::OfacSdn);
        maduro.entity_type = EntityType::Person;
        maduro.id = uuid::Uuid::new_v4();
        let mut jones = Entity::from_query_name("Bob Jones");
        jones.source = Some(EntitySource::OfacSdn);
        jones.entity_type = EntityType::Person;
        jones.id = uuid::Uuid::new_v4();
        index.replace_all(vec![maduro, jones], false);
        index
    }

    #[test]
    fn exact_name_match_scores_one() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let outcome = search(&index, "Nicolas Maduro", None, None, 10, 0.88, false, &config);
        assert_eq!(outcome.entities.len(), 1);
        assert!((outcome.entities[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_query_name_yields_zero_results() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let outcome = search(&index, "", None, None, 10, 0.88, false, &config);
        assert_eq!(outcome.entities.len(), 0);
        assert_eq!(outcome.total_results, 0);
    }

    #[test]
    fn min_match_zero_returns_all_scored_candidates_up_to_limit() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let mut similarity = config.similarity;
        similarity.phonetic_filtering_disabled = true;
        let config = ScoringConfig { similarity, ..config };
        let outcome = search(&index, "Smith", None, None, 10, 0.0, false, &config);
        assert_eq!(outcome.entities.len(), 2);
    }

    #[test]
    fn limit_zero_returns_empty_list_but_still_scores() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let outcome = search(&index, "Nicolas Maduro", None, None, 0, 0.0, false, &config);
        assert_eq!(outcome.entities.len(), 0);
        assert!(outcome.total_results > 0);
    }

    #[test]
    fn phonetic_filter_culls_incompatible_candidate() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let outcome = search(&index, "Smith", None, None, 10, 0.0, true, &config);
        assert!(outcome.trace.is_some());
        let trace = outcome.trace.unwrap();
        assert_eq!(trace.phonetic_filtered, 2);
    }

    #[test]
    fn results_sorted_descending_by_score() {
        let index = seeded_index();
        let config = ScoringConfig::default();
        let mut similarity = config.similarity;
        similarity.phonetic_filtering_disabled = true;
        let config = ScoringConfig { similarity, ..config };
        let outcome = search(&index, "Nicolas Maduro", None, None, 10, 0.0, false, &config);
        for pair in outcome.entities.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
