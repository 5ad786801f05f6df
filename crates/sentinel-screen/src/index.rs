//! In-memory entity index with atomic snapshot replacement.
//!
//! The index holds the full entity set plus auxiliary `(source)` and
//! `(source,type)` maps for O(1) candidate-pool selection. Replace-all
//! publishes a new snapshot atomically: readers who already captured a
//! reference finish their query against it, never observing a
//! half-updated snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use sentinel_core::{Entity, EntitySource, EntityType};

use crate::normalizer;

struct Snapshot {
    all: Vec<Arc<Entity>>,
    by_source: HashMap<EntitySource, Vec<Arc<Entity>>>,
    by_source_type: HashMap<(EntitySource, EntityType), Vec<Arc<Entity>>>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            all: Vec::new(),
            by_source: HashMap::new(),
            by_source_type: HashMap::new(),
        }
    }

    fn build(entities: Vec<Entity>, keep_stopwords: bool) -> Self {
        let mut all = Vec::with_capacity(entities.len());
        let mut by_source: HashMap<EntitySource, Vec<Arc<Entity>>> = HashMap::new();
        let mut by_source_type: HashMap<(EntitySource, EntityType), Vec<Arc<Entity>>> = HashMap::new();

        for mut entity in entities {
            entity.prepared_fields = Some(normalizer::prepare_fields(&entity, keep_stopwords));
            let arc = Arc::new(entity);

            if let Some(source) = arc.source {
                by_source.entry(source).or_default().push(arc.clone());
                by_source_type
                    .entry((source, arc.entity_type))
                    .or_default()
                    .push(arc.clone());
            }
            all.push(arc);
        }

        Self { all, by_source, by_source_type }
    }
}

/// Atomically-swappable in-memory entity index.
pub struct Index {
    inner: ArcSwap<Snapshot>,
}

impl Index {
    pub fn new() -> Self {
        Self { inner: ArcSwap::from_pointee(Snapshot::empty()) }
    }

    /// Atomically replaces the entire entity set. Builds `PreparedFields`
    /// for every entity up front so search never pays normalization cost
    /// per query.
    pub fn replace_all(&self, entities: Vec<Entity>, keep_stopwords: bool) {
        self.inner.store(Arc::new(Snapshot::build(entities, keep_stopwords)));
    }

    pub fn len(&self) -> usize {
        self.inner.load().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selects the candidate pool for a search: all entities, or those
    /// matching the given source/type filters. O(1) map lookups, O(pool)
    /// clone of the `Arc<Entity>` handles.
    pub fn candidates(&self, source: Option<EntitySource>, entity_type: Option<EntityType>) -> Vec<Arc<Entity>> {
        let snapshot = self.inner.load();
        match (source, entity_type) {
            (Some(s), Some(t)) => snapshot.by_source_type.get(&(s, t)).cloned().unwrap_or_default(),
            (Some(s), None) => snapshot.by_source.get(&s).cloned().unwrap_or_default(),
            (None, Some(t)) => snapshot.all.iter().filter(|e| e.entity_type == t).cloned().collect(),
            (None, None) => snapshot.all.clone(),
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Entity;

    fn entity(name: &str, source: EntitySource, entity_type: EntityType) -> Entity {
        let mut e = Entity::from_query_name(name);
        e.source = Some(source);
        e.entity_type = entity_type;
        e.id = uuid::Uuid::new_v4();
        e
    }

    #[test]
    fn empty_index_has_no_candidates() {
        let index = Index::new();
        assert!(index.is_empty());
        assert!(index.candidates(None, None).is_empty());
    }

    #[test]
    fn replace_all_populates_prepared_fields() {
        let index = Index::new();
        index.replace_all(vec![entity("Nicolas Maduro", EntitySource::OfacSdn, EntityType::Person)], false);
        let candidates = index.candidates(None, None);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].prepared_fields.is_some());
    }

    #[test]
    fn candidates_filter_by_source() {
        let index = Index::new();
        index.replace_all(
            vec![
                entity("A", EntitySource::OfacSdn, EntityType::Person),
                entity("B", EntitySource::UsCsl, EntityType::Person),
            ],
            false,
        );
        assert_eq!(index.candidates(Some(EntitySource::OfacSdn), None).len(), 1);
        assert_eq!(index.candidates(Some(EntitySource::UsCsl), None).len(), 1);
    }

    #[test]
    fn candidates_filter_by_source_and_type() {
        let index = Index::new();
        index.replace_all(
            vec![
                entity("A", EntitySource::OfacSdn, EntityType::Person),
                entity("B", EntitySource::OfacSdn, EntityType::Vessel),
            ],
            false,
        );
        let hits = index.candidates(Some(EntitySource::OfacSdn), Some(EntityType::Vessel));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "B");
    }

    #[test]
    fn replace_all_is_atomic_for_in_flight_readers() {
        let index = Index::new();
        index.replace_all(vec![entity("A", EntitySource::OfacSdn, EntityType::Person)], false);
        let observed = index.candidates(None, None);
        index.replace_all(vec![entity("B", EntitySource::OfacSdn, EntityType::Person)], false);
        assert_eq!(observed[0].name, "A");
        assert_eq!(index.candidates(None, None)[0].name, "B");
    }
}
