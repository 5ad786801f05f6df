//! Entity, PreparedFields, scoring, and bulk-job wire/domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source watchlist an entity was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitySource {
    OfacSdn,
    UsCsl,
    UkCsl,
    EuCsl,
}

/// Coarse entity type. `Unknown` carries no type-specific detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Business,
    Organization,
    Vessel,
    Aircraft,
    Unknown,
}

/// Type carried by NDJSON bulk-job input records and the single-query API,
/// distinct from `EntityType` because callers speak of "individuals", not
/// the index's internal vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryEntityType {
    Individual,
    Business,
    Organization,
    Vessel,
    Aircraft,
}

impl From<QueryEntityType> for EntityType {
    fn from(q: QueryEntityType) -> Self {
        match q {
            QueryEntityType::Individual => EntityType::Person,
            QueryEntityType::Business => EntityType::Business,
            QueryEntityType::Organization => EntityType::Organization,
            QueryEntityType::Vessel => EntityType::Vessel,
            QueryEntityType::Aircraft => EntityType::Aircraft,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PersonDetail {
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    pub nationalities: Vec<String>,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BusinessDetail {
    pub date_created: Option<String>,
    pub date_dissolved: Option<String>,
    pub registration_country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrganizationDetail {
    pub date_created: Option<String>,
    pub date_dissolved: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VesselDetail {
    pub date_built: Option<String>,
    pub flag: Option<String>,
    pub call_sign: Option<String>,
    pub imo_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AircraftDetail {
    pub date_built: Option<String>,
    pub tail_number: Option<String>,
    pub model: Option<String>,
}

/// Type-specific detail, mutually exclusive with `EntityType::Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityDetail {
    Person(PersonDetail),
    Business(BusinessDetail),
    Organization(OrganizationDetail),
    Vessel(VesselDetail),
    Aircraft(AircraftDetail),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Formats non-empty fields into a single normalizer-ready string.
    pub fn formatted(&self) -> String {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GovernmentId {
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

impl GovernmentId {
    /// `(country, type, identifier)` normalized per spec §3: identifier
    /// strips spaces/hyphens/non-alphanumerics and uppercases; type and
    /// country are compared case-insensitively.
    pub fn normalized_key(&self) -> (Option<String>, String, String) {
        let identifier = self
            .identifier
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_uppercase())
            .collect();
        (
            self.country.as_ref().map(|c| c.to_uppercase()),
            self.id_type.to_uppercase(),
            identifier,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CryptoAddress {
    pub currency: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SanctionsInfo {
    pub programs: Vec<String>,
    pub secondary: bool,
    pub description: Option<String>,
}

/// Cached normalized derivations of an entity's name-related fields.
/// Invariant: when present, consistent with the owning entity's current
/// `name` and `alt_names`; replaced atomically whenever either changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PreparedFields {
    pub normalized_names: Vec<String>,
    pub normalized_names_without_stopwords: Vec<String>,
    pub normalized_names_without_company_titles: Vec<String>,
    pub word_combinations: Vec<String>,
    pub normalized_addresses: Vec<String>,
    pub detected_language: Option<String>,
}

impl PreparedFields {
    pub fn is_empty(&self) -> bool {
        self.normalized_names.is_empty()
    }
}

/// The indexed record.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: Uuid,
    pub source_id: Option<String>,
    pub source: Option<EntitySource>,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    pub alt_names: Vec<String>,
    pub detail: Option<EntityDetail>,
    pub contact: Option<Contact>,
    pub addresses: Vec<Address>,
    pub crypto_addresses: Vec<CryptoAddress>,
    pub government_ids: Vec<GovernmentId>,
    pub sanctions_info: Option<SanctionsInfo>,
    pub remarks: Option<String>,
    #[serde(skip)]
    pub prepared_fields: Option<PreparedFields>,
}

impl Entity {
    /// A bare query-side entity: just a name, optionally typed/sourced.
    pub fn from_query_name(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            source_id: None,
            source: None,
            entity_type: EntityType::Unknown,
            name: name.into(),
            alt_names: Vec::new(),
            detail: None,
            contact: None,
            addresses: Vec::new(),
            crypto_addresses: Vec::new(),
            government_ids: Vec::new(),
            sanctions_info: None,
            remarks: None,
            prepared_fields: None,
        }
    }

    /// Collapses `alt_names` duplicates case-insensitively, preserving the
    /// first-seen casing and order.
    pub fn dedup_alt_names(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.alt_names
            .retain(|n| seen.insert(n.to_lowercase()));
    }
}

/// Folds case and collapses whitespace for dedup-key comparisons. Not a
/// substitute for the screening normalizer's diacritic folding — this is
/// only ever used to decide "is this the same record", not to score it.
fn fold_for_dedup(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key identifying "the same underlying record" across source-list rows:
/// `(source, sourceId)` when both are present, since `sourceId` is the
/// stable identifier a source list assigns to a row across re-publications.
/// Falls back to `(source, folded name)` for rows with no source id.
fn dedup_key(entity: &Entity) -> (Option<EntitySource>, String) {
    match &entity.source_id {
        Some(id) if !id.trim().is_empty() => (entity.source, format!("id:{}", fold_for_dedup(id))),
        _ => (entity.source, format!("name:{}", fold_for_dedup(&entity.name))),
    }
}

/// Merges `incoming`'s address list into `base`'s: addresses that fold to
/// the same string are one address (first occurrence wins), with any
/// subfield `base`'s copy is missing filled in from the duplicate.
fn merge_addresses(base: &mut Vec<Address>, incoming: Vec<Address>) {
    for addr in incoming {
        let key = fold_for_dedup(&addr.formatted());
        if let Some(existing) = base.iter_mut().find(|a| fold_for_dedup(&a.formatted()) == key) {
            existing.line1 = existing.line1.take().or(addr.line1);
            existing.line2 = existing.line2.take().or(addr.line2);
            existing.city = existing.city.take().or(addr.city);
            existing.state = existing.state.take().or(addr.state);
            existing.postal_code = existing.postal_code.take().or(addr.postal_code);
            existing.country = existing.country.take().or(addr.country);
        } else {
            base.push(addr);
        }
    }
}

fn merge_contact(base: &mut Option<Contact>, incoming: Option<Contact>) {
    let Some(incoming) = incoming else { return };
    let base_contact = base.get_or_insert_with(Contact::default);
    base_contact.email = base_contact.email.take().or(incoming.email);
    base_contact.phone = base_contact.phone.take().or(incoming.phone);
    base_contact.fax = base_contact.fax.take().or(incoming.fax);
    base_contact.website = base_contact.website.take().or(incoming.website);
}

fn merge_sanctions_info(base: &mut Option<SanctionsInfo>, incoming: Option<SanctionsInfo>) {
    let Some(incoming) = incoming else { return };
    match base {
        Some(existing) => {
            for program in incoming.programs {
                if !existing.programs.iter().any(|p| p.eq_ignore_ascii_case(&program)) {
                    existing.programs.push(program);
                }
            }
            existing.secondary = existing.secondary || incoming.secondary;
            existing.description = existing.description.take().or(incoming.description);
        }
        None => *base = Some(incoming),
    }
}

/// Folds one duplicate row into the kept record for its dedup key: the
/// first-seen row's name, type and detail win; alt names, government ids,
/// crypto addresses, contact fields and sanctions programs are unioned;
/// addresses are deduped per [`merge_addresses`].
fn merge_into(base: &mut Entity, incoming: Entity) {
    if !base.name.eq_ignore_ascii_case(&incoming.name) {
        base.alt_names.push(incoming.name);
    }
    base.alt_names.extend(incoming.alt_names);
    base.dedup_alt_names();

    merge_addresses(&mut base.addresses, incoming.addresses);

    for id in incoming.government_ids {
        if !base.government_ids.iter().any(|existing| existing.normalized_key() == id.normalized_key()) {
            base.government_ids.push(id);
        }
    }

    for addr in incoming.crypto_addresses {
        if !base.crypto_addresses.contains(&addr) {
            base.crypto_addresses.push(addr);
        }
    }

    merge_contact(&mut base.contact, incoming.contact);
    merge_sanctions_info(&mut base.sanctions_info, incoming.sanctions_info);

    if base.detail.is_none() {
        base.detail = incoming.detail;
    }
    if base.source_id.is_none() {
        base.source_id = incoming.source_id;
    }
    if base.remarks.is_none() {
        base.remarks = incoming.remarks;
    }
}

/// Deterministically merges duplicate rows emitted by source lists (e.g. a
/// record re-published across diffed updates) into one record per distinct
/// `(source, sourceId)` — see [`dedup_key`]. Preserves the order in which
/// distinct keys were first seen. Idempotent: every row in the output has a
/// unique key, so feeding the output back in changes nothing.
pub fn merge(entities: Vec<Entity>) -> Vec<Entity> {
    let mut order: Vec<(Option<EntitySource>, String)> = Vec::new();
    let mut merged: std::collections::HashMap<(Option<EntitySource>, String), Entity> = std::collections::HashMap::new();

    for entity in entities {
        let key = dedup_key(&entity);
        match merged.get_mut(&key) {
            Some(base) => merge_into(base, entity),
            None => {
                order.push(key.clone());
                merged.insert(key, entity);
            }
        }
    }

    order
        .into_iter()
        .map(|key| merged.remove(&key).expect("key was just inserted"))
        .collect()
}

/// Number of "available" comparable fields on a candidate, used as the
/// denominator for the aggregator's coverage ratio.
pub fn count_available_fields(entity: &Entity) -> usize {
    let mut n = 1; // name is always available
    if !entity.alt_names.is_empty() {
        n += 1;
    }
    if !entity.addresses.is_empty() {
        n += 1;
    }
    if !entity.government_ids.is_empty() {
        n += 1;
    }
    if !entity.crypto_addresses.is_empty() {
        n += 1;
    }
    if entity.contact.is_some() {
        n += 1;
    }
    if has_comparable_dates(entity) {
        n += 1;
    }
    n
}

fn has_comparable_dates(entity: &Entity) -> bool {
    match &entity.detail {
        Some(EntityDetail::Person(p)) => {
            p.date_of_birth.is_some() || p.date_of_death.is_some()
        }
        Some(EntityDetail::Business(b)) => {
            b.date_created.is_some() || b.date_dissolved.is_some()
        }
        Some(EntityDetail::Organization(o)) => {
            o.date_created.is_some() || o.date_dissolved.is_some()
        }
        Some(EntityDetail::Vessel(v)) => v.date_built.is_some(),
        Some(EntityDetail::Aircraft(a)) => a.date_built.is_some(),
        None => false,
    }
}

// =============================================================================
// SCORING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ScorePieceKind {
    Name,
    AltName,
    Address,
    GovIdsExact,
    Crypto,
    Contact,
    Date,
    SourceList,
}

/// One factor's contribution to a final score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScorePiece {
    pub kind: ScorePieceKind,
    pub score: f64,
    pub weight: f64,
    pub fields_compared: usize,
    pub required: bool,
    pub matched: bool,
    pub exact: bool,
}

impl ScorePiece {
    pub fn new(kind: ScorePieceKind, score: f64, weight: f64, fields_compared: usize) -> Self {
        Self {
            kind,
            score,
            weight,
            fields_compared,
            required: false,
            matched: false,
            exact: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn matched(mut self, matched: bool) -> Self {
        self.matched = matched;
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }
}

/// Final per-kind breakdown and aggregate score for one candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub name_score: f64,
    pub alt_names_score: f64,
    pub address_score: f64,
    pub gov_id_score: f64,
    pub crypto_score: f64,
    pub contact_score: f64,
    pub date_score: f64,
    pub total_weighted_score: f64,
}

// =============================================================================
// BULK JOB
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkJobStatus {
    Submitted,
    Running,
    Completed,
    Failed,
}

/// One input record from an NDJSON bulk-job stream, or from an inline
/// `items` array.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobItem {
    pub request_id: String,
    pub name: String,
    pub entity_type: Option<QueryEntityType>,
    pub source: Option<EntitySource>,
}

/// One row of `matches.json`: a (input record x matched entity) pair.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobMatch {
    pub customer_id: String,
    pub name: String,
    pub entity_id: String,
    pub match_score: f64,
    pub source: Option<EntitySource>,
}

/// Immutable snapshot of a bulk job's progress, safe to hand to callers
/// without exposing the mutable job object.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobStatusSnapshot {
    pub job_id: Uuid,
    pub job_name: String,
    pub status: BulkJobStatus,
    pub total_items: u64,
    pub processed_items: u64,
    pub matched_items: u64,
    pub percent_complete: u32,
    #[serde(rename = "estimatedTimeRemaining")]
    pub estimated_time_remaining_secs: Option<u64>,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result_path: Option<String>,
    pub error_message: Option<String>,
}

/// `summary.json` written alongside `matches.json` on job completion.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobSummary {
    pub job_id: Uuid,
    pub status: BulkJobStatus,
    pub total_items: u64,
    pub processed_items: u64,
    pub matched_items: u64,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    pub result_path: String,
}

/// Per-candidate trace detail captured when a search runs with `trace=true`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoringTraceEvent {
    pub entity_id: Uuid,
    pub pieces: Vec<ScorePiece>,
    pub phase_timings_us: BTreeMap<String, u64>,
}

/// A fully materialized, serializable scoring trace attached to a search
/// response when requested. Distinct from operational `tracing` spans/logs:
/// this is payload data for the caller, not telemetry for operators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoringTrace {
    pub events: Vec<ScoringTraceEvent>,
    pub candidate_pool_size: usize,
    pub phonetic_filtered: usize,
}
