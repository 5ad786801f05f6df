//! Per-factor score pieces and the aggregator that combines them into a
//! final weighted score.

use sentinel_core::{
    defaults, Address, Entity, EntityDetail, GovernmentId, ScoreBreakdown, ScorePiece,
    ScorePieceKind, ScoringConfig,
};

use crate::normalizer;
use crate::similarity::{self, TokenSetOptions};

/// Computes every applicable `ScorePiece` for `(query, candidate)`. Pieces
/// with `fieldsCompared == 0` are omitted entirely per spec, except the
/// always-present name piece.
pub fn score_pieces(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Vec<ScorePiece> {
    let mut pieces = Vec::new();

    let opts = TokenSetOptions::from(&config.similarity);
    let query_tokens = normalizer::tokenize(&query.name);

    pieces.push(name_piece(&query_tokens, candidate, config, opts));
    if let Some(alt) = alt_name_piece(&query_tokens, candidate, config, opts) {
        pieces.push(alt);
    }
    if let Some(p) = gov_ids_piece(query, candidate, config) {
        pieces.push(p);
    }
    if let Some(p) = crypto_piece(query, candidate, config) {
        pieces.push(p);
    }
    if let Some(p) = contact_piece(query, candidate, config) {
        pieces.push(p);
    }
    if let Some(p) = address_piece(query, candidate, config) {
        pieces.push(p);
    }
    if let Some(p) = date_piece(query, candidate, config) {
        pieces.push(p);
    }
    if let Some(p) = source_list_piece(query, candidate, config) {
        pieces.push(p);
    }

    pieces
}

fn name_piece(
    query_tokens: &[String],
    candidate: &Entity,
    config: &ScoringConfig,
    opts: TokenSetOptions,
) -> ScorePiece {
    let variants = normalizer::combine(&normalizer::tokenize(&candidate.name));
    let score = similarity::best_name_score(query_tokens, &variants, opts);
    ScorePiece::new(ScorePieceKind::Name, score, config.weights.name_weight, 1)
        .required(true)
        .matched(score >= 0.5)
        .exact(score >= config.weights.exact_match_threshold)
}

fn alt_name_piece(
    query_tokens: &[String],
    candidate: &Entity,
    config: &ScoringConfig,
    opts: TokenSetOptions,
) -> Option<ScorePiece> {
    if candidate.alt_names.is_empty() {
        return None;
    }
    let variants: Vec<String> = candidate
        .alt_names
        .iter()
        .flat_map(|alt| normalizer::combine(&normalizer::tokenize(alt)))
        .collect();
    let score = similarity::best_name_score(query_tokens, &variants, opts);
    Some(
        ScorePiece::new(ScorePieceKind::AltName, score, config.weights.name_weight, 1)
            .matched(score >= 0.5)
            .exact(score >= config.weights.exact_match_threshold),
    )
}

fn gov_ids_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    if query.government_ids.is_empty() || candidate.government_ids.is_empty() {
        return None;
    }
    let candidate_keys: Vec<_> = candidate
        .government_ids
        .iter()
        .map(GovernmentId::normalized_key)
        .collect();
    let matches = query
        .government_ids
        .iter()
        .filter(|id| candidate_keys.contains(&id.normalized_key()))
        .count();
    let score = matches as f64 / query.government_ids.len() as f64;
    Some(
        ScorePiece::new(
            ScorePieceKind::GovIdsExact,
            score,
            config.weights.critical_id_weight,
            query.government_ids.len(),
        )
        .matched(score > 0.0)
        .exact(score >= config.weights.exact_match_threshold),
    )
}

fn crypto_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    if query.crypto_addresses.is_empty() || candidate.crypto_addresses.is_empty() {
        return None;
    }
    let matches = query
        .crypto_addresses
        .iter()
        .filter(|addr| candidate.crypto_addresses.contains(addr))
        .count();
    let score = matches as f64 / query.crypto_addresses.len() as f64;
    Some(
        ScorePiece::new(
            ScorePieceKind::Crypto,
            score,
            config.weights.critical_id_weight,
            query.crypto_addresses.len(),
        )
        .matched(score > 0.0)
        .exact(score >= config.weights.exact_match_threshold),
    )
}

fn contact_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    let (q, c) = match (&query.contact, &candidate.contact) {
        (Some(q), Some(c)) => (q, c),
        _ => return None,
    };

    let mut sub_scores = Vec::new();
    if q.email.is_some() || c.email.is_some() {
        sub_scores.push(field_equal(q.email.as_deref(), c.email.as_deref(), |s| {
            s.to_lowercase()
        }));
    }
    if q.phone.is_some() || c.phone.is_some() {
        sub_scores.push(field_equal(q.phone.as_deref(), c.phone.as_deref(), digits_only));
    }
    if q.fax.is_some() || c.fax.is_some() {
        sub_scores.push(field_equal(q.fax.as_deref(), c.fax.as_deref(), digits_only));
    }

    if sub_scores.is_empty() {
        return None;
    }
    let score = sub_scores.iter().sum::<f64>() / sub_scores.len() as f64;
    Some(
        ScorePiece::new(
            ScorePieceKind::Contact,
            score,
            config.weights.critical_id_weight,
            sub_scores.len(),
        )
        .matched(score > 0.0)
        .exact(score >= config.weights.exact_match_threshold),
    )
}

fn field_equal(a: Option<&str>, b: Option<&str>, normalize: impl Fn(&str) -> String) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if normalize(a) == normalize(b) => 1.0,
        _ => 0.0,
    }
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn address_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    if query.addresses.is_empty() || candidate.addresses.is_empty() {
        return None;
    }
    let prefix = config.similarity.jaro_winkler_prefix_size;
    let best = query
        .addresses
        .iter()
        .map(Address::formatted)
        .map(|qa| normalizer::fold(&qa))
        .flat_map(|qa| {
            candidate
                .addresses
                .iter()
                .map(Address::formatted)
                .map(move |ca| similarity::jaro_winkler(&qa, &normalizer::fold(&ca), prefix))
        })
        .fold(0.0_f64, f64::max);

    Some(
        ScorePiece::new(ScorePieceKind::Address, best, config.weights.address_weight, 1)
            .required(true)
            .matched(best > 0.5)
            .exact(best > 0.99),
    )
}

fn date_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    let (q_detail, c_detail) = match (&query.detail, &candidate.detail) {
        (Some(q), Some(c)) => (q, c),
        _ => return None,
    };

    let (score, compared) = match (q_detail, c_detail) {
        (EntityDetail::Person(q), EntityDetail::Person(c)) => {
            let births = date_pair_score(q.date_of_birth.as_deref(), c.date_of_birth.as_deref());
            let deaths = date_pair_score(q.date_of_death.as_deref(), c.date_of_death.as_deref());
            let mut pairs: Vec<f64> = Vec::new();
            if let Some(s) = births {
                pairs.push(s);
            }
            if let Some(s) = deaths {
                pairs.push(s);
            }
            if pairs.is_empty() {
                return None;
            }
            let mut avg = pairs.iter().sum::<f64>() / pairs.len() as f64;
            if !lifespan_is_consistent(
                q.date_of_birth.as_deref(),
                q.date_of_death.as_deref(),
                c.date_of_birth.as_deref(),
                c.date_of_death.as_deref(),
            ) {
                avg *= defaults::DATE_CONSISTENCY_PENALTY_FACTOR;
            }
            (avg, pairs.len())
        }
        (EntityDetail::Business(q), EntityDetail::Business(c)) => {
            dispatch_pair(q.date_created.as_deref(), c.date_created.as_deref(), q.date_dissolved.as_deref(), c.date_dissolved.as_deref())?
        }
        (EntityDetail::Organization(q), EntityDetail::Organization(c)) => {
            dispatch_pair(q.date_created.as_deref(), c.date_created.as_deref(), q.date_dissolved.as_deref(), c.date_dissolved.as_deref())?
        }
        (EntityDetail::Vessel(q), EntityDetail::Vessel(c)) => {
            let s = date_pair_score(q.date_built.as_deref(), c.date_built.as_deref())?;
            (s, 1)
        }
        (EntityDetail::Aircraft(q), EntityDetail::Aircraft(c)) => {
            let s = date_pair_score(q.date_built.as_deref(), c.date_built.as_deref())?;
            (s, 1)
        }
        _ => return None,
    };

    Some(
        ScorePiece::new(ScorePieceKind::Date, score, config.weights.supporting_info_weight, compared)
            .matched(score > 0.5)
            .exact(score >= config.weights.exact_match_threshold),
    )
}

fn dispatch_pair(
    q_created: Option<&str>,
    c_created: Option<&str>,
    q_dissolved: Option<&str>,
    c_dissolved: Option<&str>,
) -> Option<(f64, usize)> {
    let created = date_pair_score(q_created, c_created);
    let dissolved = date_pair_score(q_dissolved, c_dissolved);
    let mut pairs = Vec::new();
    if let Some(s) = created {
        pairs.push(s);
    }
    if let Some(s) = dissolved {
        pairs.push(s);
    }
    if pairs.is_empty() {
        return None;
    }
    Some((pairs.iter().sum::<f64>() / pairs.len() as f64, pairs.len()))
}

struct ParsedDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

fn parse_date(s: &str) -> Option<ParsedDate> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month = parts.next().and_then(|p| p.parse::<u32>().ok());
    let day = parts.next().and_then(|p| p.parse::<u32>().ok());
    Some(ParsedDate { year, month, day })
}

/// `None` if either side is missing (fieldsCompared=0 contribution, handled
/// by the caller omitting the pair). `Some(score)` otherwise.
fn date_pair_score(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    let (a, b) = (parse_date(a?)?, parse_date(b?)?);

    let year_score = (1.0 - (a.year - b.year).unsigned_abs() as f64 / defaults::DATE_YEAR_TOLERANCE)
        .max(0.0);

    let month_score = match (a.month, b.month) {
        (Some(am), Some(bm)) => month_score(am, bm),
        _ => 0.0,
    };

    let day_score = match (a.day, b.day) {
        (Some(ad), Some(bd)) => day_score(ad, bd),
        _ => 0.0,
    };

    Some(
        year_score * defaults::DATE_YEAR_WEIGHT
            + month_score * defaults::DATE_MONTH_WEIGHT
            + day_score * defaults::DATE_DAY_WEIGHT,
    )
}

const MONTH_TYPO_PAIRS: &[(u32, u32)] = &[(1, 10), (1, 11), (1, 12)];

fn month_score(a: u32, b: u32) -> f64 {
    if a == b {
        return 1.0;
    }
    let diff = (a as i32 - b as i32).unsigned_abs();
    if diff == 1 {
        return 0.9;
    }
    if MONTH_TYPO_PAIRS
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
    {
        return 0.7;
    }
    (1.0 - diff as f64 / 11.0).max(0.0)
}

fn day_score(a: u32, b: u32) -> f64 {
    if a == b {
        return 1.0;
    }
    let diff = (a as i32 - b as i32).unsigned_abs();
    if diff <= 3 {
        return 0.8;
    }
    if similar_days(a, b) {
        return 0.7;
    }
    (1.0 - diff as f64 / 31.0).max(0.0)
}

/// Same digit repeated (1 vs 11) or a digit-swap (12 vs 21).
fn similar_days(a: u32, b: u32) -> bool {
    if a == 0 || b == 0 {
        return false;
    }
    let (small, large) = if a < b { (a, b) } else { (b, a) };
    if small < 10 && large == small * 11 {
        return true;
    }
    let swap = |n: u32| -> Option<u32> {
        if n >= 10 && n <= 31 {
            Some((n % 10) * 10 + n / 10)
        } else {
            None
        }
    };
    swap(a) == Some(b)
}

fn lifespan_is_consistent(
    q_birth: Option<&str>,
    q_death: Option<&str>,
    c_birth: Option<&str>,
    c_death: Option<&str>,
) -> bool {
    let (qb, qd, cb, cd) = match (
        q_birth.and_then(parse_date),
        q_death.and_then(parse_date),
        c_birth.and_then(parse_date),
        c_death.and_then(parse_date),
    ) {
        (Some(qb), Some(qd), Some(cb), Some(cd)) => (qb, qd, cb, cd),
        _ => return true, // nothing to check
    };

    if qd.year < qb.year || cd.year < cb.year {
        return false;
    }
    let q_lifespan = (qd.year - qb.year) as f64;
    let c_lifespan = (cd.year - cb.year) as f64;
    if q_lifespan <= 0.0 || c_lifespan <= 0.0 {
        return true;
    }
    let ratio = (q_lifespan - c_lifespan).abs() / q_lifespan.max(c_lifespan);
    ratio <= defaults::DATE_LIFESPAN_TOLERANCE_RATIO
}

/// Dilutes the aggregate when sources disagree and both sourceIds are
/// present and unequal, preventing cross-list ID confusion.
fn source_list_piece(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> Option<ScorePiece> {
    let (qs, cs) = match (&query.source_id, &candidate.source_id) {
        (Some(qs), Some(cs)) if !qs.is_empty() && !cs.is_empty() => (qs, cs),
        _ => return None,
    };
    if query.source == candidate.source || qs == cs {
        return None;
    }
    Some(ScorePiece::new(
        ScorePieceKind::SourceList,
        0.0,
        config.weights.critical_id_weight,
        1,
    ))
}

/// Combines a set of `ScorePiece`s into a final `ScoreBreakdown`, applying
/// the two short-circuits and the weighted-mean/coverage-penalty pipeline.
pub fn aggregate(
    query: &Entity,
    candidate: &Entity,
    pieces: &[ScorePiece],
    config: &ScoringConfig,
) -> ScoreBreakdown {
    // Short-circuit 1: sourceId identity.
    if let (Some(qs), Some(cs)) = (&query.source_id, &candidate.source_id) {
        if !qs.is_empty() && qs == cs {
            return ScoreBreakdown {
                name_score: 1.0,
                alt_names_score: 1.0,
                address_score: 1.0,
                gov_id_score: 1.0,
                crypto_score: 1.0,
                contact_score: 1.0,
                date_score: 1.0,
                total_weighted_score: 1.0,
            };
        }
    }

    let name_score = piece_score(pieces, ScorePieceKind::Name);
    let alt_names_score = piece_score(pieces, ScorePieceKind::AltName);
    let effective_name = name_score.max(alt_names_score);

    // Short-circuit 2: exact critical identifier.
    let has_exact_critical = pieces.iter().any(|p| {
        matches!(
            p.kind,
            ScorePieceKind::GovIdsExact | ScorePieceKind::Crypto | ScorePieceKind::Contact
        ) && p.exact
    });
    if has_exact_critical {
        let total = (defaults::EXACT_ID_SHORT_CIRCUIT_FLOOR + 0.3 * effective_name).min(1.0);
        return ScoreBreakdown {
            name_score,
            alt_names_score,
            address_score: piece_score(pieces, ScorePieceKind::Address),
            gov_id_score: piece_score(pieces, ScorePieceKind::GovIdsExact),
            crypto_score: piece_score(pieces, ScorePieceKind::Crypto),
            contact_score: piece_score(pieces, ScorePieceKind::Contact),
            date_score: piece_score(pieces, ScorePieceKind::Date),
            total_weighted_score: total,
        };
    }

    // Weighted mean, folding name+altName into a single effective-name piece.
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut folded_name = false;
    let mut critical_compared = 0usize;
    let mut critical_total = 0usize;

    for piece in pieces {
        if piece.weight <= 0.0 || piece.fields_compared == 0 {
            continue;
        }
        if matches!(piece.kind, ScorePieceKind::Name | ScorePieceKind::AltName) {
            if folded_name {
                continue;
            }
            folded_name = true;
            weighted_sum += effective_name * piece.weight;
            total_weight += piece.weight;
            continue;
        }

        weighted_sum += piece.score * piece.weight;
        total_weight += piece.weight;
        if is_critical(piece.kind) {
            critical_total += 1;
            critical_compared += 1;
        }
    }

    let mut base = if total_weight > 0.0 { weighted_sum / total_weight } else { 0.0 };

    let available = sentinel_core::count_available_fields(candidate) as f64;
    let fields_compared: usize = pieces.iter().filter(|p| p.fields_compared > 0).count();
    let coverage_ratio = if available > 0.0 { fields_compared as f64 / available } else { 0.0 };
    let critical_ratio = if critical_total > 0 {
        critical_compared as f64 / critical_total as f64
    } else {
        1.0
    };

    // "Required" identity backbone: name (always compared) plus address,
    // when the candidate actually has one on file to verify against.
    let required_total = 1 + if candidate.addresses.is_empty() { 0 } else { 1 };
    let address_compared = pieces
        .iter()
        .any(|p| p.kind == ScorePieceKind::Address && p.fields_compared > 0);
    let required_compared = 1 + if address_compared { 1 } else { 0 };

    if coverage_ratio < defaults::COVERAGE_RATIO_PENALTY_THRESHOLD {
        base *= defaults::COVERAGE_RATIO_PENALTY_FACTOR;
    }
    if critical_ratio < defaults::CRITICAL_COVERAGE_PENALTY_THRESHOLD {
        base *= defaults::CRITICAL_COVERAGE_PENALTY_FACTOR;
    }
    if required_compared < required_total.min(defaults::REQUIRED_PIECES_PENALTY_THRESHOLD) {
        base *= defaults::REQUIRED_PIECES_PENALTY_FACTOR;
    }

    let has_id_match = pieces.iter().any(|p| {
        matches!(
            p.kind,
            ScorePieceKind::GovIdsExact | ScorePieceKind::Crypto | ScorePieceKind::Contact
        ) && p.matched
    });
    let address_matched = pieces
        .iter()
        .any(|p| p.kind == ScorePieceKind::Address && p.matched);
    if !has_id_match && !address_matched {
        base *= defaults::NAME_ONLY_PENALTY_FACTOR;
    }

    let has_name = effective_name > 0.0;
    let has_critical = critical_total > 0;
    if base >= defaults::BONUS_BASE_THRESHOLD
        && has_name
        && has_id_match
        && has_critical
        && coverage_ratio >= defaults::BONUS_COVERAGE_RATIO_THRESHOLD
    {
        base *= defaults::BONUS_FACTOR;
    }

    ScoreBreakdown {
        name_score,
        alt_names_score,
        address_score: piece_score(pieces, ScorePieceKind::Address),
        gov_id_score: piece_score(pieces, ScorePieceKind::GovIdsExact),
        crypto_score: piece_score(pieces, ScorePieceKind::Crypto),
        contact_score: piece_score(pieces, ScorePieceKind::Contact),
        date_score: piece_score(pieces, ScorePieceKind::Date),
        total_weighted_score: base.clamp(0.0, 1.0),
    }
}

fn is_critical(kind: ScorePieceKind) -> bool {
    matches!(
        kind,
        ScorePieceKind::GovIdsExact | ScorePieceKind::Crypto | ScorePieceKind::Contact
    )
}

fn piece_score(pieces: &[ScorePiece], kind: ScorePieceKind) -> f64 {
    pieces.iter().find(|p| p.kind == kind).map(|p| p.score).unwrap_or(0.0)
}

/// Convenience entry point: computes pieces then aggregates. Both `query`
/// and `candidate` must already carry `prepared_fields`.
pub fn score(query: &Entity, candidate: &Entity, config: &ScoringConfig) -> (ScoreBreakdown, Vec<ScorePiece>) {
    let pieces = score_pieces(query, candidate, config);
    let breakdown = aggregate(query, candidate, &pieces, config);
    (breakdown, pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::{CryptoAddress, GovernmentId, PersonDetail};

    fn prepared(entity: &mut Entity) {
        entity.prepared_fields = Some(normalizer::prepare_fields(entity, false));
    }

    #[test]
    fn identity_scores_one() {
        let mut e = Entity::from_query_name("Nicolas Maduro");
        e.entity_type = sentinel_core::EntityType::Person;
        prepared(&mut e);
        let config = ScoringConfig::default();
        let (breakdown, _) = score(&e, &e, &config);
        assert!(breakdown.total_weighted_score > 0.99);
    }

    #[test]
    fn source_id_identity_short_circuits_to_one() {
        let mut query = Entity::from_query_name("Totally Different Name");
        query.source_id = Some("123".to_string());
        let mut candidate = Entity::from_query_name("Nicolas Maduro");
        candidate.source_id = Some("123".to_string());
        prepared(&mut query);
        prepared(&mut candidate);
        let config = ScoringConfig::default();
        let (breakdown, _) = score(&query, &candidate, &config);
        assert_eq!(breakdown.total_weighted_score, 1.0);
    }

    #[test]
    fn alt_name_dominates_when_primary_name_is_weak() {
        let mut query = Entity::from_query_name("El Chapo");
        let mut candidate = Entity::from_query_name("Joaquin Guzman Loera");
        candidate.alt_names = vec!["El Chapo".to_string()];
        prepared(&mut query);
        prepared(&mut candidate);
        let config = ScoringConfig::default();
        let (breakdown, pieces) = score(&query, &candidate, &config);
        let alt = pieces.iter().find(|p| p.kind == ScorePieceKind::AltName).unwrap();
        assert!(alt.score >= 0.99);
        assert!(breakdown.total_weighted_score >= 0.99);
    }

    #[test]
    fn exact_gov_id_overrides_weak_name() {
        let mut query = Entity::from_query_name("J Doe");
        query.government_ids.push(GovernmentId {
            country: Some("US".to_string()),
            id_type: "PASSPORT".to_string(),
            identifier: "AB 123-456".to_string(),
        });
        let mut candidate = Entity::from_query_name("John Michael Doe");
        candidate.government_ids.push(GovernmentId {
            country: Some("US".to_string()),
            id_type: "PASSPORT".to_string(),
            identifier: "AB123456".to_string(),
        });
        prepared(&mut query);
        prepared(&mut candidate);
        let config = ScoringConfig::default();
        let (breakdown, _) = score(&query, &candidate, &config);
        assert_eq!(breakdown.gov_id_score, 1.0);
        assert!(breakdown.total_weighted_score >= 0.70);
    }

    #[test]
    fn date_month_typo_scores_high() {
        let score = date_pair_score(Some("1990-01-15"), Some("1990-10-15")).unwrap();
        assert!(score > 0.85);
    }

    #[test]
    fn date_missing_side_is_none() {
        assert_eq!(date_pair_score(None, Some("1990-01-15")), None);
    }

    #[test]
    fn crypto_piece_is_case_sensitive() {
        let mut query = Entity::from_query_name("x");
        query.crypto_addresses.push(CryptoAddress {
            currency: "BTC".to_string(),
            address: "1ABC".to_string(),
        });
        let mut candidate = Entity::from_query_name("x");
        candidate.crypto_addresses.push(CryptoAddress {
            currency: "BTC".to_string(),
            address: "1abc".to_string(),
        });
        let config = ScoringConfig::default();
        let piece = crypto_piece(&query, &candidate, &config).unwrap();
        assert_eq!(piece.score, 0.0);
    }

    #[test]
    fn lifespan_inconsistency_penalizes_date_score() {
        let q = PersonDetail {
            date_of_birth: Some("1950-01-01".to_string()),
            date_of_death: Some("2020-01-01".to_string()),
            ..Default::default()
        };
        let c = PersonDetail {
            date_of_birth: Some("1950-01-01".to_string()),
            date_of_death: Some("1955-01-01".to_string()),
            ..Default::default()
        };
        assert!(!lifespan_is_consistent(
            q.date_of_birth.as_deref(),
            q.date_of_death.as_deref(),
            c.date_of_birth.as_deref(),
            c.date_of_death.as_deref()
        ));
    }

    #[test]
    fn source_list_piece_dilutes_cross_source_mismatch() {
        let mut query = Entity::from_query_name("x");
        query.source = Some(sentinel_core::EntitySource::OfacSdn);
        query.source_id = Some("111".to_string());
        let mut candidate = Entity::from_query_name("x");
        candidate.source = Some(sentinel_core::EntitySource::UsCsl);
        candidate.source_id = Some("222".to_string());
        let config = ScoringConfig::default();
        let piece = source_list_piece(&query, &candidate, &config).unwrap();
        assert_eq!(piece.score, 0.0);
        assert_eq!(piece.weight, config.weights.critical_id_weight);
    }
}
