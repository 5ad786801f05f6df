//! Jaro-Winkler string similarity and token-set comparison built on top of
//! the normalizer's tokenization and phonetic primitives.

use sentinel_core::SimilarityConfig;

use crate::normalizer::{self, phonetically_compatible};

/// Jaro similarity with a Winkler prefix boost over up to `prefix_size`
/// leading matching characters.
pub fn jaro_winkler(a: &str, b: &str, prefix_size: usize) -> f64 {
    let jaro = jaro_similarity(a, b);
    if jaro <= 0.0 {
        return jaro;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_prefix = a_chars.len().min(b_chars.len()).min(prefix_size);
    let common_prefix = a_chars
        .iter()
        .zip(b_chars.iter())
        .take(max_prefix)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + (common_prefix as f64 * 0.1 * (1.0 - jaro))
}

fn jaro_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 && b_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let match_distance = (a_len.max(b_len) / 2).saturating_sub(1);
    let mut a_matches = vec![false; a_len];
    let mut b_matches = vec![false; b_len];
    let mut matches = 0usize;

    for i in 0..a_len {
        let lo = i.saturating_sub(match_distance);
        let hi = (i + match_distance + 1).min(b_len);
        for j in lo..hi {
            if b_matches[j] || a_chars[i] != b_chars[j] {
                continue;
            }
            a_matches[i] = true;
            b_matches[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0;
    for i in 0..a_len {
        if !a_matches[i] {
            continue;
        }
        while !b_matches[k] {
            k += 1;
        }
        if a_chars[i] != b_chars[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - (transpositions as f64 / 2.0)) / m) / 3.0
}

/// Options threading similarity-config tunables into `token_set_score`.
#[derive(Debug, Clone, Copy)]
pub struct TokenSetOptions {
    pub phonetic_filter: bool,
    pub prefix_size: usize,
    pub length_difference_cutoff_factor: f64,
    pub length_difference_penalty_weight: f64,
    pub unmatched_index_token_weight: f64,
}

impl From<&SimilarityConfig> for TokenSetOptions {
    fn from(c: &SimilarityConfig) -> Self {
        Self {
            phonetic_filter: !c.phonetic_filtering_disabled,
            prefix_size: c.jaro_winkler_prefix_size,
            length_difference_cutoff_factor: c.length_difference_cutoff_factor,
            length_difference_penalty_weight: c.length_difference_penalty_weight,
            unmatched_index_token_weight: c.unmatched_index_token_weight,
        }
    }
}

/// Best-pair token-set comparison: greedily assigns each query token to an
/// unused candidate token maximizing total Jaro-Winkler score, then applies
/// the length-difference gate/penalty and unmatched-candidate-token penalty.
pub fn token_set_score(q_tokens: &[String], c_tokens: &[String], opts: TokenSetOptions) -> f64 {
    if q_tokens.is_empty() || c_tokens.is_empty() {
        return 0.0;
    }

    if opts.phonetic_filter
        && !phonetically_compatible(&q_tokens[0], &c_tokens[0])
    {
        return 0.0;
    }

    // Score every (qi, cj) pair, then greedily assign highest-scoring pairs
    // first, each token used at most once.
    let mut pairs: Vec<(usize, usize, f64)> = Vec::with_capacity(q_tokens.len() * c_tokens.len());
    for (i, q) in q_tokens.iter().enumerate() {
        for (j, c) in c_tokens.iter().enumerate() {
            pairs.push((i, j, jaro_winkler(q, c, opts.prefix_size)));
        }
    }
    pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap());

    let mut q_used = vec![false; q_tokens.len()];
    let mut c_used = vec![false; c_tokens.len()];
    let mut total = 0.0;
    let mut assigned = 0usize;

    for (i, j, score) in pairs {
        if q_used[i] || c_used[j] {
            continue;
        }
        q_used[i] = true;
        c_used[j] = true;
        assigned += 1;

        // Length-difference gate: clamp the pair's contribution when the
        // shorter token is disproportionately shorter than the longer one.
        let (la, lb) = (q_tokens[i].len(), c_tokens[j].len());
        let ratio = la.min(lb) as f64 / la.max(lb).max(1) as f64;
        let contribution = if ratio < opts.length_difference_cutoff_factor {
            score * ratio
        } else {
            score
        };
        total += contribution;
    }

    if assigned == 0 {
        return 0.0;
    }

    let mut result = total / q_tokens.len() as f64;

    // Length-difference penalty: overall token-count mismatch between query
    // and candidate.
    let len_ratio = q_tokens.len().min(c_tokens.len()) as f64
        / q_tokens.len().max(c_tokens.len()) as f64;
    result -= (1.0 - len_ratio) * opts.length_difference_penalty_weight;

    // Unmatched-candidate-token penalty: each candidate token that wasn't
    // assigned to any query token dilutes the score.
    let unmatched_candidate_tokens = c_used.iter().filter(|used| !**used).count();
    result -= unmatched_candidate_tokens as f64 * opts.unmatched_index_token_weight;

    result.clamp(0.0, 1.0)
}

/// Tries every word-combination variant of the candidate's prepared fields
/// against the query's tokens and returns the maximum token-set score.
pub fn best_name_score(
    query_tokens: &[String],
    candidate_variants: &[String],
    opts: TokenSetOptions,
) -> f64 {
    candidate_variants
        .iter()
        .map(|variant| {
            let candidate_tokens = normalizer::tokenize(variant);
            token_set_score(query_tokens, &candidate_tokens, opts)
        })
        .fold(0.0_f64, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_opts() -> TokenSetOptions {
        TokenSetOptions::from(&SimilarityConfig::default())
    }

    #[test]
    fn jaro_winkler_identical_strings_is_one() {
        assert!((jaro_winkler("maduro", "maduro", 4) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn jaro_winkler_empty_strings_is_one() {
        assert!((jaro_winkler("", "", 4) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn jaro_winkler_completely_different_is_low() {
        assert!(jaro_winkler("abc", "xyz", 4) < 0.1);
    }

    #[test]
    fn jaro_winkler_prefix_boost_favors_shared_prefix() {
        let with_prefix = jaro_winkler("martha", "marhta", 4);
        let jaro_only = jaro_similarity("martha", "marhta");
        assert!(with_prefix >= jaro_only);
    }

    #[test]
    fn token_set_score_identical_token_sets_is_one() {
        let tokens = vec!["nicolas".to_string(), "maduro".to_string()];
        let score = token_set_score(&tokens, &tokens, default_opts());
        assert!(score > 0.99);
    }

    #[test]
    fn token_set_score_empty_inputs_is_zero() {
        assert_eq!(token_set_score(&[], &["x".to_string()], default_opts()), 0.0);
        assert_eq!(token_set_score(&["x".to_string()], &[], default_opts()), 0.0);
    }

    #[test]
    fn token_set_score_phonetic_filter_culls_incompatible_leading_tokens() {
        let q = vec!["smith".to_string()];
        let c = vec!["jones".to_string()];
        let opts = default_opts();
        assert_eq!(token_set_score(&q, &c, opts), 0.0);
    }

    #[test]
    fn token_set_score_phonetic_filter_disabled_allows_nonzero_score() {
        let q = vec!["smith".to_string()];
        let c = vec!["jones".to_string()];
        let mut opts = default_opts();
        opts.phonetic_filter = false;
        let score = token_set_score(&q, &c, opts);
        assert!(score >= 0.0);
    }

    #[test]
    fn token_set_score_is_word_order_independent() {
        let q = vec!["jean".to_string(), "cruz".to_string()];
        let c = vec!["cruz".to_string(), "jean".to_string()];
        let opts = default_opts();
        let score = token_set_score(&q, &c, opts);
        assert!(score > 0.9);
    }

    #[test]
    fn token_set_score_penalizes_extra_unmatched_candidate_tokens() {
        let q = vec!["nicolas".to_string(), "maduro".to_string()];
        let c_exact = q.clone();
        let mut c_extra = q.clone();
        c_extra.push("moros".to_string());

        let opts = default_opts();
        let exact = token_set_score(&q, &c_exact, opts);
        let extra = token_set_score(&q, &c_extra, opts);
        assert!(extra < exact);
    }

    #[test]
    fn best_name_score_takes_max_over_variants() {
        let query_tokens = normalizer::tokenize("el chapo");
        let variants = vec!["joaquin guzman loera".to_string(), "el chapo".to_string()];
        let score = best_name_score(&query_tokens, &variants, default_opts());
        assert!(score > 0.99);
    }
}
