//! String folding, tokenization, phonetic encoding, and word-combination
//! generation for name matching.

use sentinel_core::{Entity, PreparedFields};
use unicode_normalization::UnicodeNormalization;

/// Legal-entity suffixes stripped for business-type name comparison.
const COMPANY_SUFFIXES: &[&str] = &[
    "inc", "ltd", "llc", "corp", "co", "company", "gmbh", "sa", "plc", "llp", "lp",
];

/// A tiny, language-agnostic stopword set covering the languages most
/// common in sanctions-list names. Keyed by ISO 639-1 code; `None`/unknown
/// languages fall back to English.
fn stopwords_for(lang: Option<&str>) -> &'static [&'static str] {
    match lang {
        Some("es") => &["de", "la", "el", "los", "las", "y", "del"],
        Some("fr") => &["de", "la", "le", "les", "du", "et"],
        Some("ar") => &["al", "bin", "ibn"],
        _ => &["of", "the", "and"],
    }
}

/// Lowercase, strip diacritics (canonical decomposition + drop combining
/// marks), map a handful of special letters, collapse whitespace, drop
/// punctuation except hyphens.
pub fn fold(s: &str) -> String {
    let lowered = s.to_lowercase();
    let decomposed: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let mapped: String = decomposed
        .chars()
        .map(|c| match c {
            'ð' => 'd',
            'þ' => 't',
            'ß' => 's',
            'ø' => 'o',
            'æ' => 'a',
            'œ' => 'o',
            'ł' => 'l',
            _ => c,
        })
        .collect();

    let mut out = String::with_capacity(mapped.len());
    let mut last_was_space = true;
    for c in mapped.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else if c.is_alphanumeric() || c == '-' {
            out.push(c);
            last_was_space = false;
        }
        // all other punctuation dropped
    }
    out.trim().to_string()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

/// Idempotent: `fold(fold(s)) == fold(s)` since folded output is already
/// lowercase, diacritic-free, whitespace-collapsed ASCII-ish text.
pub fn tokenize(s: &str) -> Vec<String> {
    fold(s)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn strip_stopwords(tokens: &[String], lang: Option<&str>) -> Vec<String> {
    let stop = stopwords_for(lang);
    tokens
        .iter()
        .filter(|t| !stop.contains(&t.as_str()))
        .cloned()
        .collect()
}

pub fn strip_company_suffixes(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !COMPANY_SUFFIXES.contains(&t.as_str()))
        .cloned()
        .collect()
}

/// Generates word combinations by greedily merging adjacent tokens where
/// either side is <=3 characters, producing every variant. The original
/// joined form is always included. Merges apply only to contiguous short
/// tokens and preserve order of the remaining tokens.
pub fn combine(tokens: &[String]) -> Vec<String> {
    let mut variants = std::collections::BTreeSet::new();
    variants.insert(tokens.join(" "));

    if tokens.len() < 2 {
        return variants.into_iter().collect();
    }

    // Enumerate every subset of "mergeable" boundaries (a boundary between
    // token i and i+1 is mergeable if either token has length <= 3), then
    // render the merged form for each subset. This matches "every variant"
    // from contiguous short-token merges without exploding combinatorially
    // for realistic name lengths (a handful of tokens).
    let boundaries: Vec<bool> = (0..tokens.len() - 1)
        .map(|i| tokens[i].len() <= 3 || tokens[i + 1].len() <= 3)
        .collect();
    let mergeable_count = boundaries.iter().filter(|b| **b).count();
    if mergeable_count == 0 {
        return variants.into_iter().collect();
    }

    let combos = 1usize << mergeable_count;
    for mask in 0..combos {
        let mut merge_here = vec![false; tokens.len().saturating_sub(1)];
        let mut bit = 0;
        for (i, &mergeable) in boundaries.iter().enumerate() {
            if mergeable {
                merge_here[i] = (mask >> bit) & 1 == 1;
                bit += 1;
            }
        }

        let mut rendered = String::new();
        rendered.push_str(&tokens[0]);
        for i in 1..tokens.len() {
            if merge_here[i - 1] {
                rendered.push_str(&tokens[i]);
            } else {
                rendered.push(' ');
                rendered.push_str(&tokens[i]);
            }
        }
        variants.insert(rendered);
    }

    variants.into_iter().collect()
}

/// Classical Soundex: keep the first letter; map consonant groups to
/// digits; drop vowels and h/w/y; collapse consecutive duplicate codes;
/// pad with '0' to length 4.
pub fn soundex(word: &str) -> String {
    let folded = fold(word);
    let mut chars = folded.chars().filter(|c| c.is_alphabetic());
    let first = match chars.next() {
        Some(c) => c,
        None => return "0000".to_string(),
    };

    let mut code = String::new();
    code.push(first.to_ascii_uppercase());

    let mut last_digit = Some(soundex_digit(first));
    for c in chars {
        let digit = soundex_digit(c);
        if digit != '0' && Some(digit) != last_digit {
            code.push(digit);
        }
        if digit != '0' || !matches!(c, 'h' | 'w') {
            // h/w do not break a repeated-consonant run; everything else
            // (including vowels) resets it.
            last_digit = if matches!(c, 'h' | 'w') { last_digit } else { Some(digit) };
        }
        if code.len() == 4 {
            break;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code.truncate(4);
    code
}

fn soundex_digit(c: char) -> char {
    match c.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => '1',
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => '2',
        'd' | 't' => '3',
        'l' => '4',
        'm' | 'n' => '5',
        'r' => '6',
        _ => '0',
    }
}

const PHONETIC_EQUIVALENTS: &[(char, char)] =
    &[('c', 'k'), ('c', 's'), ('s', 'z'), ('f', 'p'), ('j', 'g')];

/// True if `a` and `b`'s first folded characters are equal, listed as
/// equivalents, or both digits.
pub fn phonetically_compatible(a: &str, b: &str) -> bool {
    let fa = fold(a);
    let fb = fold(b);
    let (ca, cb) = match (fa.chars().next(), fb.chars().next()) {
        (Some(ca), Some(cb)) => (ca, cb),
        _ => return false,
    };

    if ca == cb {
        return true;
    }
    if ca.is_ascii_digit() && cb.is_ascii_digit() {
        return true;
    }
    PHONETIC_EQUIVALENTS
        .iter()
        .any(|&(x, y)| (ca == x && cb == y) || (ca == y && cb == x))
}

/// Builds the cached `PreparedFields` for an entity's name, alt-names, and
/// addresses. `keep_stopwords` disables stopword stripping per the
/// similarity-config kill-switch.
pub fn prepare_fields(entity: &Entity, keep_stopwords: bool) -> PreparedFields {
    let lang = entity
        .addresses
        .first()
        .and_then(|a| a.country.as_deref())
        .and_then(language_for_country);

    let mut normalized_names = Vec::with_capacity(entity.alt_names.len() + 1);
    normalized_names.push(fold(&entity.name));
    normalized_names.extend(entity.alt_names.iter().map(|n| fold(n)));

    let mut without_stopwords = Vec::with_capacity(normalized_names.len());
    let mut without_company_titles = Vec::with_capacity(normalized_names.len());
    let mut word_combinations = Vec::new();

    for name in std::iter::once(&entity.name).chain(entity.alt_names.iter()) {
        let tokens = tokenize(name);
        let stripped = if keep_stopwords {
            tokens.clone()
        } else {
            strip_stopwords(&tokens, lang)
        };
        without_stopwords.push(stripped.join(" "));

        let no_suffixes = strip_company_suffixes(&tokens);
        without_company_titles.push(no_suffixes.join(" "));

        word_combinations.extend(combine(&tokens));
        if stripped != tokens {
            word_combinations.extend(combine(&stripped));
        }
    }
    word_combinations.sort();
    word_combinations.dedup();

    let normalized_addresses = entity
        .addresses
        .iter()
        .map(|a| fold(&a.formatted()))
        .collect();

    PreparedFields {
        normalized_names,
        normalized_names_without_stopwords: without_stopwords,
        normalized_names_without_company_titles: without_company_titles,
        word_combinations,
        normalized_addresses,
        detected_language: lang.map(str::to_string),
    }
}

fn language_for_country(country: &str) -> Option<&'static str> {
    match country.to_uppercase().as_str() {
        "ES" | "MX" | "CO" | "VE" | "AR" | "CU" => Some("es"),
        "FR" | "BE" => Some("fr"),
        "SY" | "IQ" | "SA" | "LY" | "SD" => Some("ar"),
        _ => None,
    }
}
