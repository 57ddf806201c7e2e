//! Similarity scoring on a 0–100 scale.
//!
//! Scores are derived from edit distance normalized by the longer input.
//! Multi-word inputs blend a whole-phrase distance with a greedy word-set
//! match so that reordered or partially typed titles still rank well.

use crate::distance::damerau_levenshtein_distance;

/// Score of an exact match.
pub const EXACT_SCORE: f64 = 100.0;

/// Ceiling for substring containment, kept below an exact match.
pub const CONTAINMENT_SCORE: f64 = 95.0;

/// Weight of the whole-phrase distance in [`phrase_score`].
pub const PHRASE_WEIGHT: f64 = 0.4;

/// Weight of the word-set match in [`phrase_score`].
pub const WORD_SET_WEIGHT: f64 = 0.6;

/// Convert an edit distance into a similarity percentage.
///
/// Two empty strings are identical, so `max_len == 0` yields 100.
///
/// # Example
/// ```
/// use learnhub_search::score::normalize;
///
/// assert_eq!(normalize(0, 6), 100.0);
/// assert!((normalize(1, 6) - 83.333).abs() < 0.01);
/// ```
pub fn normalize(distance: usize, max_len: usize) -> f64 {
    if max_len == 0 {
        return EXACT_SCORE;
    }
    (1.0 - distance as f64 / max_len as f64) * 100.0
}

/// Similarity between two single words.
///
/// Exact matches score 100, containment in either direction scores
/// proportionally to the length ratio (at most 95), anything else falls back
/// to normalized Damerau-Levenshtein distance.
pub fn word_similarity(word1: &str, word2: &str) -> f64 {
    if word1 == word2 {
        return EXACT_SCORE;
    }

    let len1 = word1.chars().count();
    let len2 = word2.chars().count();
    let max_len = len1.max(len2);

    if word1.contains(word2) || word2.contains(word1) {
        let min_len = len1.min(len2);
        return (min_len as f64 / max_len as f64) * CONTAINMENT_SCORE;
    }

    normalize(damerau_levenshtein_distance(word1, word2), max_len)
}

/// Average best-match score of each search word against the candidate words.
///
/// Matching is greedy in search-word order: each search word takes the best
/// still-unclaimed candidate (stopping early on an exact hit) and that
/// candidate is then unavailable to later words. Search words left without a
/// candidate contribute zero.
pub fn word_set_score<S: AsRef<str>, Q: AsRef<str>>(correct_words: &[S], search_words: &[Q]) -> f64 {
    if correct_words.is_empty() || search_words.is_empty() {
        return 0.0;
    }

    let mut claimed = vec![false; correct_words.len()];
    let mut total = 0.0;

    for search_word in search_words {
        let search_word = search_word.as_ref();
        let mut best: Option<(usize, f64)> = None;

        for (idx, candidate) in correct_words.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let candidate = candidate.as_ref();
            if candidate == search_word {
                best = Some((idx, EXACT_SCORE));
                break;
            }
            let similarity = word_similarity(candidate, search_word);
            if best.is_none_or(|(_, score)| similarity > score) {
                best = Some((idx, similarity));
            }
        }

        if let Some((idx, score)) = best {
            claimed[idx] = true;
            total += score;
        }
    }

    total / search_words.len() as f64
}

/// Similarity between a candidate phrase and a search phrase.
///
/// Both sides are compared lowercased. Identical phrases score 100, two
/// single words use [`word_similarity`], and anything longer blends the
/// whole-phrase distance (40%) with [`word_set_score`] (60%).
pub fn phrase_score<S: AsRef<str>, Q: AsRef<str>>(correct_words: &[S], search_words: &[Q]) -> f64 {
    if correct_words.is_empty() || search_words.is_empty() {
        return 0.0;
    }

    let correct: Vec<String> = correct_words.iter().map(|w| w.as_ref().to_lowercase()).collect();
    let search: Vec<String> = search_words.iter().map(|w| w.as_ref().to_lowercase()).collect();

    let correct_phrase = correct.join(" ");
    let search_phrase = search.join(" ");

    if correct_phrase == search_phrase {
        return EXACT_SCORE;
    }

    if correct.len() == 1 && search.len() == 1 {
        return word_similarity(&correct[0], &search[0]);
    }

    let max_len = correct_phrase.chars().count().max(search_phrase.chars().count());
    let phrase = normalize(damerau_levenshtein_distance(&correct_phrase, &search_phrase), max_len);
    let words = word_set_score(&correct, &search);

    PHRASE_WEIGHT * phrase + WORD_SET_WEIGHT * words
}

/// Split text into lowercase words on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Canonical form used for indexing and exact comparison: trimmed,
/// lowercased, runs of whitespace collapsed to one space.
pub fn canonical_text(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Phrase score of a candidate text against a raw query string.
#[inline]
pub fn text_score(candidate: &str, query: &str) -> f64 {
    phrase_score(&tokenize(candidate), &tokenize(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-6
    }

    #[test]
    fn test_normalize_zero_distance() {
        assert_eq!(normalize(0, 5), 100.0);
    }

    #[test]
    fn test_normalize_empty_strings() {
        assert_eq!(normalize(0, 0), 100.0);
    }

    #[test]
    fn test_normalize_full_distance() {
        assert_eq!(normalize(4, 4), 0.0);
    }

    #[test]
    fn test_word_similarity_exact() {
        assert_eq!(word_similarity("rust", "rust"), 100.0);
    }

    #[test]
    fn test_word_similarity_containment() {
        // 4/10 * 95
        assert!(approx(word_similarity("javascript", "java"), 38.0));
        assert!(approx(word_similarity("java", "javascript"), 38.0));
    }

    #[test]
    fn test_word_similarity_typo() {
        assert!(approx(word_similarity("python", "pythn"), 500.0 / 6.0));
    }

    #[test]
    fn test_word_similarity_case_sensitive() {
        assert!(word_similarity("Rust", "rust") < 100.0);
    }

    #[test]
    fn test_word_set_exact() {
        assert_eq!(word_set_score(&["hello", "world"], &["world", "hello"]), 100.0);
    }

    #[test]
    fn test_word_set_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(word_set_score(&empty, &["a"]), 0.0);
        assert_eq!(word_set_score(&["a"], &empty), 0.0);
    }

    #[test]
    fn test_word_set_consumes_candidates() {
        // Second "data" has nothing left to match
        let score = word_set_score(&["data"], &["data", "data"]);
        assert_eq!(score, 50.0);
    }

    #[test]
    fn test_word_set_greedy_not_optimal() {
        // "ab" grabs "abc" first, leaving "abx" (66.7) for "abc"; the optimal
        // assignment would give (63.3 + 100) / 2.
        let greedy = word_set_score(&["abc", "abx"], &["ab", "abc"]);
        assert!(approx(greedy, (2.0 / 3.0 * 95.0 + 200.0 / 3.0) / 2.0));
    }

    #[test]
    fn test_phrase_exact_match() {
        assert_eq!(phrase_score(&["hello", "world"], &["hello", "world"]), 100.0);
    }

    #[test]
    fn test_phrase_case_insensitive() {
        assert_eq!(phrase_score(&["Hello", "World"], &["hello", "WORLD"]), 100.0);
    }

    #[test]
    fn test_phrase_single_words_bypass_blend() {
        assert!(approx(phrase_score(&["Python"], &["Pythn"]), 500.0 / 6.0));
    }

    #[test]
    fn test_phrase_blend() {
        // phrase: "rust basics" vs "rust basic" -> 1 edit over 11 chars
        // words: rust=100, basic in basics = 5/6*95
        let score = phrase_score(&["rust", "basics"], &["rust", "basic"]);
        let expected = 0.4 * (1.0 - 1.0 / 11.0) * 100.0 + 0.6 * (100.0 + 5.0 / 6.0 * 95.0) / 2.0;
        assert!(approx(score, expected));
    }

    #[test]
    fn test_phrase_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(phrase_score(&empty, &["x"]), 0.0);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Intro to\tRust "), vec!["intro", "to", "rust"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(canonical_text("  Deep   LEARNING "), "deep learning");
        assert_eq!(canonical_text(""), "");
    }

    #[test]
    fn test_text_score() {
        assert_eq!(text_score("Machine Learning", "machine learning"), 100.0);
        assert_eq!(text_score("Machine Learning", ""), 0.0);
    }

    proptest! {
        #[test]
        fn prop_normalize_bounded(max_len in 1usize..64, frac in 0.0f64..=1.0) {
            let distance = (frac * max_len as f64) as usize;
            let score = normalize(distance, max_len);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_normalize_monotonic(max_len in 1usize..64, d in 0usize..63) {
            prop_assume!(d < max_len);
            prop_assert!(normalize(d + 1, max_len) <= normalize(d, max_len));
        }

        #[test]
        fn prop_phrase_score_bounded(a in "[a-c ]{0,12}", b in "[a-c ]{0,12}") {
            let score = text_score(&a, &b);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
