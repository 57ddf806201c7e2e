//! Edit distance algorithms.
//!
//! All functions work on Unicode scalar values, so `"café"` has length 4.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a Damerau-Levenshtein computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditResult {
    /// Minimum number of edits (insert, delete, substitute, adjacent swap)
    pub distance: usize,
    /// Number of table cells where an adjacent transposition was possible
    pub transpositions: usize,
}

/// Calculate Levenshtein edit distance between two strings.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Use two rows for space optimization
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate Damerau-Levenshtein (optimal string alignment) distance.
///
/// Adjacent transpositions cost one edit, on top of the usual insert,
/// delete and substitute operations.
///
/// The `transpositions` counter is incremented every time the swap
/// condition holds while filling the table, even when the swap does not end
/// up on the cheapest path. It can therefore exceed the number of swaps in
/// the optimal edit script. Callers use it for diagnostics only.
///
/// # Example
/// ```
/// use learnhub_search::damerau_levenshtein;
///
/// let result = damerau_levenshtein("pyhton", "python");
/// assert_eq!(result.distance, 1);
/// assert_eq!(result.transpositions, 1);
/// ```
pub fn damerau_levenshtein(a: &str, b: &str) -> EditResult {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    // Full matrix needed for transposition
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    let mut transpositions = 0;

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + cost)
                .min(dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1);

            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                dp[i][j] = dp[i][j].min(dp[i - 2][j - 2] + 1);
                transpositions += 1;
            }
        }
    }

    EditResult {
        distance: dp[m][n],
        transpositions,
    }
}

/// Damerau-Levenshtein distance without the transposition diagnostics.
#[inline]
pub fn damerau_levenshtein_distance(a: &str, b: &str) -> usize {
    damerau_levenshtein(a, b).distance
}

/// Unrestricted Damerau-Levenshtein distance.
///
/// Unlike [`damerau_levenshtein`], characters may be edited between the two
/// halves of a transposition, so `"ca"` to `"abc"` costs 2 instead of 3. This
/// variant satisfies the triangle inequality and is what the BK-tree is keyed
/// by.
///
/// # Example
/// ```
/// use learnhub_search::unrestricted_damerau_levenshtein;
///
/// assert_eq!(unrestricted_damerau_levenshtein("ca", "abc"), 2);
/// assert_eq!(unrestricted_damerau_levenshtein("pyhton", "python"), 1);
/// ```
pub fn unrestricted_damerau_levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Row and column 0 hold a sentinel larger than any real distance
    let sentinel = m + n;
    let mut dp = vec![vec![0usize; n + 2]; m + 2];
    dp[0][0] = sentinel;
    for i in 0..=m {
        dp[i + 1][0] = sentinel;
        dp[i + 1][1] = i;
    }
    for j in 0..=n {
        dp[0][j + 1] = sentinel;
        dp[1][j + 1] = j;
    }

    // Last row in `a` where each character was seen
    let mut last_row: HashMap<char, usize> = HashMap::new();

    for i in 1..=m {
        let mut last_match_col = 0;
        for j in 1..=n {
            let k = last_row.get(&b_chars[j - 1]).copied().unwrap_or(0);
            let l = last_match_col;
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            dp[i + 1][j + 1] = (dp[i][j] + cost)
                .min(dp[i + 1][j] + 1)
                .min(dp[i][j + 1] + 1)
                .min(dp[k][l] + (i - k - 1) + 1 + (j - l - 1));
        }
        last_row.insert(a_chars[i - 1], i);
    }

    dp[m + 1][n + 1]
}
