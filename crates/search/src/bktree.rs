//! BK-tree index for radius-bounded string lookup.
//!
//! Every child edge is labelled with its distance to the parent word. When
//! searching with radius `r` from a node at distance `d` to the query, only
//! children labelled within `[d - r, d + r]` can hold matches, so the rest of
//! the tree is skipped.
//!
//! # Example
//!
//! ```
//! use learnhub_search::BkTree;
//!
//! let mut tree = BkTree::new();
//! for word in ["python", "java", "rust", "pascal"] {
//!     tree.insert(word);
//! }
//!
//! assert_eq!(tree.range_search("pythn", 1), vec!["python".to_string()]);
//! ```

use crate::distance::{levenshtein, unrestricted_damerau_levenshtein};
use crate::error::{Result, SearchError};
use crate::score::canonical_text;
use std::collections::{btree_map::Entry, BTreeMap, HashSet};

/// Integer distance used to arrange words in a [`BkTree`].
pub trait Metric: Send + Sync {
    /// Distance between two strings. Must be zero only for equal strings
    /// and satisfy the triangle inequality, or range searches miss words.
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Name of the metric for logging
    fn name(&self) -> &'static str;
}

/// Unrestricted Damerau-Levenshtein distance, the metric used for catalog
/// search.
///
/// Scoring uses the restricted variant, which breaks the triangle inequality
/// and so cannot key the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DamerauLevenshtein;

impl Metric for DamerauLevenshtein {
    #[inline]
    fn distance(&self, a: &str, b: &str) -> usize {
        unrestricted_damerau_levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "damerau-levenshtein"
    }
}

/// Plain Levenshtein distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Metric for Levenshtein {
    #[inline]
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

#[derive(Debug, Clone)]
struct Node {
    word: String,
    children: BTreeMap<usize, Node>,
}

impl Node {
    fn leaf(word: String) -> Self {
        Self {
            word,
            children: BTreeMap::new(),
        }
    }
}

/// Metric tree over a set of distinct words.
#[derive(Debug, Clone)]
pub struct BkTree<M = DamerauLevenshtein> {
    root: Option<Node>,
    metric: M,
    len: usize,
    longest: usize,
}

impl BkTree<DamerauLevenshtein> {
    /// Create an empty tree using Damerau-Levenshtein distance.
    pub fn new() -> Self {
        Self::with_metric(DamerauLevenshtein)
    }

    /// Build a tree over the text of catalog records.
    ///
    /// Texts are indexed in canonical form (trimmed, lowercased, single
    /// spaces) and blank texts are skipped. `None` means the record list was
    /// never supplied, which is an error; an empty slice yields an empty tree.
    pub fn from_records<T, F>(records: Option<&[T]>, extract: F) -> Result<Self>
    where
        F: Fn(&T) -> &str,
    {
        let records = records.ok_or_else(|| {
            SearchError::InvalidIndexInput("record list is absent".to_string())
        })?;

        let mut tree = Self::new();
        for record in records {
            let text = canonical_text(extract(record));
            if !text.is_empty() {
                tree.insert(text);
            }
        }

        tracing::trace!(
            records = records.len(),
            words = tree.len(),
            "BK-tree initialized"
        );

        Ok(tree)
    }
}

impl Default for BkTree<DamerauLevenshtein> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Metric> BkTree<M> {
    /// Create an empty tree with a custom metric.
    pub fn with_metric(metric: M) -> Self {
        Self {
            root: None,
            metric,
            len: 0,
            longest: 0,
        }
    }

    /// Number of distinct words in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no word has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Name of the metric this tree is keyed by.
    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    /// Add a word. Returns false if it was already present.
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        let word = word.into();
        let word_len = word.chars().count();

        let Some(mut node) = self.root.as_mut() else {
            self.root = Some(Node::leaf(word));
            self.len = 1;
            self.longest = word_len;
            return true;
        };

        loop {
            let d = self.metric.distance(&node.word, &word);
            if d == 0 {
                return false;
            }
            match node.children.entry(d) {
                Entry::Occupied(entry) => node = entry.into_mut(),
                Entry::Vacant(entry) => {
                    entry.insert(Node::leaf(word));
                    break;
                }
            }
        }

        self.len += 1;
        self.longest = self.longest.max(word_len);
        true
    }

    /// Returns true if the exact word is indexed.
    pub fn contains(&self, word: &str) -> bool {
        !self.range_search(word, 0).is_empty()
    }

    /// All indexed words within `radius` of `query`.
    pub fn range_search(&self, query: &str, radius: usize) -> Vec<String> {
        let mut results = Vec::new();
        let Some(root) = self.root.as_ref() else {
            return results;
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let d = self.metric.distance(&node.word, query);
            if d <= radius {
                results.push(node.word.clone());
            }

            let low = d.saturating_sub(radius);
            let high = d.saturating_add(radius);
            stack.extend(node.children.range(low..=high).map(|(_, child)| child));
        }

        results
    }

    /// Collect up to `target` words, nearest distance rings first.
    ///
    /// The radius grows from zero until enough words are found or it covers
    /// every possible distance (the longer of the query and the longest
    /// indexed word). Words inside one ring keep traversal order.
    pub fn hybrid_search(&self, query: &str, target: usize) -> Vec<String> {
        let mut results = Vec::new();
        if target == 0 || self.is_empty() {
            return results;
        }

        let max_radius = self.longest.max(query.chars().count());
        let mut seen = HashSet::new();

        for radius in 0..=max_radius {
            for word in self.range_search(query, radius) {
                if seen.insert(word.clone()) {
                    results.push(word);
                }
            }
            if results.len() >= target {
                tracing::trace!(radius, found = results.len(), "hybrid search reached target");
                break;
            }
        }

        results.truncate(target);
        results
    }

    /// Every indexed word in traversal order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            words.push(node.word.clone());
            stack.extend(node.children.values());
        }
        words
    }
}

impl<S: Into<String>> FromIterator<S> for BkTree<DamerauLevenshtein> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = Self::new();
        for word in iter {
            tree.insert(word);
        }
        tree
    }
}
