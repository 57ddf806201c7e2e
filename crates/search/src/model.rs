//! Records, criteria and result types exchanged with the search pipeline.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// Anything with a stable integer identity.
pub trait Identified {
    /// Identity used to de-duplicate matches.
    fn id(&self) -> i64;
}

/// One searchable field of a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableText {
    /// Record ID
    pub id: i64,
    /// Extracted text (course name, category name, topic name, ...)
    pub text: String,
}

impl SearchableText {
    /// Creates a new record.
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

impl Identified for SearchableText {
    #[inline]
    fn id(&self) -> i64 {
        self.id
    }
}

/// A matched item with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<T> {
    /// The matched item
    pub item: T,
    /// Similarity score in [0, 100] (higher is better)
    pub score: f64,
}

impl<T> ScoredItem<T> {
    /// Pairs an item with its score.
    pub fn new(item: T, score: f64) -> Self {
        Self { item, score }
    }
}

/// Free-text criteria, one per searchable field. Blank fields match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Course name query
    #[serde(default)]
    pub course_name: Option<String>,
    /// Category name query
    #[serde(default)]
    pub category_name: Option<String>,
    /// Topic name query
    #[serde(default)]
    pub topic_name: Option<String>,
}

impl SearchCriteria {
    /// Criteria with only a course name.
    pub fn course(name: impl Into<String>) -> Self {
        Self {
            course_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Snapshot of the searchable catalog.
///
/// A list that is `None` was never loaded; searching that field with a real
/// query is an error. `Some(vec![])` is a valid, empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Course names
    #[serde(default)]
    pub courses: Option<Vec<SearchableText>>,
    /// Category names
    #[serde(default)]
    pub categories: Option<Vec<SearchableText>>,
    /// Topic names
    #[serde(default)]
    pub topics: Option<Vec<SearchableText>>,
}

/// Zero-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index, starting at 0
    pub page: usize,
    /// Items per page, at least 1
    pub size: usize,
}

impl PageRequest {
    /// Default number of items per page.
    pub const DEFAULT_SIZE: usize = 10;

    /// Creates a page request.
    #[inline]
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Rejects a zero page size.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SearchError::InvalidPageSize);
        }
        Ok(())
    }

    /// Index of the first item on this page.
    #[inline]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// Ranked results for every field of a [`SearchCriteria`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching courses, best first
    pub scored_courses: Vec<ScoredItem<SearchableText>>,
    /// Matching categories, best first
    pub scored_categories: Vec<ScoredItem<SearchableText>>,
    /// Matching topics, best first
    pub scored_topics: Vec<ScoredItem<SearchableText>>,
    /// Page applied to each list
    pub page: PageRequest,
}

impl SearchResult {
    /// Total number of items across all lists.
    pub fn total(&self) -> usize {
        self.scored_courses.len() + self.scored_categories.len() + self.scored_topics.len()
    }

    /// Returns true if no field matched.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
