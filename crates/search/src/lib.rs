//! Fuzzy catalog search for LearnHub.
//!
//! This crate provides:
//! - Levenshtein and Damerau-Levenshtein edit distance
//! - 0–100 similarity scoring for words and phrases
//! - A BK-tree index for radius-bounded lookup
//! - A hybrid exact + fuzzy ranking and pagination pipeline
//!
//! # Example
//!
//! ```
//! use learnhub_search::{search, Catalog, PageRequest, SearchCriteria, SearchOptions, SearchableText};
//!
//! let catalog = Catalog {
//!     courses: Some(vec![SearchableText::new(1, "Machine Learning")]),
//!     ..Catalog::default()
//! };
//!
//! let result = search(
//!     &SearchCriteria::course("machine lerning"),
//!     PageRequest::default(),
//!     &catalog,
//!     &SearchOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.scored_courses.len(), 1);
//! assert!(result.scored_courses[0].score > 80.0);
//! ```

pub mod bktree;
mod distance;
mod error;
mod model;
pub mod pipeline;
pub mod score;

pub use bktree::{BkTree, DamerauLevenshtein, Levenshtein, Metric};
pub use distance::{
    damerau_levenshtein, damerau_levenshtein_distance, levenshtein, unrestricted_damerau_levenshtein,
    EditResult,
};
pub use error::{Result, SearchError, SearchErrorCode};
pub use model::{
    Catalog, Identified, PageRequest, ScoredItem, SearchCriteria, SearchResult, SearchableText,
};
pub use pipeline::{
    search, search_field, search_users, Field, SearchOptions, CATEGORY_THRESHOLD,
    COURSE_THRESHOLD, FUZZY_CANDIDATE_CAP, TOPIC_THRESHOLD, USER_THRESHOLD,
};
pub use score::{phrase_score, text_score, word_set_score, word_similarity};
