//! Hybrid exact + fuzzy search over catalog fields.
//!
//! Each field is searched independently:
//!
//! 1. records whose canonical text equals the canonical query score 100;
//! 2. if that fills less than one page, a BK-tree built from the same
//!    records proposes up to `candidate_cap` nearby texts, which are scored
//!    with [`text_score`](crate::score::text_score) and kept above the
//!    field's threshold;
//! 3. matches are de-duplicated by ID, sorted by score and paginated.
//!
//! Nothing is cached between calls; every call indexes the snapshot it is
//! given.

use crate::bktree::BkTree;
use crate::error::{Result, SearchError};
use crate::model::{
    Catalog, Identified, PageRequest, ScoredItem, SearchCriteria, SearchResult, SearchableText,
};
use crate::score::{canonical_text, text_score, EXACT_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Minimum score for fuzzy course matches.
pub const COURSE_THRESHOLD: f64 = 20.0;
/// Minimum score for fuzzy category matches.
pub const CATEGORY_THRESHOLD: f64 = 30.0;
/// Minimum score for fuzzy topic matches.
pub const TOPIC_THRESHOLD: f64 = 40.0;
/// Minimum score for fuzzy user matches.
pub const USER_THRESHOLD: f64 = 40.0;
/// Candidates requested from the BK-tree per query.
pub const FUZZY_CANDIDATE_CAP: usize = 30;

/// Tunables for the pipeline. Defaults are the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Threshold for course names
    pub course_threshold: f64,
    /// Threshold for category names
    pub category_threshold: f64,
    /// Threshold for topic names
    pub topic_threshold: f64,
    /// Threshold for user display names
    pub user_threshold: f64,
    /// Fuzzy candidates fetched per query
    pub candidate_cap: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            course_threshold: COURSE_THRESHOLD,
            category_threshold: CATEGORY_THRESHOLD,
            topic_threshold: TOPIC_THRESHOLD,
            user_threshold: USER_THRESHOLD,
            candidate_cap: FUZZY_CANDIDATE_CAP,
        }
    }
}

/// Searchable catalog fields.
///
/// Shorter texts tolerate fewer edits per character, so fields with shorter
/// typical values carry higher thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Course name
    Course,
    /// Category name
    Category,
    /// Topic name
    Topic,
    /// User display name
    User,
}

impl Field {
    /// Field name for logging and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Field::Course => "course",
            Field::Category => "category",
            Field::Topic => "topic",
            Field::User => "user",
        }
    }

    /// Minimum fuzzy score for this field.
    pub fn threshold(self, options: &SearchOptions) -> f64 {
        match self {
            Field::Course => options.course_threshold,
            Field::Category => options.category_threshold,
            Field::Topic => options.topic_threshold,
            Field::User => options.user_threshold,
        }
    }
}

/// Search one field of a record list.
///
/// # Arguments
/// * `field` - Which field is searched (selects the threshold)
/// * `records` - Record snapshot; `None` if it was never loaded
/// * `query` - Free-text query; blank or `None` matches nothing
/// * `extract` - Pulls the searchable text out of a record
/// * `page` - Page to return
/// * `options` - Thresholds and candidate cap
///
/// # Returns
/// The requested page of matches, best first.
///
/// # Errors
/// [`SearchError::InvalidPageSize`] for a zero page size and
/// [`SearchError::InvalidIndexInput`] when `records` is `None` but the query
/// is not blank.
pub fn search_field<T, F>(
    field: Field,
    records: Option<&[T]>,
    query: Option<&str>,
    extract: F,
    page: PageRequest,
    options: &SearchOptions,
) -> Result<Vec<ScoredItem<T>>>
where
    T: Identified + Clone,
    F: Fn(&T) -> &str,
{
    page.validate()?;

    let query = query.map(canonical_text).unwrap_or_default();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let records = records.ok_or_else(|| {
        SearchError::InvalidIndexInput(format!("{} list is absent", field.name()))
    })?;
    let texts: Vec<String> = records.iter().map(|r| canonical_text(extract(r))).collect();

    let tree = BkTree::from_records(Some(texts.as_slice()), String::as_str)?;
    if tree.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    let mut added = HashSet::new();

    for (record, text) in records.iter().zip(&texts) {
        if *text == query && added.insert(record.id()) {
            matches.push(ScoredItem::new(record.clone(), EXACT_SCORE));
        }
    }
    let exact = matches.len();

    if exact < page.size {
        let threshold = field.threshold(options);

        let mut by_text: HashMap<&str, Vec<&T>> = HashMap::new();
        for (record, text) in records.iter().zip(&texts) {
            by_text.entry(text.as_str()).or_default().push(record);
        }

        for candidate in tree.hybrid_search(&query, options.candidate_cap) {
            let Some(owners) = by_text.get(candidate.as_str()) else {
                continue;
            };

            let score = text_score(&candidate, &query);
            tracing::trace!(field = field.name(), candidate = %candidate, score, "fuzzy candidate");
            if score < threshold {
                continue;
            }

            for record in owners {
                if added.insert(record.id()) {
                    matches.push(ScoredItem::new((*record).clone(), score));
                }
            }
        }
    }

    let total = matches.len();
    sort_by_score(&mut matches);
    let page_items = paginate(matches, page);

    tracing::debug!(
        field = field.name(),
        query = %query,
        exact,
        fuzzy = total - exact,
        returned = page_items.len(),
        "field searched"
    );

    Ok(page_items)
}

/// Sort best first. The sort is stable, so equal scores keep insertion
/// order: exact matches in catalog order, then fuzzy matches nearest first.
pub fn sort_by_score<T>(items: &mut [ScoredItem<T>]) {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Cut one page out of a ranked list. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    let total = items.len();
    let start = page.offset();
    if start >= total {
        return Vec::new();
    }
    let end = start.saturating_add(page.size).min(total);

    items.into_iter().skip(start).take(end - start).collect()
}

/// Search courses, categories and topics in one call.
///
/// Each field is scored, thresholded and paginated on its own; the same
/// page applies to all three lists.
///
/// # Example
/// ```
/// use learnhub_search::{search, Catalog, PageRequest, SearchCriteria, SearchOptions, SearchableText};
///
/// let catalog = Catalog {
///     courses: Some(vec![
///         SearchableText::new(1, "Python"),
///         SearchableText::new(2, "Rust"),
///     ]),
///     ..Catalog::default()
/// };
///
/// let result = search(
///     &SearchCriteria::course("Pythn"),
///     PageRequest::new(0, 5),
///     &catalog,
///     &SearchOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.scored_courses[0].item.id, 1);
/// ```
pub fn search(
    criteria: &SearchCriteria,
    page: PageRequest,
    catalog: &Catalog,
    options: &SearchOptions,
) -> Result<SearchResult> {
    page.validate()?;

    let run = |field: Field, records: &Option<Vec<SearchableText>>, query: &Option<String>| {
        search_field(
            field,
            records.as_deref(),
            query.as_deref(),
            |r: &SearchableText| r.text.as_str(),
            page,
            options,
        )
    };

    #[cfg(feature = "parallel")]
    let (courses, (categories, topics)) = rayon::join(
        || run(Field::Course, &catalog.courses, &criteria.course_name),
        || {
            rayon::join(
                || run(Field::Category, &catalog.categories, &criteria.category_name),
                || run(Field::Topic, &catalog.topics, &criteria.topic_name),
            )
        },
    );

    #[cfg(not(feature = "parallel"))]
    let (courses, (categories, topics)) = (
        run(Field::Course, &catalog.courses, &criteria.course_name),
        (
            run(Field::Category, &catalog.categories, &criteria.category_name),
            run(Field::Topic, &catalog.topics, &criteria.topic_name),
        ),
    );

    Ok(SearchResult {
        scored_courses: courses?,
        scored_categories: categories?,
        scored_topics: topics?,
        page,
    })
}

/// Search user display names with the user threshold.
pub fn search_users(
    users: Option<&[SearchableText]>,
    query: Option<&str>,
    page: PageRequest,
    options: &SearchOptions,
) -> Result<Vec<ScoredItem<SearchableText>>> {
    search_field(Field::User, users, query, |u: &SearchableText| u.text.as_str(), page, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(texts: &[&str]) -> Vec<SearchableText> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| SearchableText::new(i as i64 + 1, *text))
            .collect()
    }

    fn courses(texts: &[&str]) -> Catalog {
        Catalog {
            courses: Some(records(texts)),
            ..Catalog::default()
        }
    }

    fn ids(items: &[ScoredItem<SearchableText>]) -> Vec<i64> {
        items.iter().map(|s| s.item.id).collect()
    }

    fn run(criteria: SearchCriteria, page: PageRequest, catalog: &Catalog) -> SearchResult {
        search(&criteria, page, catalog, &SearchOptions::default()).unwrap()
    }

    #[test]
    fn test_typo_passes_course_threshold() {
        let catalog = courses(&["Python", "Java", "Rust"]);
        let result = run(SearchCriteria::course("Pythn"), PageRequest::new(0, 5), &catalog);

        assert_eq!(ids(&result.scored_courses), vec![1]);
        assert!((result.scored_courses[0].score - 500.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_match_scores_100() {
        let catalog = courses(&["Python", "Python Basics"]);
        let result = run(SearchCriteria::course("  PYTHON "), PageRequest::new(0, 5), &catalog);

        assert_eq!(result.scored_courses[0].item.id, 1);
        assert_eq!(result.scored_courses[0].score, 100.0);
    }

    #[test]
    fn test_exact_match_not_duplicated_by_fuzzy_pass() {
        let catalog = courses(&["Rust", "Rest", "Dust"]);
        let result = run(SearchCriteria::course("rust"), PageRequest::new(0, 10), &catalog);

        let rust: Vec<_> = result.scored_courses.iter().filter(|s| s.item.id == 1).collect();
        assert_eq!(rust.len(), 1);
        assert_eq!(rust[0].score, 100.0);
        assert_eq!(result.scored_courses[0].item.id, 1);
    }

    #[test]
    fn test_records_sharing_text_all_returned() {
        let catalog = courses(&["Intro to SQL", "Intro to SQL", "Cooking"]);
        let result = run(SearchCriteria::course("intro to sq"), PageRequest::new(0, 10), &catalog);

        assert_eq!(ids(&result.scored_courses), vec![1, 2]);
        assert_eq!(result.scored_courses[0].score, result.scored_courses[1].score);
    }

    #[test]
    fn test_duplicate_ids_collapsed() {
        let catalog = Catalog {
            courses: Some(vec![SearchableText::new(9, "Go"), SearchableText::new(9, "Go")]),
            ..Catalog::default()
        };
        let result = run(SearchCriteria::course("go"), PageRequest::new(0, 10), &catalog);
        assert_eq!(ids(&result.scored_courses), vec![9]);
    }

    #[test]
    fn test_exact_matches_fill_page_skip_fuzzy() {
        let catalog = courses(&["Rust", "Rust", "Rusty"]);
        let result = run(SearchCriteria::course("rust"), PageRequest::new(0, 2), &catalog);
        assert_eq!(ids(&result.scored_courses), vec![1, 2]);

        let result = run(SearchCriteria::course("rust"), PageRequest::new(1, 2), &catalog);
        assert!(result.scored_courses.is_empty());
    }

    #[test]
    fn test_results_sorted_descending() {
        let catalog = courses(&["Data Science", "Data", "Database Design", "Big Data"]);
        let result = run(SearchCriteria::course("data"), PageRequest::new(0, 10), &catalog);

        assert_eq!(result.scored_courses[0].item.id, 2);
        assert!(result
            .scored_courses
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn test_below_threshold_dropped() {
        let catalog = Catalog {
            topics: Some(records(&["Concurrency", "Ownership"])),
            ..Catalog::default()
        };
        let criteria = SearchCriteria {
            topic_name: Some("xyz".to_string()),
            ..SearchCriteria::default()
        };
        let result = run(criteria, PageRequest::new(0, 5), &catalog);
        assert!(result.scored_topics.is_empty());
    }

    #[test]
    fn test_thresholds_differ_per_field() {
        // "gxmxs" vs "games": 2 substitutions over 5 chars = 60
        let catalog = Catalog {
            categories: Some(records(&["games"])),
            topics: Some(records(&["games"])),
            ..Catalog::default()
        };
        let criteria = SearchCriteria {
            category_name: Some("gxmxs".to_string()),
            topic_name: Some("gxmxs".to_string()),
            ..SearchCriteria::default()
        };
        let options = SearchOptions {
            category_threshold: 30.0,
            topic_threshold: 70.0,
            ..SearchOptions::default()
        };
        let result = search(&criteria, PageRequest::new(0, 5), &catalog, &options).unwrap();

        assert_eq!(result.scored_categories.len(), 1);
        assert!((result.scored_categories[0].score - 60.0).abs() < 1e-9);
        assert!(result.scored_topics.is_empty());
    }

    #[test]
    fn test_pagination_boundaries() {
        let texts = ["Go", "Go", "Go", "Go", "Go", "Go", "Go"];
        let catalog = courses(&texts);

        let pages: Vec<usize> = (0..3)
            .map(|p| {
                run(SearchCriteria::course("go"), PageRequest::new(p, 5), &catalog)
                    .scored_courses
                    .len()
            })
            .collect();

        assert_eq!(pages, vec![5, 2, 0]);
    }

    #[test]
    fn test_paginate_helper() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(paginate(items.clone(), PageRequest::new(0, 5)), vec![0, 1, 2, 3, 4]);
        assert_eq!(paginate(items.clone(), PageRequest::new(1, 5)), vec![5, 6]);
        assert!(paginate(items.clone(), PageRequest::new(2, 5)).is_empty());
        assert!(paginate(items, PageRequest::new(usize::MAX, 5)).is_empty());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut items = vec![
            ScoredItem::new("a", 50.0),
            ScoredItem::new("b", 90.0),
            ScoredItem::new("c", 50.0),
            ScoredItem::new("d", 90.0),
        ];
        sort_by_score(&mut items);
        let order: Vec<&str> = items.iter().map(|s| s.item).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_blank_query_empty_catalog() {
        let catalog = courses(&[]);
        let result = run(SearchCriteria::course(""), PageRequest::new(0, 5), &catalog);
        assert!(result.is_empty());
        assert_eq!(result.page, PageRequest::new(0, 5));
    }

    #[test]
    fn test_empty_catalog_with_query() {
        let catalog = courses(&[]);
        let result = run(SearchCriteria::course("rust"), PageRequest::new(0, 5), &catalog);
        assert!(result.scored_courses.is_empty());
    }

    #[test]
    fn test_blank_texts_only() {
        let catalog = courses(&["", "   "]);
        let result = run(SearchCriteria::course("rust"), PageRequest::new(0, 5), &catalog);
        assert!(result.scored_courses.is_empty());
    }

    #[test]
    fn test_absent_list_with_query_is_error() {
        let catalog = Catalog::default();
        let err = search(
            &SearchCriteria::course("rust"),
            PageRequest::new(0, 5),
            &catalog,
            &SearchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidIndexInput(ref msg) if msg.contains("course")));
    }

    #[test]
    fn test_absent_list_without_query_is_fine() {
        let result = run(SearchCriteria::default(), PageRequest::new(0, 5), &Catalog::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = search(
            &SearchCriteria::course("rust"),
            PageRequest::new(0, 0),
            &courses(&["Rust"]),
            &SearchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidPageSize));
    }

    #[test]
    fn test_fields_independent() {
        let catalog = Catalog {
            courses: Some(records(&["Rust Programming"])),
            categories: Some(records(&["Programming"])),
            topics: Some(records(&["Ownership"])),
        };
        let criteria = SearchCriteria {
            course_name: Some("rust programing".to_string()),
            category_name: Some("programming".to_string()),
            topic_name: None,
        };
        let result = run(criteria, PageRequest::new(0, 5), &catalog);

        assert_eq!(result.scored_courses.len(), 1);
        assert_eq!(result.scored_categories[0].score, 100.0);
        assert!(result.scored_topics.is_empty());
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn test_candidate_cap_limits_fuzzy_matches() {
        let texts: Vec<String> = (0..50).map(|i| format!("course {i:02}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let catalog = courses(&refs);
        let options = SearchOptions {
            candidate_cap: 5,
            ..SearchOptions::default()
        };
        let result = search(
            &SearchCriteria::course("course"),
            PageRequest::new(0, 100),
            &catalog,
            &options,
        )
        .unwrap();
        assert_eq!(result.scored_courses.len(), 5);
    }

    #[test]
    fn test_search_users() {
        let users = records(&["alice smith", "bob stone", "alicia smyth"]);
        let found = search_users(
            Some(users.as_slice()),
            Some("alice smith"),
            PageRequest::new(0, 5),
            &SearchOptions::default(),
        )
        .unwrap();

        assert_eq!(found[0].item.id, 1);
        assert_eq!(found[0].score, 100.0);
        assert!(found.iter().any(|s| s.item.id == 3));
        assert!(found.iter().all(|s| s.score >= USER_THRESHOLD));
    }

    #[test]
    fn test_field_thresholds() {
        let options = SearchOptions::default();
        assert_eq!(Field::Course.threshold(&options), 20.0);
        assert_eq!(Field::Category.threshold(&options), 30.0);
        assert_eq!(Field::Topic.threshold(&options), 40.0);
        assert_eq!(Field::User.threshold(&options), 40.0);
    }
}
