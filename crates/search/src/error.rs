//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Blank queries, empty catalogs and queries without matches are not
/// errors; they produce empty result lists.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A record list needed to build an index was not supplied
    #[error("Invalid index input: {0}")]
    InvalidIndexInput(String),

    /// Page size must be at least one
    #[error("Invalid page size: must be greater than zero")]
    InvalidPageSize,
}

/// Error code for integration with learnhub-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Record list absent
    InvalidIndexInput = 11001,
    /// Zero page size
    InvalidPageSize = 11002,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidIndexInput(_) => SearchErrorCode::InvalidIndexInput,
            SearchError::InvalidPageSize => SearchErrorCode::InvalidPageSize,
        }
    }
}
