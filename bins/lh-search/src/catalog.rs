//! Catalog snapshot loading.

use learnhub_core::{Error, Result, ResultExt};
use learnhub_search::Catalog;
use std::path::Path;

/// Read a catalog snapshot from a JSON file.
///
/// Lists missing from the file stay absent; searching them with a query is
/// reported by the search itself.
pub fn load(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Reading catalog {}", path.display()))?;

    let catalog: Catalog = serde_json::from_str(&content)
        .map_err(Error::from)
        .context(format!("Parsing catalog {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        courses = catalog.courses.as_ref().map_or(0, Vec::len),
        categories = catalog.categories.as_ref().map_or(0, Vec::len),
        topics = catalog.topics.as_ref().map_or(0, Vec::len),
        "Catalog loaded"
    );

    Ok(catalog)
}
