//! Configuration loading and schema definitions
//!
//! Settings for the search tools, read from `learnhub-search.toml`.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_FILE_NAME};
pub use schema::*;
