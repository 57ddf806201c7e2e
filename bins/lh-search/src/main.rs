//! lh-search: fuzzy search over a LearnHub catalog snapshot.

mod catalog;

use anyhow::Context;
use clap::{Parser, Subcommand};
use learnhub_cli::output::{format_count, format_duration, print_ranked, Status};
use learnhub_core::config::{Config, SearchConfig};
use learnhub_core::error::exit_codes;
use learnhub_core::Error;
use learnhub_search::score::normalize;
use learnhub_search::{
    damerau_levenshtein, levenshtein, search, search_users, text_score,
    unrestricted_damerau_levenshtein, PageRequest, ScoredItem, SearchCriteria, SearchError,
    SearchOptions, SearchableText,
};
use learnhub_telemetry::{metrics, TelemetryConfig, Timer};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lh-search")]
#[command(about = "Fuzzy search over a LearnHub catalog snapshot")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to learnhub-search.toml lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write log events as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Print collected metrics to stderr on exit
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search courses, categories and topics
    Search {
        /// Catalog JSON file (falls back to general.catalog in config)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Course name query
        #[arg(long)]
        course: Option<String>,
        /// Category name query
        #[arg(long)]
        category: Option<String>,
        /// Topic name query
        #[arg(long)]
        topic: Option<String>,
        /// Page index, starting at 0
        #[arg(long, default_value = "0")]
        page: usize,
        /// Items per page (defaults to search.default_page_size)
        #[arg(long)]
        size: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search user display names
    Users {
        /// JSON array of {"id", "text"} records
        #[arg(long)]
        file: PathBuf,
        /// Name to look for
        query: String,
        /// Page index, starting at 0
        #[arg(long, default_value = "0")]
        page: usize,
        /// Items per page (defaults to search.default_page_size)
        #[arg(long)]
        size: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show edit distances between two strings
    Distance {
        a: String,
        b: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the similarity score of a candidate text for a query
    Score {
        candidate: String,
        query: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&e.to_string());
            return exit_code(e.exit_code());
        }
    };

    let log_level = if cli.verbose {
        "lh_search=debug,learnhub_search=debug".to_string()
    } else {
        config.schema.logging.level.clone()
    };
    if let Err(e) = learnhub_telemetry::init_with_config(TelemetryConfig {
        log_level,
        json: cli.log_json || config.schema.logging.json,
        show_target: config.schema.logging.show_target,
    }) {
        Status::warning(&e.to_string());
    }
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Configuration loaded");
    }

    let stats = cli.stats;
    let result = run(cli.command, &config);

    if stats {
        match serde_json::to_string_pretty(&metrics().snapshot()) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => Status::warning(&format!("Could not export metrics: {}", e)),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{:#}", e));
            exit_code(error_exit_code(&e))
        }
    }
}

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let settings = &config.schema.search;
    let options = search_options(settings);

    match command {
        Commands::Search { catalog: catalog_path, course, category, topic, page, size, json } => {
            let path = catalog_path
                .or_else(|| config.schema.general.catalog.as_ref().map(PathBuf::from))
                .ok_or_else(|| {
                    Error::config("No catalog file given")
                        .with_suggestion("Pass --catalog or set general.catalog in learnhub-search.toml")
                })?;
            let catalog = catalog::load(&path)?;

            let criteria = SearchCriteria {
                course_name: course,
                category_name: category,
                topic_name: topic,
            };
            let page = PageRequest::new(page, size.unwrap_or(settings.default_page_size));

            let timer = Timer::start("search");
            let result = search(&criteria, page, &catalog, &options)
                .map_err(|e| search_failure(e, &path))?;
            let elapsed = timer.stop();
            metrics().increment("searches");
            metrics().add("results", result.total() as u64);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            if criteria.course_name.is_some() {
                print_section("Courses", &result.scored_courses, page);
            }
            if criteria.category_name.is_some() {
                print_section("Categories", &result.scored_categories, page);
            }
            if criteria.topic_name.is_some() {
                print_section("Topics", &result.scored_topics, page);
            }
            println!();
            Status::info(&format!(
                "{} on page {} in {}",
                format_count(result.total(), "match", "matches"),
                page.page,
                format_duration(elapsed)
            ));
        }

        Commands::Users { file, query, page, size, json } => {
            let users = load_users(&file)?;
            let page = PageRequest::new(page, size.unwrap_or(settings.default_page_size));

            let timer = Timer::start("user_search");
            let found = search_users(Some(users.as_slice()), Some(query.as_str()), page, &options)
                .map_err(|e| search_failure(e, &file))?;
            timer.stop();
            metrics().increment("user_searches");

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print_section("Users", &found, page);
            }
        }

        Commands::Distance { a, b, json } => {
            let lev = levenshtein(&a, &b);
            let dl = damerau_levenshtein(&a, &b);
            let index = unrestricted_damerau_levenshtein(&a, &b);
            let max_len = a.chars().count().max(b.chars().count());
            let similarity = normalize(dl.distance, max_len);

            if json {
                let report = serde_json::json!({
                    "levenshtein": lev,
                    "damerau_levenshtein": dl.distance,
                    "transpositions": dl.transpositions,
                    "index_distance": index,
                    "similarity": similarity,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Levenshtein:          {}", lev);
                println!("Damerau-Levenshtein:  {}", dl.distance);
                println!("Transposition checks: {}", dl.transpositions);
                println!("Index distance:       {}", index);
                println!("Similarity:           {:.1}", similarity);
            }
        }

        Commands::Score { candidate, query } => {
            println!("{:.2}", text_score(&candidate, &query));
        }
    }

    Ok(())
}

fn search_options(settings: &SearchConfig) -> SearchOptions {
    SearchOptions {
        course_threshold: settings.course_threshold,
        category_threshold: settings.category_threshold,
        topic_threshold: settings.topic_threshold,
        user_threshold: settings.user_threshold,
        candidate_cap: settings.candidate_cap,
    }
}

fn load_users(path: &Path) -> anyhow::Result<Vec<SearchableText>> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .with_context(|| format!("Reading users {}", path.display()))?;
    let users = serde_json::from_str(&content)
        .map_err(Error::from)
        .with_context(|| format!("Parsing users {}", path.display()))?;
    Ok(users)
}

fn print_section(title: &str, items: &[ScoredItem<SearchableText>], page: PageRequest) {
    Status::header(title);
    if items.is_empty() {
        println!("  {}", "no matches".dimmed());
        return;
    }
    for (i, scored) in items.iter().enumerate() {
        print_ranked(page.offset() + i + 1, scored.score, scored.item.id, &scored.item.text);
    }
}

/// Attach a coded error to a failed search over the file at `source`.
fn search_failure(err: SearchError, source: &Path) -> Error {
    let coded = match &err {
        SearchError::InvalidIndexInput(detail) => Error::catalog_list_missing(detail.clone()),
        SearchError::InvalidPageSize => Error::invalid_page_size(),
    };
    coded
        .with_context(format!("Searching {}", source.display()))
        .with_source(err)
}

fn error_exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map_or(exit_codes::FAILURE, Error::exit_code)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::ErrorCode;

    #[test]
    fn test_search_options_from_config() {
        let settings = SearchConfig {
            topic_threshold: 55.0,
            candidate_cap: 12,
            ..SearchConfig::default()
        };
        let options = search_options(&settings);
        assert_eq!(options.topic_threshold, 55.0);
        assert_eq!(options.candidate_cap, 12);
        assert_eq!(options.course_threshold, 20.0);
    }

    #[test]
    fn test_default_config_matches_engine_defaults() {
        assert_eq!(search_options(&SearchConfig::default()), SearchOptions::default());
    }

    #[test]
    fn test_search_failures_are_coded() {
        let path = Path::new("catalog.json");

        let missing = search_failure(SearchError::InvalidIndexInput("topic list is absent".into()), path);
        assert_eq!(missing.code, ErrorCode::CatalogListMissing);
        assert_eq!(missing.message, "topic list is absent");
        assert_eq!(missing.context.as_deref(), Some("Searching catalog.json"));
        assert!(missing.source.is_some());

        let page = search_failure(SearchError::InvalidPageSize, path);
        assert_eq!(page.code, ErrorCode::InvalidPageSize);
    }

    #[test]
    fn test_error_exit_codes() {
        let path = Path::new("catalog.json");
        let missing: anyhow::Error =
            search_failure(SearchError::InvalidIndexInput("courses".into()), path).into();
        assert_eq!(error_exit_code(&missing), exit_codes::CATALOG_ERROR);

        let page: anyhow::Error = search_failure(SearchError::InvalidPageSize, path).into();
        assert_eq!(error_exit_code(&page), exit_codes::USAGE_ERROR);

        let config: anyhow::Error = Error::config("bad").into();
        assert_eq!(error_exit_code(&config), exit_codes::CONFIG_ERROR);

        let other = anyhow::anyhow!("boom");
        assert_eq!(error_exit_code(&other), exit_codes::FAILURE);
    }

    #[test]
    fn test_absent_list_search_reports_catalog_error() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"courses": [{{"id": 1, "text": "Rust"}}]}}"#).unwrap();

        let command = Commands::Search {
            catalog: Some(file.path().to_path_buf()),
            course: None,
            category: None,
            topic: Some("ownership".to_string()),
            page: 0,
            size: None,
            json: true,
        };
        let err = run(command, &Config::default()).unwrap_err();
        assert_eq!(error_exit_code(&err), exit_codes::CATALOG_ERROR);
    }

    #[test]
    fn test_cli_parses_log_json_globally() {
        let cli = Cli::try_parse_from(["lh-search", "score", "Rust", "rust", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(!cli.stats);
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "lh-search", "search", "--catalog", "c.json", "--course", "pythn", "--size", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { course, size, page, .. } => {
                assert_eq!(course.as_deref(), Some("pythn"));
                assert_eq!(size, Some(5));
                assert_eq!(page, 0);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_load_users() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 3, "text": "Ada Lovelace"}}]"#).unwrap();

        let users = load_users(file.path()).unwrap();
        assert_eq!(users, vec![SearchableText::new(3, "Ada Lovelace")]);
    }
}
