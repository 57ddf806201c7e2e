//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Quality band of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 100
    Exact,
    /// 75 and above
    Strong,
    /// 50 and above
    Fair,
    /// Below 50
    Weak,
}

impl ScoreBand {
    /// Classify a 0–100 score
    pub fn of(score: f64) -> Self {
        if score >= 100.0 {
            ScoreBand::Exact
        } else if score >= 75.0 {
            ScoreBand::Strong
        } else if score >= 50.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Format a score with one decimal, colored by band
pub fn format_score(score: f64) -> String {
    let text = format!("{:>5.1}", score);
    match ScoreBand::of(score) {
        ScoreBand::Exact => text.green().bold().to_string(),
        ScoreBand::Strong => text.green().to_string(),
        ScoreBand::Fair => text.yellow().to_string(),
        ScoreBand::Weak => text.dimmed().to_string(),
    }
}

/// Print one ranked result line: rank, score, id and text
pub fn print_ranked(rank: usize, score: f64, id: i64, text: &str) {
    println!(
        "{:>3}. {}  {}  {}",
        rank,
        format_score(score),
        format!("#{}", id).dimmed(),
        text
    );
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
