//! Utility functions for text normalization, date stamping, and logging.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization applied to every extracted text field
//! - Funding-stage detection in free text
//! - Run-date stamping for the `Last update` column
//! - String truncation for log output

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

/// Boxed error type used across the pipeline.
///
/// `Send + Sync` so it can travel through the async source adapters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static STAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(pre-seed|seed|angel|series [a-f]|growth)\b").unwrap());

/// Collapse whitespace runs and trim a scraped text fragment.
///
/// Any run of whitespace (spaces, tabs, newlines) becomes a single space,
/// and leading/trailing whitespace is removed. Every extracted field passes
/// through here before entering a record, so values differing only in
/// incidental markup whitespace compare equal under deduplication.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("  Acme \n\t Corp  "), "Acme Corp");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scan free text for a funding-stage mention.
///
/// Looks for common stage vocabulary ("seed", "Series B", ...) anywhere in
/// the given text and returns it in canonical capitalization. Returns `None`
/// when no stage is mentioned, letting the caller fall back to its own
/// sentinel value.
pub fn extract_stage(text: &str) -> Option<String> {
    let captures = STAGE_RE.captures(text)?;
    let raw = captures.get(1)?.as_str().to_lowercase();
    let stage = match raw.as_str() {
        "pre-seed" => "Pre-Seed".to_string(),
        "seed" => "Seed".to_string(),
        "angel" => "Angel".to_string(),
        "growth" => "Growth".to_string(),
        series => {
            let letter = series.chars().last().unwrap_or('a').to_ascii_uppercase();
            format!("Series {letter}")
        }
    };
    Some(stage)
}

/// Today's local date in ISO-8601 (`YYYY-MM-DD`) form.
///
/// Used as the `Last update` value for every record collected in a run.
pub fn today_iso() -> String {
    Local::now().date_naive().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte
/// count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}
