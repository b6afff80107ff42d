// src/text.rs
//! Text cleanup shared by the ingestion pipeline: whitespace normalization,
//! markup stripping, and word-boundary truncation of summaries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Persisted summaries are capped at this many characters.
pub const SUMMARY_MAX_CHARS: usize = 320;

const TRUNCATION_MARKER: char = '\u{2026}';

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static RE_TRAILING_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\S*$").expect("trailing-word regex"));

/// Collapse any run of whitespace to a single space and trim the ends.
pub fn normalize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    RE_WS.replace_all(input, " ").trim().to_string()
}

/// Decode HTML entities, then replace every angle-bracket tag with a single
/// space. Stray `<`/`>` inside attribute values are not specially handled.
pub fn strip_markup(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let decoded = html_escape::decode_html_entities(input);
    RE_TAGS.replace_all(&decoded, " ").into_owned()
}

/// Cut `input` to at most `max` characters without splitting a word, then
/// append a truncation marker. Input at or under the limit comes back
/// unchanged, so re-truncating an already-truncated string is a no-op.
pub fn truncate(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let cut: String = input.chars().take(max).collect();
    let trimmed = RE_TRAILING_WORD.replace(&cut, "");
    format!("{trimmed}{TRUNCATION_MARKER}")
}
