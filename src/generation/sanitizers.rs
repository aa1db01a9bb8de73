//! Sanitizer functions for text embedded into generated Go sources
//!
//! Schema descriptions, enum values and patterns come straight from the
//! OpenAPI document; these helpers make them safe to place inside Go line
//! comments, string literals and struct tags.

use once_cell::sync::Lazy;
use regex::Regex;

static UNICODE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Sanitizes a description for use in a single-line Go comment
///
/// This function:
/// - Replaces smart quotes with regular quotes
/// - Replaces en/em-dashes with regular dashes
/// - Collapses all whitespace, including newlines, into single spaces
///
/// # Examples
/// ```
/// use apigen::generation::sanitizers::sanitize_comment;
///
/// let output = sanitize_comment("A pet\u{2014}in the \u{201C}store\u{201D}\n  catalogue");
/// assert_eq!(output, "A pet-in the \"store\" catalogue");
/// ```
pub fn sanitize_comment(input: &str) -> String {
    let replaced = UNICODE_PUNCTUATION.replace_all(input, |caps: &regex::Captures| match &caps[0] {
        "\u{2018}" | "\u{2019}" => "'",
        "\u{201C}" | "\u{201D}" => "\"",
        _ => "-",
    });
    WHITESPACE.replace_all(replaced.trim(), " ").to_string()
}

/// Renders a value as a double-quoted Go string literal.
///
/// JSON string escaping is a subset of Go's interpreted string literal
/// syntax, so serde_json does the escaping.
pub fn go_string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Sanitizes a value placed inside a Go struct tag (`key:"value"`).
///
/// Struct tags live in a raw string literal, so backticks cannot appear at
/// all and double quotes must be escaped.
pub fn sanitize_tag_value(value: &str) -> String {
    value
        .replace('`', "'")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}
