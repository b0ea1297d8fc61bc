//! Display-text to number conversion.
//!
//! Screener renders numbers with Indian digit grouping (`1,23,456`), currency
//! symbols, units (`Cr.`) and percent signs. These helpers turn such strings
//! into numbers; they return `None` rather than guessing.

use std::sync::LazyLock;

use regex::Regex;

/// First signed number in a string: optional minus, digits with separators,
/// optional fraction.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-−]?)\s*([0-9][0-9,]*(?:\.[0-9]+)?)").expect("number pattern compiles")
});

/// Strip every non-digit and parse what is left as an integer.
///
/// `"₹1,23,456 Cr."` → `123456`. Signs and decimal points are dropped too, so
/// this is only for values that are whole and non-negative by construction.
pub fn clean_integer(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse the first signed decimal number in `text`.
///
/// Tolerates thousands separators, currency symbols and trailing units:
/// `"₹ 1,285.60"` → `1285.6`, `"-4%"` → `-4.0`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let caps = NUMBER.captures(text)?;
    let magnitude: f64 = caps[2].replace(',', "").parse().ok()?;
    if caps[1].is_empty() {
        Some(magnitude)
    } else {
        Some(-magnitude)
    }
}

/// Parse a percentage cell such as `"15%"`. Empty cells yield `None`.
pub fn parse_percent(text: &str) -> Option<f64> {
    parse_decimal(text.trim().trim_end_matches('%'))
}

/// Collapse whitespace (including non-breaking spaces) and drop the `+`
/// expander and trailing colon screener puts on row labels.
///
/// The result is lowercase so labels compare case-insensitively.
pub fn normalize_label(text: &str) -> String {
    let collapsed = text
        .split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_end_matches('+')
        .trim_end()
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
}
