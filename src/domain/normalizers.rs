//! Field normalizers shared by every listing category
//!
//! Pure functions turning raw card/detail text into canonical values. None of
//! them can fail: unusable input degrades to a sentinel or placeholder.

use lazy_static::lazy_static;
use regex::Regex;

use super::listing::NO_DESCRIPTION;

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\s*\(.*\)").unwrap();
}

/// Parse a displayed price into a sortable number.
///
/// Keeps only ASCII digits and commas, treats the comma as decimal point and
/// parses the rest. Anything that does not parse (placeholders, "Troca",
/// empty text, several commas) yields `f64::INFINITY` so it sorts last.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned.parse::<f64>().unwrap_or(f64::INFINITY)
}

/// Reduce a "location - date" string to the place name.
///
/// Everything from the first hyphen on is dropped, then any parenthetical
/// suffix such as a distance annotation is removed.
pub fn format_location(raw: &str) -> String {
    let trimmed = raw.trim();
    let place = match trimmed.find('-') {
        Some(idx) => trimmed[..idx].trim(),
        None => trimmed,
    };

    PARENTHETICAL.replace_all(place, "").trim().to_string()
}

/// Join text segments with `separator`, trimming each and dropping blanks
pub fn join_text_segments<'a, I>(segments: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Build the description value from the text segments of the description block
pub fn normalize_description<'a, I>(segments: Option<I>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    match segments.map(|s| join_text_segments(s, "\n")) {
        Some(text) if !text.is_empty() => text,
        _ => NO_DESCRIPTION.to_string(),
    }
}
