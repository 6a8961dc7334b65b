//! Line-level classification: page-number footers, closing dates, titles.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

static FOOTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,4}$").unwrap());

/// A year in 1900-2099, optionally a second one joined by "or" / "-".
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(19|20)[0-9]{2}(?:\s*(?:or|-)\s*(19|20)[0-9]{2})?$").unwrap());

static YEAR_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:or|-)\s*").unwrap());

/// True if the line is a page number: 1 to 4 ASCII digits once trimmed.
pub fn is_footer_line(line: &str) -> bool {
    is_footer_line_with_config(line, &ParsingConfig::default())
}

/// Config-aware version of [`is_footer_line`].
pub(crate) fn is_footer_line_with_config(line: &str, config: &ParsingConfig) -> bool {
    let re = config.footer_re.as_ref().unwrap_or(&FOOTER_RE);
    re.is_match(line.trim())
}

/// Parse a closing date line, normalizing a pair of years to `"1959, 1960"`.
pub fn parse_date_line(line: &str) -> Option<String> {
    parse_date_line_with_config(line, &ParsingConfig::default())
}

/// Config-aware version of [`parse_date_line`].
pub(crate) fn parse_date_line_with_config(line: &str, config: &ParsingConfig) -> Option<String> {
    let re = config.date_re.as_ref().unwrap_or(&DATE_RE);
    let candidate = line.trim();
    if !re.is_match(candidate) {
        return None;
    }
    let years: Vec<&str> = YEAR_SEPARATOR_RE
        .split(candidate)
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .collect();
    Some(years.join(", "))
}

/// Drop trailing page-number lines. The first line is never removed.
pub fn strip_trailing_footers(text: &str) -> String {
    strip_trailing_footers_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`strip_trailing_footers`].
pub(crate) fn strip_trailing_footers_with_config(text: &str, config: &ParsingConfig) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.len() > 1 && lines.last().is_some_and(|l| is_footer_line_with_config(l, config)) {
        lines.pop();
    }
    lines.join("\n")
}

/// If the last line of `text` is a date line, remove it and return the date.
///
/// ```
/// use poemforge_parsing::lines::extract_date;
///
/// let (body, date) = extract_date("first line\nlast line\n1959 or 1960");
/// assert_eq!(body, "first line\nlast line");
/// assert_eq!(date.as_deref(), Some("1959, 1960"));
/// ```
pub fn extract_date(text: &str) -> (String, Option<String>) {
    extract_date_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_date`].
pub(crate) fn extract_date_with_config(
    text: &str,
    config: &ParsingConfig,
) -> (String, Option<String>) {
    let mut lines: Vec<&str> = text.lines().collect();
    if let Some(date) = lines
        .last()
        .and_then(|last| parse_date_line_with_config(last, config))
    {
        lines.pop();
        return (lines.join("\n"), Some(date));
    }
    (text.to_string(), None)
}

/// Remove blank (whitespace-only) lines from the start of `text`.
pub fn remove_leading_blank_lines(text: &str) -> String {
    text.lines()
        .skip_while(|l| l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of whitespace-separated words in the line.
pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Title-case a header: each run of letters starts uppercase, the rest lowercase.
///
/// A letter following any non-letter (space, apostrophe, digit) starts a new
/// run, so `"o'hara"` becomes `"O'Hara"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && !prev_cased {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}
