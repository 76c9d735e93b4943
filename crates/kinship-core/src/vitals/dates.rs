use std::sync::LazyLock;

use regex::Regex;

/// Years outside this window are treated as non-dates (catalog numbers,
/// page references) rather than plausible vital years.
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2099;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

static BEFORE_MODIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:bef(?:ore)?\.?|by)\s*$").unwrap());

static AFTER_MODIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\baft(?:er)?\.?\s*$").unwrap());

static CENTURY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\s+century\b").unwrap());

static DECADE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1\d{3})(?:'s|s)\b").unwrap());

/// One strategy for pulling an approximate year out of loosely formatted
/// date text. Rules are evaluated in priority order; the first match wins.
type DateRule = fn(&str) -> Option<i32>;

const RULES: &[DateRule] = &[rule_bounded_year, rule_century, rule_decade, rule_calendar];

/// Normalize free-form date text to an approximate integer year.
///
/// Sentinel strings ("Unknown", "?", empty) and text that defeats every
/// strategy yield `None`; callers must treat that as chronologically
/// unordered, not as an error.
#[must_use]
pub fn normalize_year(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if is_sentinel(trimmed) {
        return None;
    }
    RULES.iter().find_map(|rule| rule(trimmed))
}

#[must_use]
pub fn is_sentinel(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    lowered.is_empty() || lowered == "unknown" || lowered == "?" || lowered == "uncertain"
}

/// First 4-digit token within the plausible range, adjusted by any
/// qualifier immediately preceding it: "bef 1800" is the year before 1800,
/// "aft 1750" the year after, "c. 1774" and "between 1774 and 1780" stay
/// on the first year as written.
fn rule_bounded_year(text: &str) -> Option<i32> {
    for caps in YEAR.captures_iter(text) {
        let matched = caps.get(1).unwrap();
        let Ok(year) = matched.as_str().parse::<i32>() else {
            continue;
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            continue;
        }
        let prefix = &text[..matched.start()];
        if BEFORE_MODIFIER.is_match(prefix) {
            return Some(year - 1);
        }
        if AFTER_MODIFIER.is_match(prefix) {
            return Some(year + 1);
        }
        return Some(year);
    }
    None
}

/// "18th century" -> 1700.
fn rule_century(text: &str) -> Option<i32> {
    let caps = CENTURY.captures(text)?;
    let n: i32 = caps.get(1).unwrap().as_str().parse().ok()?;
    if n == 0 {
        return None;
    }
    Some((n - 1) * 100)
}

/// "1990s" / "1750's" -> the decade's first year.
fn rule_decade(text: &str) -> Option<i32> {
    let caps = DECADE.captures(text)?;
    caps.get(1).unwrap().as_str().parse().ok()
}

/// Last resort: hand the text to a strict calendar parse.
fn rule_calendar(text: &str) -> Option<i32> {
    use chrono::{Datelike, NaiveDate};

    const FORMATS: &[&str] = &[
        "%m/%d/%Y",
        "%Y-%m-%d",
        "%B %d, %Y",
        "%b %d, %Y",
        "%d %B %Y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|date| date.year())
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
}
