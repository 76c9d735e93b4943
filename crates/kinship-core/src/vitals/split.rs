use std::sync::LazyLock;

use regex::Regex;

use super::dates::is_sentinel;

/// Outcome of carving a vital-record value into its date and location
/// halves. Either side may be absent; the raw text is never altered beyond
/// trimming separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VitalSplit {
    pub date: Option<String>,
    pub location: Option<String>,
}

static IN_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+in\s+").unwrap());

static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

static FIELD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:born|died|buried|baptized|married):?\s*").unwrap());

static DATE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)\b(?:
            (?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?
              |aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
            \.?\s+\d{1,2},?\s+\d{4}
          | \d{1,2}\s+
            (?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?
              |aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
            \.?,?\s+\d{4}
          | \d{1,2}/\d{1,2}/\d{4}(?:/\d{1,2})?
          | \d{4}(?:/\d{1,2})?
        )\b",
    )
    .unwrap()
});

static MODIFIER_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:c|ca|circa|about|abt|bef(?:ore)?|by|aft(?:er)?|bet(?:ween)?|fl)\.?|\bliving\s+in)\s*$",
    )
    .unwrap()
});

static TRAILING_PREPOSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:in|at|on)$").unwrap());

static LEADING_PREPOSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:in|at|on)\b\s*").unwrap());

type SplitRule = fn(&str) -> Option<VitalSplit>;

/// Splitting strategies, strongest signal first. The terminal rule always
/// matches, so evaluation never falls off the end.
const RULES: &[SplitRule] = &[
    rule_in_separator,
    rule_date_span,
    rule_sentinel_only,
    rule_bare,
];

/// Split loosely formatted vital text ("Born 1850 in Hartford") into its
/// date and location components.
#[must_use]
pub fn split_date_location(text: &str) -> VitalSplit {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return VitalSplit::default();
    }
    RULES
        .iter()
        .find_map(|rule| rule(trimmed))
        .unwrap_or_default()
}

/// " in " is the strongest separator: "date in place". A trailing bare
/// year means the whole phrase was a date ("living in 1774"), not a place.
fn rule_in_separator(text: &str) -> Option<VitalSplit> {
    IN_SEPARATOR.find(text)?;
    let mut parts = IN_SEPARATOR.splitn(text, 2);
    let date_candidate = parts.next()?.trim();
    let loc_candidate = parts.next()?.trim();

    if BARE_YEAR.is_match(loc_candidate) {
        return Some(VitalSplit {
            date: Some(text.to_string()),
            location: None,
        });
    }

    let date = FIELD_LABEL.replace(date_candidate, "").trim().to_string();
    Some(VitalSplit {
        date: non_empty(date),
        location: non_empty(loc_candidate.to_string()),
    })
}

/// Isolate date-like spans anywhere in the text; everything outside the
/// span (minus connective prepositions) is the location.
fn rule_date_span(text: &str) -> Option<VitalSplit> {
    let mut matches = DATE_SPAN.find_iter(text);
    let first = matches.next()?;
    let end = matches.last().map_or(first.end(), |m| m.end());

    // Absorb qualifier words ("bef", "circa", "between") sitting just left
    // of the first date token into the date span.
    let start = MODIFIER_TAIL
        .find(&text[..first.start()])
        .map_or(first.start(), |m| m.start());

    let date_part = TRAILING_PREPOSITION
        .replace(text[start..end].trim(), "")
        .to_string();

    let prefix = FIELD_LABEL.replace(&text[..start], "");
    let prefix = prefix.trim().trim_matches([',', ';', ' ']);
    let suffix = LEADING_PREPOSITION.replace(text[end..].trim(), "");
    let suffix = suffix.trim().trim_matches([',', ';', ' ']);

    let location = [prefix, suffix]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    Some(VitalSplit {
        date: non_empty(date_part),
        location: non_empty(location),
    })
}

/// Text made up entirely of sentinel tokens carries no location at all.
fn rule_sentinel_only(text: &str) -> Option<VitalSplit> {
    let all_sentinels = text
        .split([' ', ',', ';', '.'])
        .filter(|token| !token.is_empty())
        .all(is_sentinel);
    if !all_sentinels {
        return None;
    }
    Some(VitalSplit {
        date: Some(text.to_string()),
        location: None,
    })
}

/// No recognizable date: digits mean an odd date with unknown place, no
/// digits mean a bare place.
fn rule_bare(text: &str) -> Option<VitalSplit> {
    if text.chars().any(|c| c.is_ascii_digit()) {
        Some(VitalSplit {
            date: Some(text.to_string()),
            location: None,
        })
    } else {
        Some(VitalSplit {
            date: None,
            location: Some(text.to_string()),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> (Option<String>, Option<String>) {
        let outcome = split_date_location(text);
        (outcome.date, outcome.location)
    }

    #[test]
    fn in_separator_is_strongest() {
        let (date, location) = split("Born 1850 in Hartford");
        assert!(date.as_deref().unwrap().contains("1850"));
        assert_eq!(location.as_deref(), Some("Hartford"));
    }

    #[test]
    fn trailing_bare_year_means_whole_phrase_is_a_date() {
        let (date, location) = split("living in 1774");
        assert_eq!(date.as_deref(), Some("living in 1774"));
        assert_eq!(location, None);
    }

    #[test]
    fn date_span_with_trailing_place() {
        let (date, location) = split("May 1, 1774 at Boston");
        assert_eq!(date.as_deref(), Some("May 1, 1774"));
        assert_eq!(location.as_deref(), Some("Boston"));
    }

    #[test]
    fn date_span_with_leading_place() {
        let (date, location) = split("Hartford, 1850");
        assert_eq!(date.as_deref(), Some("1850"));
        assert_eq!(location.as_deref(), Some("Hartford"));
    }

    #[test]
    fn modifier_absorbed_into_date_span() {
        let (date, location) = split("bef 1790");
        assert_eq!(date.as_deref(), Some("bef 1790"));
        assert_eq!(location, None);
    }

    #[test]
    fn double_date_stays_whole() {
        let (date, location) = split("1774/5");
        assert_eq!(date.as_deref(), Some("1774/5"));
        assert_eq!(location, None);
    }

    #[test]
    fn sentinel_only_text_has_no_location() {
        let (date, location) = split("?");
        assert_eq!(date.as_deref(), Some("?"));
        assert_eq!(location, None);
    }

    #[test]
    fn question_mark_suffix_is_still_a_location() {
        let (date, location) = split("England?");
        assert_eq!(date, None);
        assert_eq!(location.as_deref(), Some("England?"));
    }

    #[test]
    fn unparseable_digits_are_a_date_with_unknown_place() {
        let (date, location) = split("3rd of the month, 17--");
        assert!(date.is_some());
        assert_eq!(location, None);
    }

    #[test]
    fn plain_word_is_a_location() {
        let (date, location) = split("possibly");
        assert_eq!(date, None);
        assert_eq!(location.as_deref(), Some("possibly"));
    }

    #[test]
    fn unknown_yields_nothing() {
        assert_eq!(split_date_location("Unknown"), VitalSplit::default());
        assert_eq!(split_date_location(""), VitalSplit::default());
    }

    #[test]
    fn field_label_is_stripped_from_date() {
        let (date, location) = split("Died: 1820 in Boston");
        assert_eq!(date.as_deref(), Some("1820"));
        assert_eq!(location.as_deref(), Some("Boston"));
    }
}
