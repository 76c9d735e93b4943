use std::sync::LazyLock;

use regex::Regex;

use crate::profile::PlaceParts;

/// Bare country names recognized without any other context.
const COUNTRIES: &[&str] = &[
    "england",
    "scotland",
    "wales",
    "ireland",
    "great britain",
    "britain",
    "united kingdom",
    "uk",
    "united states",
    "united states of america",
    "usa",
    "canada",
    "nova scotia",
    "france",
    "germany",
    "netherlands",
    "holland",
];

/// US state names and postal abbreviations; abbreviations match only when
/// uppercased in the source ("CT", not "ct").
const STATE_NAMES: &[&str] = &[
    "connecticut",
    "massachusetts",
    "new york",
    "new jersey",
    "pennsylvania",
    "virginia",
    "rhode island",
    "new hampshire",
    "vermont",
    "maine",
    "maryland",
    "ohio",
    "delaware",
    "north carolina",
    "south carolina",
    "georgia",
    "california",
];

const STATE_ABBREVIATIONS: &[&str] = &[
    "CT", "MA", "NY", "NJ", "PA", "VA", "RI", "NH", "VT", "ME", "MD", "OH", "DE", "NC", "SC",
    "GA", "CA",
];

static TRAILING_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(([^)]*)\)\s*$").unwrap());

/// Peel a trailing "(...)" off a location value into a separate note.
/// If stripping it would leave nothing, the original text is kept unsplit.
#[must_use]
pub fn peel_location_note(location: &str) -> (String, Option<String>) {
    let Some(caps) = TRAILING_PARENTHETICAL.captures(location) else {
        return (location.to_string(), None);
    };
    let stripped = location[..caps.get(0).unwrap().start()].trim();
    if stripped.is_empty() {
        return (location.to_string(), None);
    }
    let note = caps.get(1).unwrap().as_str().trim();
    (
        stripped.to_string(),
        if note.is_empty() {
            None
        } else {
            Some(note.to_string())
        },
    )
}

fn is_country(token: &str) -> bool {
    COUNTRIES.contains(&token.to_lowercase().as_str())
}

fn is_state(token: &str) -> bool {
    if STATE_NAMES.contains(&token.to_lowercase().as_str()) {
        return true;
    }
    let bare = token.trim_end_matches('.');
    bare.chars().all(|c| !c.is_lowercase()) && STATE_ABBREVIATIONS.contains(&bare)
}

/// Decompose a cleaned location string into a geographic hierarchy.
///
/// Single tokens are classified against the curated sets; multi-token
/// values read right to left: trailing state/country, leading city, and
/// anything between as a county-equivalent.
#[must_use]
pub fn parse_hierarchy(location: &str) -> PlaceParts {
    let tokens: Vec<&str> = location
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let mut parts = PlaceParts::default();
    match tokens.as_slice() {
        [] => {}
        [only] => {
            if is_country(only) {
                parts.country = Some((*only).to_string());
            } else if is_state(only) {
                parts.state = Some((*only).to_string());
            } else {
                parts.city = Some((*only).to_string());
            }
        }
        [first, middle @ .., last] => {
            if is_state(last) {
                parts.state = Some((*last).to_string());
            } else {
                parts.country = Some((*last).to_string());
            }
            parts.city = Some((*first).to_string());
            if !middle.is_empty() {
                parts.county = Some(middle.join(", "));
            }
        }
    }
    parts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Usa,
    Uk,
    Global,
}

impl Region {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Uk => "UK",
            Self::Global => "Global",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const USA_MARKERS: &[&str] = &[
    "usa",
    "united states",
    "ct",
    "connecticut",
    "ma",
    "massachusetts",
    "ny",
    "new york",
    "nj",
    "new jersey",
    "pa",
    "pennsylvania",
    "va",
    "virginia",
    "ri",
    "rhode island",
    "nh",
    "new hampshire",
];

const UK_MARKERS: &[&str] = &[
    "uk",
    "united kingdom",
    "england",
    "britain",
    "london",
    "scotland",
    "wales",
];

/// Coarse region classification used by the migration tag.
#[must_use]
pub fn detect_region(location: &str) -> Region {
    let lowered = location.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split([',', ' ', '.', ';'])
        .filter(|t| !t.is_empty())
        .collect();

    let has = |markers: &[&str]| {
        markers.iter().any(|marker| {
            if marker.contains(' ') {
                lowered.contains(marker)
            } else {
                tokens.contains(marker)
            }
        })
    };

    if has(USA_MARKERS) {
        Region::Usa
    } else if has(UK_MARKERS) {
        Region::Uk
    } else {
        Region::Global
    }
}
