//! Vital-record field parsing: date/location splitting, year
//! normalization, and geographic decomposition.

pub mod dates;
pub mod places;
pub mod split;

pub use dates::normalize_year;
pub use places::{detect_region, parse_hierarchy, peel_location_note, Region};
pub use split::{split_date_location, VitalSplit};

use crate::profile::VitalStats;

/// Enrich raw "born"/"died" field text in place: split out the location,
/// normalize the year, peel any parenthetical note, and decompose the
/// location into its hierarchy. Raw text that defeats every strategy is
/// preserved unmodified with no integer year.
pub fn apply(stats: &mut VitalStats) {
    let born = stats.born_date.take();
    if let Some(raw) = born {
        let (date, location, year, note, hierarchy) = parse_field(&raw);
        stats.born_date = date;
        stats.born_location = location;
        stats.born_year = year;
        stats.born_location_note = note;
        stats.born_hierarchy = hierarchy;
    }

    let died = stats.died_date.take();
    if let Some(raw) = died {
        let (date, location, year, note, hierarchy) = parse_field(&raw);
        stats.died_date = date;
        stats.died_location = location;
        stats.died_year = year;
        stats.died_location_note = note;
        stats.died_hierarchy = hierarchy;
    }
}

type ParsedField = (
    Option<String>,
    Option<String>,
    Option<i32>,
    Option<String>,
    Option<crate::profile::PlaceParts>,
);

fn parse_field(raw: &str) -> ParsedField {
    let outcome = split_date_location(raw);
    let year = outcome.date.as_deref().and_then(normalize_year);

    let (location, note, hierarchy) = match outcome.location {
        Some(ref loc) => {
            let (cleaned, note) = peel_location_note(loc);
            let hierarchy = parse_hierarchy(&cleaned);
            let hierarchy = if hierarchy.is_empty() {
                None
            } else {
                Some(hierarchy)
            };
            (Some(cleaned), note, hierarchy)
        }
        None => (None, None, None),
    };

    (outcome.date, location, year, note, hierarchy)
}
