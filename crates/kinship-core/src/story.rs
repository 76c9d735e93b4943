use std::sync::LazyLock;

use regex::Regex;

use crate::profile::{LifeEvent, LifeEventKind, Profile, Voyage};
use crate::vitals::normalize_year;

/// Explicit voyage tag:
/// `[Ship: Name | Type: Brig | Year: 1773 | Departure: A | Arrival: B]`.
static SHIP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[Ship:\s*([^\]]+)\]").unwrap());

/// Natural-language fallback: "arrived on the Hector".
static NATURAL_VOYAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:arrived|sailed|came) on the ([A-Z][a-z]+(?: [A-Z][a-z]+)*)").unwrap()
});

static EXTRA_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Pull voyages out of notes text. Explicit tags are removed from the
/// returned text; natural-language mentions stay in place. Duplicate ship
/// names collapse to the first sighting.
#[must_use]
pub fn extract_voyages(notes: &str) -> (Vec<Voyage>, String) {
    let mut voyages: Vec<Voyage> = Vec::new();

    for caps in SHIP_TAG.captures_iter(notes) {
        let mut parts = caps[1].split('|').map(str::trim);
        let Some(name) = parts.next().filter(|n| !n.is_empty()) else {
            continue;
        };
        let mut voyage = Voyage::new(name.to_string());
        for part in parts {
            let Some((key, value)) = part.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim().to_lowercase().as_str() {
                "type" => voyage.ship_type = Some(value),
                "year" => voyage.year = Some(value),
                "departure" => voyage.departure = Some(value),
                "arrival" => voyage.arrival = Some(value),
                "class" => voyage.class = value,
                _ => {}
            }
        }
        voyages.push(voyage);
    }

    let cleaned = SHIP_TAG.replace_all(notes, "");
    let cleaned = EXTRA_SPACES.replace_all(cleaned.trim(), " ").to_string();

    for caps in NATURAL_VOYAGE.captures_iter(&cleaned) {
        let name = caps[1].to_string();
        if voyages.iter().all(|v| v.ship_name != name) {
            voyages.push(Voyage::new(name));
        }
    }

    (voyages, cleaned)
}

/// Enrich one profile's story in place: extract voyages from the notes
/// and lay out the life-event timeline from the normalized vitals.
pub fn apply(profile: &mut Profile) {
    let (voyages, cleaned) = extract_voyages(&profile.story.notes);
    profile.story.notes = cleaned;
    profile.story.voyages = voyages;

    let mut events = Vec::new();
    if let Some(year) = profile.vital_stats.born_year {
        events.push(LifeEvent {
            year,
            label: "Born".to_string(),
            location: profile.vital_stats.born_location.clone(),
            kind: LifeEventKind::Birth,
        });
    }
    for voyage in &profile.story.voyages {
        let Some(year) = voyage.year.as_deref().and_then(normalize_year) else {
            continue;
        };
        events.push(LifeEvent {
            year,
            label: format!("Sailed on the {}", voyage.ship_name),
            location: voyage.arrival.clone(),
            kind: LifeEventKind::Voyage,
        });
    }
    if let Some(year) = profile.vital_stats.died_year {
        events.push(LifeEvent {
            year,
            label: "Died".to_string(),
            location: profile.vital_stats.died_location.clone(),
            kind: LifeEventKind::Death,
        });
    }
    events.sort_by_key(|event| event.year);
    profile.story.life_events = events;
}
