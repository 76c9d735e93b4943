use std::sync::LazyLock;

use regex::Regex;

use crate::profile::Profile;
use crate::vitals::{detect_region, Region};

/// Characters of preceding text inspected for exclusion phrases before a
/// keyword match is accepted.
const EXCLUSION_WINDOW: usize = 30;

/// Possessive/relational phrases that mean the keyword describes somebody
/// mentioned nearby, not the profile owner.
const EXCLUSION_PHRASES: &[&str] = &[
    "son of",
    "daughter of",
    "wife of",
    "husband of",
    "father of",
    "mother of",
    "brother of",
    "sister of",
    "widow of",
    "child of",
];

struct TagRule {
    tag: &'static str,
    pattern: Regex,
}

static NOTE_RULES: LazyLock<Vec<TagRule>> = LazyLock::new(|| {
    vec![
        TagRule {
            tag: "military-service",
            pattern: Regex::new(
                r"(?i)\b(?:soldier|regiment|militia|enlisted|continental army|revolutionary war|civil war|war of 1812|served in the (?:war|army))\b",
            )
            .unwrap(),
        },
        TagRule {
            tag: "immigration",
            pattern: Regex::new(
                r"(?i)\b(?:immigrated|emigrated|arrived in|came to america|sailed from|came over)\b",
            )
            .unwrap(),
        },
        TagRule {
            tag: "maritime",
            pattern: Regex::new(
                r"(?i)\b(?:mariner|sea captain|shipmaster|shipwright|whaling|seafaring|merchant vessel)\b",
            )
            .unwrap(),
        },
        TagRule {
            tag: "clergy",
            pattern: Regex::new(r"(?i)\b(?:minister|reverend|deacon|pastor|ordained)\b").unwrap(),
        },
    ]
});

/// Tags read straight off the display name, rank prefixes mostly.
static NAME_RULES: LazyLock<Vec<TagRule>> = LazyLock::new(|| {
    vec![
        TagRule {
            tag: "military-service",
            pattern: Regex::new(
                r"\b(?:Capt|Col|Lieut|Maj|Gen|Sgt)\.|\b(?:Captain|Colonel|Lieutenant|Major|General|Sergeant)\b",
            )
            .unwrap(),
        },
        TagRule {
            tag: "clergy",
            pattern: Regex::new(r"\bRev\.|\b(?:Reverend|Deacon|Elder)\b").unwrap(),
        },
    ]
});

#[derive(Debug, Clone, Copy, Default)]
pub struct TagStats {
    pub tags_applied: usize,
}

/// Scan notes for thematic keyword patterns with exclusion-context
/// guards, infer rank tags from display names, and derive the migration
/// tag purely from birth/death regions.
pub fn classify(profiles: &mut [Profile]) -> TagStats {
    let mut stats = TagStats::default();

    for profile in profiles.iter_mut() {
        for rule in NOTE_RULES.iter() {
            if note_rule_matches(&rule.pattern, &profile.story.notes)
                && profile.story.tags.insert(rule.tag.to_string())
            {
                stats.tags_applied += 1;
            }
        }

        for rule in NAME_RULES.iter() {
            if rule.pattern.is_match(&profile.name)
                && profile.story.tags.insert(rule.tag.to_string())
            {
                stats.tags_applied += 1;
            }
        }

        if let Some(tag) = migration_tag(profile) {
            if profile.story.tags.insert(tag.to_string()) {
                stats.tags_applied += 1;
            }
        }
    }

    stats
}

/// Accept the first match whose preceding window is free of exclusion
/// phrases; a rejected match does not block later ones in the same notes.
fn note_rule_matches(pattern: &Regex, notes: &str) -> bool {
    for found in pattern.find_iter(notes) {
        let window_start = found.start().saturating_sub(EXCLUSION_WINDOW);
        // Back off to a char boundary; the window size is approximate.
        let window_start = (0..=window_start)
            .rev()
            .find(|&i| notes.is_char_boundary(i))
            .unwrap_or(0);
        let window = notes[window_start..found.start()].to_lowercase();
        if EXCLUSION_PHRASES
            .iter()
            .any(|phrase| window.contains(phrase))
        {
            continue;
        }
        return true;
    }
    false
}

/// Independent of the notes entirely: a birth region and death region on
/// opposite sides of the Atlantic mark a migration.
fn migration_tag(profile: &Profile) -> Option<&'static str> {
    let born = profile.vital_stats.born_location.as_deref()?;
    let died = profile.vital_stats.died_location.as_deref()?;
    let born_region = detect_region(born);
    let died_region = detect_region(died);
    match (born_region, died_region) {
        (Region::Uk, Region::Usa) | (Region::Usa, Region::Uk) => Some("transatlantic-migration"),
        _ => None,
    }
}
