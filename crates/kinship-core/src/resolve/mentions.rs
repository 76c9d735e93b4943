use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::index::NameIndex;
use crate::profile::{Profile, RelatedLink, RelationKind};

/// Birth-year window for relationship typing: a contemporaneous kind that
/// spans a wider gap than this is downgraded to a plain mention.
pub const CONTEMPORARY_WINDOW: i32 = 80;

/// The stricter bar applied while disambiguating between multiple
/// candidates with the same name.
pub const DISAMBIGUATION_WINDOW: i32 = 60;

/// Capitalized multi-word spans (middle initials allowed) are the only
/// substrings ever tested against the index; full-text scans against
/// every known name are avoided.
static CAPITALIZED_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+(?:[A-Z]\.|[A-Z][a-z]+)){1,3}\b").unwrap()
});

/// Ordered keyword table for classifying the relation a clause implies.
/// The first phrase found in the clause wins, so the specific entries sit
/// above the generic ones.
const RELATION_KEYWORDS: &[(&str, RelationKind)] = &[
    ("widow of", RelationKind::Spouse),
    ("widower of", RelationKind::Spouse),
    ("wife of", RelationKind::Spouse),
    ("husband of", RelationKind::Spouse),
    ("married", RelationKind::Spouse),
    ("business partner", RelationKind::BusinessPartner),
    ("partner", RelationKind::BusinessPartner),
    ("step-father", RelationKind::StepParent),
    ("stepfather", RelationKind::StepParent),
    ("step-mother", RelationKind::StepParent),
    ("stepmother", RelationKind::StepParent),
    ("step-son", RelationKind::StepChild),
    ("stepson", RelationKind::StepChild),
    ("step-daughter", RelationKind::StepChild),
    ("stepdaughter", RelationKind::StepChild),
    ("godfather", RelationKind::Godparent),
    ("godmother", RelationKind::Godparent),
    ("godson", RelationKind::Godchild),
    ("goddaughter", RelationKind::Godchild),
    ("father of", RelationKind::Child),
    ("mother of", RelationKind::Child),
    ("son of", RelationKind::Parent),
    ("daughter of", RelationKind::Parent),
    ("his father", RelationKind::Parent),
    ("her father", RelationKind::Parent),
    ("his mother", RelationKind::Parent),
    ("her mother", RelationKind::Parent),
    ("brother", RelationKind::Sibling),
    ("sister", RelationKind::Sibling),
    ("cousin", RelationKind::Cousin),
    ("in-law", RelationKind::InLaw),
    ("friend", RelationKind::Friend),
    ("neighbour", RelationKind::Neighbor),
    ("neighbor", RelationKind::Neighbor),
    ("classmate", RelationKind::Classmate),
    ("schoolmate", RelationKind::Classmate),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MentionStats {
    pub links: usize,
    pub reciprocal_links: usize,
    pub ambiguous_skipped: usize,
}

/// Scans every profile's notes for name mentions, disambiguates them
/// against the index, classifies the implied relation from clause
/// context, and synthesizes reciprocal links so no link is ever
/// one-directional.
#[derive(Debug, Clone, Copy)]
pub struct MentionResolver {
    contemporary_window: i32,
    disambiguation_window: i32,
}

impl Default for MentionResolver {
    fn default() -> Self {
        Self {
            contemporary_window: CONTEMPORARY_WINDOW,
            disambiguation_window: DISAMBIGUATION_WINDOW,
        }
    }
}

impl MentionResolver {
    #[must_use]
    pub fn new(contemporary_window: i32, disambiguation_window: i32) -> Self {
        Self {
            contemporary_window,
            disambiguation_window,
        }
    }

    pub fn resolve(&self, profiles: &mut [Profile], index: &NameIndex) -> MentionStats {
        let mut stats = MentionStats::default();

        let born_years: HashMap<String, i32> = profiles
            .iter()
            .filter_map(|p| p.vital_stats.born_year.map(|y| (p.id.clone(), y)))
            .collect();
        let synthetic_ids: HashSet<String> = profiles
            .iter()
            .filter(|p| p.is_synthetic())
            .map(|p| p.id.clone())
            .collect();

        // Discovery pass: each profile's own link list is only appended
        // to while that profile is being processed.
        let mut discovered: Vec<(usize, RelatedLink)> = Vec::new();
        for (i, profile) in profiles.iter().enumerate() {
            let notes = &profile.story.notes;
            if notes.is_empty() {
                continue;
            }
            let mut linked: HashSet<String> = profile
                .related_links
                .iter()
                .map(|l| l.target_id.clone())
                .collect();

            for clause in notes.split(['.', ';', ':', '!', '?']) {
                for span in CAPITALIZED_SPAN.find_iter(clause) {
                    let Some(candidates) = index.candidates(span.as_str()) else {
                        continue;
                    };
                    let targets: Vec<String> = candidates
                        .iter()
                        .filter(|id| **id != profile.id)
                        .cloned()
                        .collect();
                    if targets.is_empty() {
                        continue;
                    }

                    let resolved = self.disambiguate(
                        &targets,
                        born_years.get(&profile.id).copied(),
                        &born_years,
                        &synthetic_ids,
                    );
                    let Some(target_id) = resolved else {
                        tracing::warn!(
                            profile = %profile.id,
                            mention = span.as_str(),
                            candidates = targets.len(),
                            "ambiguous mention left unresolved"
                        );
                        stats.ambiguous_skipped += 1;
                        continue;
                    };

                    if !linked.insert(target_id.clone()) {
                        continue;
                    }

                    let kind = self.classify(
                        clause,
                        born_years.get(&profile.id).copied(),
                        born_years.get(&target_id).copied(),
                    );
                    discovered.push((
                        i,
                        RelatedLink::new(target_id, kind, clause.trim().to_string()),
                    ));
                    stats.links += 1;
                }
            }
        }

        for (i, link) in discovered {
            profiles[i].related_links.push(link);
        }

        stats.reciprocal_links = add_reciprocal_links(profiles);
        stats
    }

    /// A single candidate is accepted unconditionally, even across a
    /// large birth-year gap; it may legitimately be a distant ancestor.
    /// Multiple candidates must pass the proximity bar, then canonical
    /// profiles win ties. Anything still ambiguous is skipped.
    fn disambiguate(
        &self,
        targets: &[String],
        source_year: Option<i32>,
        born_years: &HashMap<String, i32>,
        synthetic_ids: &HashSet<String>,
    ) -> Option<String> {
        if let [only] = targets {
            return Some(only.clone());
        }

        let mut near: Vec<&String> = match source_year {
            Some(source_year) => targets
                .iter()
                .filter(|id| {
                    born_years
                        .get(id.as_str())
                        .is_some_and(|y| (y - source_year).abs() <= self.disambiguation_window)
                })
                .collect(),
            None => targets.iter().collect(),
        };
        if let [only] = near.as_slice() {
            return Some((*only).clone());
        }
        if near.is_empty() {
            return None;
        }

        near.retain(|id| !synthetic_ids.contains(id.as_str()));
        if let [only] = near.as_slice() {
            return Some((*only).clone());
        }
        None
    }

    fn classify(
        &self,
        clause: &str,
        source_year: Option<i32>,
        target_year: Option<i32>,
    ) -> RelationKind {
        let lowered = clause.to_lowercase();
        let kind = RELATION_KEYWORDS
            .iter()
            .find(|(phrase, _)| lowered.contains(phrase))
            .map_or(RelationKind::Mentioned, |(_, kind)| *kind);

        if kind.implies_contemporary() {
            if let (Some(source), Some(target)) = (source_year, target_year) {
                if (source - target).abs() > self.contemporary_window {
                    return RelationKind::Mentioned;
                }
            }
        }
        kind
    }
}

/// Second pass: every discovered link gets a reverse entry with the
/// inverted kind, unless the target already links back.
fn add_reciprocal_links(profiles: &mut [Profile]) -> usize {
    let index: HashMap<String, usize> = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let mut pending: Vec<(usize, RelatedLink)> = Vec::new();
    for profile in profiles.iter() {
        for link in &profile.related_links {
            let Some(&ti) = index.get(&link.target_id) else {
                continue;
            };
            let target = &profiles[ti];
            if target.links_to(&profile.id) {
                continue;
            }
            if pending
                .iter()
                .any(|(pi, l)| *pi == ti && l.target_id == profile.id)
            {
                continue;
            }
            pending.push((
                ti,
                RelatedLink::new(
                    profile.id.clone(),
                    link.relation_type.inverse(),
                    link.source_text.clone(),
                ),
            ));
        }
    }

    let count = pending.len();
    for (i, link) in pending {
        profiles[i].related_links.push(link);
    }
    count
}

/// Social (non-family) link targets become the profile's associates list.
pub fn populate_associates(profiles: &mut [Profile]) {
    for profile in profiles.iter_mut() {
        let associates: Vec<String> = profile
            .related_links
            .iter()
            .filter(|l| {
                matches!(
                    l.relation_type,
                    RelationKind::Friend
                        | RelationKind::BusinessPartner
                        | RelationKind::Neighbor
                        | RelationKind::Classmate
                )
            })
            .map(|l| l.target_id.clone())
            .collect();
        profile.story.associates = associates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str, born: Option<i32>, notes: &str) -> Profile {
        let mut p = Profile::new(id.to_string(), name.to_string());
        p.vital_stats.born_year = born;
        p.story.notes = notes.to_string();
        p
    }

    fn resolve(profiles: &mut [Profile]) -> MentionStats {
        let index = NameIndex::build(profiles);
        MentionResolver::default().resolve(profiles, &index)
    }

    #[test]
    fn single_candidate_links_regardless_of_gap() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Descended from William Carver of the old colony."),
            profile("2", "William Carver", Some(1595), ""),
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.links, 1);
        assert_eq!(profiles[0].related_links[0].target_id, "2");
    }

    #[test]
    fn multiple_candidates_filter_by_birth_proximity() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Sold the mill to John Smith that spring."),
            profile("2", "John Smith", Some(1805), ""),
            profile("3", "John Smith", Some(1900), ""),
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.links, 1);
        assert_eq!(profiles[0].related_links[0].target_id, "2");
    }

    #[test]
    fn unresolvable_ambiguity_is_skipped_not_guessed() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Sold the mill to John Smith that spring."),
            profile("2", "John Smith", Some(1805), ""),
            profile("3", "John Smith", Some(1810), ""),
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.links, 0);
        assert_eq!(stats.ambiguous_skipped, 1);
        assert!(profiles[0].related_links.is_empty());
    }

    #[test]
    fn canonical_profiles_win_ties_over_synthetic() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Sold the mill to John Smith that spring."),
            profile("2", "John Smith", Some(1805), ""),
            {
                let mut p = Profile::synthetic_child("9.c1".into(), "John Smith".into(), "9".into());
                p.vital_stats.born_year = Some(1802);
                p
            },
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.links, 1);
        assert_eq!(profiles[0].related_links[0].target_id, "2");
    }

    #[test]
    fn clause_keywords_classify_the_relation() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "She married Amos Brown in 1822; kept a shop."),
            profile("2", "Amos Brown", Some(1798), ""),
        ];
        resolve(&mut profiles);

        assert_eq!(
            profiles[0].related_links[0].relation_type,
            RelationKind::Spouse
        );
    }

    #[test]
    fn contemporaneous_kind_across_a_wide_gap_downgrades() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "A friend of Thomas Hale from the old country."),
            profile("2", "Thomas Hale", Some(1610), ""),
        ];
        resolve(&mut profiles);

        assert_eq!(
            profiles[0].related_links[0].relation_type,
            RelationKind::Mentioned
        );
    }

    #[test]
    fn reciprocal_links_are_synthesized_with_inverted_kind() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Named for her grandmother Abigail Strong."),
            profile("2", "Abigail Strong", Some(1740), ""),
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.reciprocal_links, 1);
        let reciprocal = &profiles[1].related_links[0];
        assert_eq!(reciprocal.target_id, "1");
        assert_eq!(reciprocal.relation_type, RelationKind::MentionedBy);
    }

    #[test]
    fn existing_reverse_link_suppresses_the_reciprocal() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "Her cousin Amos Brown farmed nearby."),
            profile("2", "Amos Brown", Some(1798), "Often visited his cousin Jane Doe."),
        ];
        let stats = resolve(&mut profiles);

        assert_eq!(stats.links, 2);
        assert_eq!(stats.reciprocal_links, 0);
        assert_eq!(profiles[0].related_links.len(), 1);
        assert_eq!(profiles[1].related_links.len(), 1);
    }

    #[test]
    fn repeated_mentions_of_one_target_link_once() {
        let mut profiles = vec![
            profile(
                "1",
                "Jane Doe",
                Some(1800),
                "Amos Brown built the barn. Amos Brown later moved west.",
            ),
            profile("2", "Amos Brown", Some(1798), ""),
        ];
        let stats = resolve(&mut profiles);
        assert_eq!(stats.links, 1);
    }

    #[test]
    fn associates_collect_social_links() {
        let mut profiles = vec![
            profile("1", "Jane Doe", Some(1800), "A friend of Amos Brown for fifty years."),
            profile("2", "Amos Brown", Some(1798), ""),
        ];
        resolve(&mut profiles);
        populate_associates(&mut profiles);

        assert_eq!(profiles[0].story.associates, vec!["2".to_string()]);
    }
}
