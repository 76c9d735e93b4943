use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::profile::Profile;

/// Shorter normalized names than this never match by containment; exact
/// equality is still allowed.
const MIN_CONTAINMENT_LEN: usize = 6;

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static ORDINAL_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*(?:\d+(?:st|nd|rd|th)|first|second|third|eldest|youngest)\s+(?:son|daughter|child)\b.*$")
        .unwrap()
});

#[must_use]
pub fn normalize_name(name: &str) -> String {
    let cleaned = PARENTHETICAL.replace_all(name, " ");
    let cleaned = BRACKETED.replace_all(&cleaned, " ");
    let cleaned = ORDINAL_PHRASE.replace(&cleaned, "");
    cleaned
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches([',', '.', ' '])
        .to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileStats {
    pub merged: usize,
    pub retained: usize,
}

/// Merge synthetic child profiles into pre-existing canonical profiles
/// when names match, rewiring the parent edge onto the match and
/// discarding the redundant synthetic entry. Unmatched synthetics stay in
/// the dataset as first-class profiles with their parent link intact.
#[must_use]
pub fn reconcile(mut profiles: Vec<Profile>) -> (Vec<Profile>, ReconcileStats) {
    let canonical_names: Vec<(usize, String)> = profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_synthetic())
        .map(|(i, p)| (i, normalize_name(&p.name)))
        .collect();

    let index: HashMap<String, usize> = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let mut stats = ReconcileStats::default();
    let mut merged_ids: HashSet<String> = HashSet::new();

    let synthetic_indices: Vec<usize> = profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_synthetic())
        .map(|(i, _)| i)
        .collect();

    for si in synthetic_indices {
        let parent_id = profiles[si]
            .synthetic_parent_id()
            .map(str::to_string)
            .unwrap_or_default();
        let synthetic_name = normalize_name(&profiles[si].name);

        let best = best_match(&profiles, &canonical_names, &synthetic_name, &parent_id);

        if let Some(ci) = best {
            let canonical_id = profiles[ci].id.clone();
            tracing::debug!(
                synthetic = %profiles[si].id,
                canonical = %canonical_id,
                "reconciled child entry"
            );
            profiles[ci].relations.parents.insert(parent_id.clone());
            if let Some(&pi) = index.get(&parent_id) {
                profiles[pi].relations.children.insert(canonical_id);
            }
            merged_ids.insert(profiles[si].id.clone());
            stats.merged += 1;
        } else {
            let synthetic_id = profiles[si].id.clone();
            profiles[si].relations.parents.insert(parent_id.clone());
            if let Some(&pi) = index.get(&parent_id) {
                profiles[pi].relations.children.insert(synthetic_id);
            }
            stats.retained += 1;
        }
    }

    profiles.retain(|p| !merged_ids.contains(&p.id));
    (profiles, stats)
}

/// Exact normalized equality, or substring containment for names long
/// enough to make containment meaningful. Multiple matches break
/// deterministically: highest Jaro-Winkler similarity, then id order.
fn best_match(
    profiles: &[Profile],
    canonical_names: &[(usize, String)],
    synthetic_name: &str,
    parent_id: &str,
) -> Option<usize> {
    if synthetic_name.is_empty() {
        return None;
    }

    let mut candidates: Vec<usize> = Vec::new();
    for (ci, canonical_name) in canonical_names {
        if profiles[*ci].id == parent_id || canonical_name.is_empty() {
            continue;
        }
        let exact = canonical_name == synthetic_name;
        let contained = synthetic_name.len() >= MIN_CONTAINMENT_LEN
            && canonical_name.len() >= MIN_CONTAINMENT_LEN
            && (canonical_name.contains(synthetic_name) || synthetic_name.contains(canonical_name));
        if exact || contained {
            candidates.push(*ci);
        }
    }

    candidates.sort_by(|a, b| {
        let score_a = strsim::jaro_winkler(&normalize_name(&profiles[*a].name), synthetic_name);
        let score_b = strsim::jaro_winkler(&normalize_name(&profiles[*b].name), synthetic_name);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| profiles[*a].id.cmp(&profiles[*b].id))
    });

    candidates.first().copied()
}
