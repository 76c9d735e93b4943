use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::profile::Profile;

static GENERATIONAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:,?\s+(?i:jr|sr|esq)\.?|,?\s+(?:II|III|IV|V))$").unwrap());

static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Capt|Col|Lieut|Gen|Maj|Sgt|Rev|Dr|Mr|Mrs)\.?\s+|^(?:Captain|Colonel|Lieutenant|General|Major|Sergeant|Reverend|Deacon|Elder)\s+")
        .unwrap()
});

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());

/// Multi-variant lookup from display names (and derived fragments) to the
/// profile ids that produced them. A variant held by several ids is
/// ambiguous for direct instantiation, but every id stays discoverable
/// for downstream disambiguation.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    map: HashMap<String, BTreeSet<String>>,
}

impl NameIndex {
    #[must_use]
    pub fn build(profiles: &[Profile]) -> Self {
        let mut index = Self::default();
        for profile in profiles {
            index.insert(&profile.name, &profile.id);
        }
        tracing::debug!(variants = index.map.len(), "name index built");
        index
    }

    pub fn insert(&mut self, display_name: &str, id: &str) {
        for variant in variants(display_name) {
            self.map
                .entry(variant)
                .or_default()
                .insert(id.to_string());
        }
    }

    #[must_use]
    pub fn candidates(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.map.get(key.trim())
    }

    #[must_use]
    pub fn is_ambiguous(&self, key: &str) -> bool {
        self.candidates(key).is_some_and(|ids| ids.len() > 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The stored variants of one display name: the name itself, its
/// suffix-stripped base, first+last, and first+middle-initial+last.
fn variants(display_name: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();

    let cleaned = PARENTHETICAL.replace_all(display_name, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return set;
    }
    set.insert(cleaned.clone());

    let base = GENERATIONAL_SUFFIX.replace(&cleaned, "").trim().to_string();
    let base = HONORIFIC.replace(&base, "").trim().to_string();
    if !base.is_empty() {
        set.insert(base.clone());
    }

    let tokens: Vec<&str> = base.split_whitespace().collect();
    if tokens.len() >= 3 {
        let first = tokens[0];
        let last = tokens[tokens.len() - 1];
        set.insert(format!("{first} {last}"));

        let middle_initial = tokens[1].chars().next().unwrap_or_default();
        if middle_initial.is_uppercase() {
            set.insert(format!("{first} {middle_initial}. {last}"));
        }
    }

    set
}
