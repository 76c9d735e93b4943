use std::collections::HashMap;

use crate::profile::Profile;

/// Structural spouse inference is a property of one dataset's numbering
/// style, not a universal law, so it lives behind a replaceable policy.
pub trait SpousePolicy: Send + Sync {
    /// The id this scheme pairs with `id`, if the scheme applies at all.
    fn partner_id(&self, id: &str) -> Option<String>;
}

/// The Ahnentafel-style default: dotted ids ending in `.1`/`.2` pair by
/// suffix swap, top-level numeric ids pair by odd/even adjacency
/// (n with n+1 for odd n).
#[derive(Debug, Clone, Copy, Default)]
pub struct AhnentafelPairing;

impl SpousePolicy for AhnentafelPairing {
    fn partner_id(&self, id: &str) -> Option<String> {
        if let Some(base) = id.strip_suffix(".1") {
            return Some(format!("{base}.2"));
        }
        if let Some(base) = id.strip_suffix(".2") {
            return Some(format!("{base}.1"));
        }
        if id.contains('.') {
            return None;
        }
        let n: u64 = id.parse().ok()?;
        if n == 0 {
            return None;
        }
        Some(if n % 2 == 1 {
            (n + 1).to_string()
        } else {
            (n - 1).to_string()
        })
    }
}

/// For datasets whose numbering carries no pairing convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpousePairing;

impl SpousePolicy for NoSpousePairing {
    fn partner_id(&self, _id: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkStats {
    pub parent_child_edges: usize,
    pub spouse_edges: usize,
}

/// Derive parent/child and spouse edges from the structural shape of
/// profile ids. Synthetic child ids carry no structure and are skipped;
/// the reconciler owns their edges.
pub fn link(profiles: &mut [Profile], policy: &dyn SpousePolicy) -> LinkStats {
    let index: HashMap<String, usize> = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();

    let mut stats = LinkStats::default();

    for i in 0..profiles.len() {
        if profiles[i].is_synthetic() {
            continue;
        }
        let id = profiles[i].id.clone();

        // Removing the trailing segment of a dotted id names a structural
        // ancestor, if that ancestor was ever scanned.
        if let Some(dot) = id.rfind('.') {
            let ancestor = &id[..dot];
            if let Some(&ai) = index.get(ancestor) {
                let added = profiles[ai].relations.children.insert(id.clone());
                profiles[i].relations.parents.insert(ancestor.to_string());
                if added {
                    stats.parent_child_edges += 1;
                }
            }
        }

        if let Some(partner) = policy.partner_id(&id) {
            if let Some(&si) = index.get(&partner) {
                let added = profiles[i].relations.spouses.insert(partner.clone());
                profiles[si].relations.spouses.insert(id);
                if added {
                    stats.spouse_edges += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(ids: &[&str]) -> Vec<Profile> {
        ids.iter()
            .map(|id| Profile::new((*id).to_string(), format!("Person {id}")))
            .collect()
    }

    #[test]
    fn dotted_ids_link_to_their_structural_parent() {
        let mut set = profiles(&["1", "1.1", "1.1.2"]);
        link(&mut set, &AhnentafelPairing);

        assert!(set[0].relations.children.contains("1.1"));
        assert!(set[1].relations.parents.contains("1"));
        assert!(set[1].relations.children.contains("1.1.2"));
        assert!(set[2].relations.parents.contains("1.1"));
    }

    #[test]
    fn missing_ancestor_means_no_edge() {
        let mut set = profiles(&["3.4"]);
        link(&mut set, &AhnentafelPairing);
        assert!(set[0].relations.parents.is_empty());
    }

    #[test]
    fn dotted_suffix_pairing() {
        let mut set = profiles(&["7.1", "7.2"]);
        link(&mut set, &AhnentafelPairing);
        assert!(set[0].relations.spouses.contains("7.2"));
        assert!(set[1].relations.spouses.contains("7.1"));
    }

    #[test]
    fn top_level_odd_even_pairing() {
        let mut set = profiles(&["1", "2", "3"]);
        link(&mut set, &AhnentafelPairing);
        assert!(set[0].relations.spouses.contains("2"));
        assert!(set[1].relations.spouses.contains("1"));
        // 3's partner (4) was never scanned.
        assert!(set[2].relations.spouses.is_empty());
    }

    #[test]
    fn synthetic_children_are_skipped() {
        let mut set = profiles(&["4"]);
        set.push(Profile::synthetic_child(
            "4.c1".into(),
            "Mary".into(),
            "4".into(),
        ));
        link(&mut set, &AhnentafelPairing);
        assert!(set[0].relations.children.is_empty());
        assert!(set[1].relations.parents.is_empty());
    }

    #[test]
    fn no_pairing_policy_adds_no_spouses() {
        let mut set = profiles(&["1", "2"]);
        link(&mut set, &NoSpousePairing);
        assert!(set[0].relations.spouses.is_empty());
    }

    #[test]
    fn edges_are_mutual() {
        let mut set = profiles(&["2", "2.3"]);
        link(&mut set, &AhnentafelPairing);
        let parent = &set[0];
        let child = &set[1];
        assert!(parent.relations.children.contains(&child.id));
        assert!(child.relations.parents.contains(&parent.id));
    }
}
