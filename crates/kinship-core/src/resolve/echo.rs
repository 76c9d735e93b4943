use std::collections::HashMap;

use crate::profile::{NamingEcho, Profile};

/// Walk the structural ancestor chain (successive trailing-segment
/// truncations of the id) looking for an ancestor who carried the same
/// given name. The nearest echo wins.
pub fn detect(profiles: &mut [Profile]) {
    let names_by_id: HashMap<String, String> = profiles
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();

    for profile in profiles.iter_mut() {
        if profile.is_synthetic() {
            continue;
        }
        let Some(given) = given_name(&profile.name) else {
            continue;
        };

        let mut ancestor_id = profile.id.clone();
        while let Some(dot) = ancestor_id.rfind('.') {
            ancestor_id.truncate(dot);
            let Some(ancestor_name) = names_by_id.get(&ancestor_id) else {
                continue;
            };
            if given_name(ancestor_name).is_some_and(|g| g.eq_ignore_ascii_case(&given)) {
                profile.story.naming_echo = Some(NamingEcho {
                    ancestor_id: ancestor_id.clone(),
                    shared_name: given.clone(),
                });
                break;
            }
        }
    }
}

/// First token of a multi-word name, ignoring bare initials.
fn given_name(name: &str) -> Option<String> {
    let mut tokens = name.split_whitespace();
    let first = tokens.next()?;
    tokens.next()?;
    if first.len() < 3 || first.ends_with('.') {
        return None;
    }
    Some(first.trim_matches(',').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> Profile {
        Profile::new(id.to_string(), name.to_string())
    }

    #[test]
    fn finds_the_nearest_ancestor_with_the_same_given_name() {
        let mut profiles = vec![
            profile("1", "Ezra Talcott"),
            profile("1.2", "Samuel Talcott"),
            profile("1.2.3", "Ezra Talcott Welles"),
        ];
        detect(&mut profiles);

        let echo = profiles[2].story.naming_echo.as_ref().unwrap();
        assert_eq!(echo.ancestor_id, "1");
        assert_eq!(echo.shared_name, "Ezra");
        assert!(profiles[1].story.naming_echo.is_none());
    }

    #[test]
    fn no_echo_without_a_matching_ancestor() {
        let mut profiles = vec![profile("1", "Ezra Talcott"), profile("1.1", "Samuel Talcott")];
        detect(&mut profiles);
        assert!(profiles[1].story.naming_echo.is_none());
    }

    #[test]
    fn single_token_names_are_ignored() {
        let mut profiles = vec![profile("1", "Ezra Talcott"), profile("1.1", "Ezra")];
        detect(&mut profiles);
        assert!(profiles[1].story.naming_echo.is_none());
    }
}
