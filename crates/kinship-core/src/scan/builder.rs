use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::children;
use super::scanner::ScanPatterns;
use crate::profile::Profile;

/// Conjunctions that keep an alias chain alive between identifier tokens
/// on a profile-start line. Anything else breaks the chain.
static ALIAS_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:&|/|and)$").unwrap());

/// State machine that accumulates scanned lines into in-progress person
/// records. A record closes when a new profile-start line or a section
/// boundary is seen, or when the stream ends.
pub struct ProfileBuilder<'p> {
    patterns: &'p ScanPatterns,
    lineage: String,
    generation: String,
    open: Vec<Profile>,
    pending_children: Vec<String>,
    done: Vec<Profile>,
    seen: HashSet<String>,
    duplicates: usize,
}

impl<'p> ProfileBuilder<'p> {
    #[must_use]
    pub fn new(patterns: &'p ScanPatterns, lineage: String) -> Self {
        Self {
            patterns,
            lineage,
            generation: crate::profile::UNCATEGORIZED.to_string(),
            open: Vec::new(),
            pending_children: Vec::new(),
            done: Vec::new(),
            seen: HashSet::new(),
            duplicates: 0,
        }
    }

    /// A section header closes any in-progress profile and relabels the
    /// current generation for everything that follows.
    pub fn section(&mut self, label: &str) {
        self.close_open();
        self.generation = label.trim().to_string();
    }

    /// Feed one non-blank content paragraph, in document order.
    pub fn content(&mut self, paragraph_index: usize, text: &str) {
        let text = text.trim();
        if self.patterns.is_profile_start(text) {
            self.start_line(paragraph_index, text);
            return;
        }
        if self.open.is_empty() {
            return;
        }

        if let Some(value) = capture(&self.patterns.born, text) {
            for profile in &mut self.open {
                profile.vital_stats.born_date = Some(value.clone());
            }
        } else if let Some(value) = capture(&self.patterns.died, text) {
            for profile in &mut self.open {
                profile.vital_stats.died_date = Some(value.clone());
            }
        } else if let Some(value) = capture(&self.patterns.notes, text) {
            for profile in &mut self.open {
                if profile.story.notes.is_empty() {
                    profile.story.notes = value.clone();
                } else {
                    profile.story.notes.push(' ');
                    profile.story.notes.push_str(&value);
                }
            }
        } else if let Some(value) = capture(&self.patterns.children, text) {
            self.pending_children.push(value);
        }
        // Anything that fails every field pattern is dropped; scanning
        // continues with the profile still open.
    }

    /// Consume the builder, closing whatever is still open.
    #[must_use]
    pub fn finish(mut self) -> (Vec<Profile>, usize) {
        self.close_open();
        (self.done, self.duplicates)
    }

    fn start_line(&mut self, paragraph_index: usize, text: &str) {
        self.close_open();

        let tokens: Vec<regex::Captures<'_>> = self.patterns.id_token.captures_iter(text).collect();
        let first = tokens[0].get(0).unwrap();

        let raw_name = &text[..first.start()];
        let name = self
            .patterns
            .source_tag
            .replace_all(raw_name, "")
            .trim()
            .trim_matches([',', '-', ' '])
            .to_string();

        let source_id = self
            .patterns
            .source_tag
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|id| !id.is_empty());

        // Walk the alias chain: tokens stay aliases of the same person
        // only across the narrow conjunction separators.
        let mut ids = vec![tokens[0][1].to_string()];
        let mut previous_end = first.end();
        for caps in &tokens[1..] {
            let whole = caps.get(0).unwrap();
            let separator = text[previous_end..whole.start()].trim();
            if !ALIAS_SEPARATOR.is_match(separator) {
                break;
            }
            ids.push(caps[1].to_string());
            previous_end = whole.end();
        }

        for id in ids {
            if !self.seen.insert(id.clone()) {
                tracing::warn!(id = %id, "duplicate profile identifier, dropping");
                self.duplicates += 1;
                self.open.retain(|p| p.id != id);
                continue;
            }
            let mut profile = Profile::new(id, name.clone());
            profile.lineage = self.lineage.clone();
            profile.generation = self.generation.clone();
            profile.metadata.source_id = source_id.clone();
            profile.metadata.doc_paragraph_index = paragraph_index + 1;
            self.open.push(profile);
        }
    }

    fn close_open(&mut self) {
        let children_raw = std::mem::take(&mut self.pending_children);
        for profile in std::mem::take(&mut self.open) {
            let expanded: Vec<Profile> = children_raw
                .iter()
                .flat_map(|raw| children::expand(&profile, raw))
                .collect();
            self.done.push(profile);
            self.done.extend(expanded);
        }
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UNCATEGORIZED;

    fn build(paragraphs: &[&str]) -> Vec<Profile> {
        let patterns = ScanPatterns::default();
        let mut builder = ProfileBuilder::new(&patterns, String::new());
        for (index, text) in paragraphs.iter().enumerate() {
            if patterns.section.is_match(text.trim()) {
                builder.section(text);
            } else {
                builder.content(index, text);
            }
        }
        builder.finish().0
    }

    #[test]
    fn single_profile_with_fields() {
        let profiles = build(&[
            "GENERATION I: PARENTS",
            "John Smith {1}",
            "Born: 1750 in Boston",
            "Died: 1820 in Boston",
        ]);
        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.id, "1");
        assert_eq!(profile.name, "John Smith");
        assert_eq!(profile.generation, "GENERATION I: PARENTS");
        assert_eq!(
            profile.vital_stats.born_date.as_deref(),
            Some("1750 in Boston")
        );
    }

    #[test]
    fn profiles_before_any_header_are_uncategorized() {
        let profiles = build(&["John Smith {1}"]);
        assert_eq!(profiles[0].generation, UNCATEGORIZED);
    }

    #[test]
    fn alias_chain_shares_name_and_fields() {
        let profiles = build(&[
            "John Smith & Mary Smith {1} & {2}",
            "Born: 1750 in Boston",
        ]);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "1");
        assert_eq!(profiles[1].id, "2");
        assert_eq!(profiles[0].name, profiles[1].name);
        assert_eq!(profiles[0].vital_stats.born_date, profiles[1].vital_stats.born_date);
    }

    #[test]
    fn non_conjunction_separator_breaks_alias_chain() {
        let profiles = build(&["Ezra Talcott {4}, brother of {5}"]);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id, "4");
    }

    #[test]
    fn duplicate_identifier_is_dropped() {
        let profiles = build(&[
            "John Smith {1}",
            "Born: 1750",
            "John Smith the elder {1}",
            "Born: 1710",
        ]);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].vital_stats.born_date.as_deref(), Some("1750"));
    }

    #[test]
    fn field_line_mentioning_an_id_does_not_open_a_profile() {
        let profiles = build(&[
            "John Smith {1}",
            "Married: Sarah, see {2}",
            "NOTES: moved west.",
        ]);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].story.notes, "moved west.");
    }

    #[test]
    fn source_tag_is_stripped_from_the_name() {
        let profiles = build(&["John Smith [source: 1364] {1}"]);
        assert_eq!(profiles[0].name, "John Smith");
        assert_eq!(profiles[0].metadata.source_id.as_deref(), Some("1364"));
    }

    #[test]
    fn children_field_expands_into_synthetic_profiles() {
        let profiles = build(&[
            "Ezra Talcott {4}",
            "Children: Mary (1791); and others",
            "John Smith {5}",
        ]);
        assert_eq!(profiles.len(), 3);
        assert_eq!(profiles[1].id, "4.c1");
        assert!(profiles[1].is_synthetic());
        assert_eq!(profiles[2].id, "5");
    }

    #[test]
    fn section_header_closes_open_profile() {
        let profiles = build(&[
            "GENERATION I",
            "John Smith {1}",
            "GENERATION II",
            "Born: 1750",
        ]);
        // The born line lands after the header closed the profile.
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].vital_stats.born_date, None);
    }

    #[test]
    fn repeated_notes_lines_concatenate() {
        let profiles = build(&[
            "John Smith {1}",
            "NOTES: kept the ferry.",
            "NOTES: later a miller.",
        ]);
        assert_eq!(profiles[0].story.notes, "kept the ferry. later a miller.");
    }
}
