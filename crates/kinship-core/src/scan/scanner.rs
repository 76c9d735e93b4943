use std::sync::LazyLock;

use regex::Regex;

/// Compiled recognizers for the document's ad hoc textual conventions.
///
/// The section pattern is the one knob callers commonly replace; the rest
/// mirror the narrative style the pipeline is tuned to.
#[derive(Debug, Clone)]
pub struct ScanPatterns {
    pub section: Regex,
    pub id_token: Regex,
    pub born: Regex,
    pub died: Regex,
    pub notes: Regex,
    pub children: Regex,
    pub source_tag: Regex,
    pub cross_reference: Regex,
    pub relation_pointer: Regex,
}

static DEFAULT_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^GENERATION\s+(?:[IVXLCDM]+|\d+)\b").unwrap());

impl Default for ScanPatterns {
    fn default() -> Self {
        Self {
            section: DEFAULT_SECTION.clone(),
            id_token: Regex::new(r"\{(\d+(?:\.\d+)*)\}").unwrap(),
            born: Regex::new(r"(?i)Born:\s*(.*)").unwrap(),
            died: Regex::new(r"(?i)Died:\s*(.*)").unwrap(),
            notes: Regex::new(r"(?i)NOTES:\s*(.*)").unwrap(),
            children: Regex::new(r"(?i)Children:\s*(.*)").unwrap(),
            source_tag: Regex::new(r"(?i)\[source:\s*(.*?)\]").unwrap(),
            cross_reference: Regex::new(r"(?i)\b(?:see|cf)\.?\s*\{").unwrap(),
            relation_pointer: Regex::new(
                r"(?i)^(?:father|mother|parents?|son|daughter|husband|wife|spouse|married)\s*[:=]",
            )
            .unwrap(),
        }
    }
}

impl ScanPatterns {
    #[must_use]
    pub fn with_section(mut self, section: Regex) -> Self {
        self.section = section;
        self
    }

    /// A recognized field line never starts a new profile, even when it
    /// happens to mention another person's identifier token.
    #[must_use]
    pub fn is_field_line(&self, text: &str) -> bool {
        self.born.is_match(text)
            || self.died.is_match(text)
            || self.notes.is_match(text)
            || self.children.is_match(text)
            || self.cross_reference.is_match(text)
            || self.relation_pointer.is_match(text)
    }

    #[must_use]
    pub fn is_profile_start(&self, text: &str) -> bool {
        self.id_token.is_match(text) && !self.is_field_line(text)
    }
}

/// How a single paragraph participates in the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphClass {
    Blank,
    SectionHeader,
    ProfileStart,
    FieldLine,
    FreeText,
}

#[must_use]
pub fn classify(patterns: &ScanPatterns, text: &str) -> ParagraphClass {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParagraphClass::Blank;
    }
    if patterns.section.is_match(trimmed) {
        return ParagraphClass::SectionHeader;
    }
    if patterns.is_profile_start(trimmed) {
        return ParagraphClass::ProfileStart;
    }
    if patterns.is_field_line(trimmed) {
        return ParagraphClass::FieldLine;
    }
    ParagraphClass::FreeText
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_section_headers() {
        let patterns = ScanPatterns::default();
        assert_eq!(
            classify(&patterns, "GENERATION I: PARENTS"),
            ParagraphClass::SectionHeader
        );
        assert_eq!(
            classify(&patterns, "generation 4 - the emigrants"),
            ParagraphClass::SectionHeader
        );
    }

    #[test]
    fn classifies_profile_starts() {
        let patterns = ScanPatterns::default();
        assert_eq!(
            classify(&patterns, "John Smith {1}"),
            ParagraphClass::ProfileStart
        );
        assert_eq!(
            classify(&patterns, "Mary Smith [source: 1364] {2.1}"),
            ParagraphClass::ProfileStart
        );
    }

    #[test]
    fn field_lines_with_id_tokens_do_not_start_profiles() {
        let patterns = ScanPatterns::default();
        assert_eq!(
            classify(&patterns, "Married: Sarah Brown, see {4}"),
            ParagraphClass::FieldLine
        );
        assert_eq!(
            classify(&patterns, "NOTES: raised by his uncle {7} after 1802."),
            ParagraphClass::FieldLine
        );
        assert_eq!(
            classify(&patterns, "see {12} for the younger line"),
            ParagraphClass::FieldLine
        );
    }

    #[test]
    fn everything_else_is_free_text() {
        let patterns = ScanPatterns::default();
        assert_eq!(
            classify(&patterns, "The family kept a farm near the river."),
            ParagraphClass::FreeText
        );
        assert_eq!(classify(&patterns, "   "), ParagraphClass::Blank);
    }
}
