//! One deterministic linear pass over the document: paragraph
//! classification, the profile-building state machine, and children-field
//! expansion. Paragraph order is semantically significant here; nothing in
//! this module may reorder or batch lines.

pub mod builder;
pub mod children;
pub mod scanner;

pub use builder::ProfileBuilder;
pub use scanner::{classify, ParagraphClass, ScanPatterns};

use crate::profile::Profile;

#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub profiles: Vec<Profile>,
    pub duplicate_ids: usize,
}

/// Walks paragraphs in document order and feeds them through the
/// profile-building state machine.
#[derive(Debug, Default)]
pub struct DocumentScanner {
    patterns: ScanPatterns,
    lineage: String,
}

impl DocumentScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: ScanPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    #[must_use]
    pub fn with_lineage(mut self, lineage: impl Into<String>) -> Self {
        self.lineage = lineage.into();
        self
    }

    #[must_use]
    pub fn scan<S: AsRef<str>>(&self, paragraphs: &[S]) -> ScanOutput {
        let mut machine = ProfileBuilder::new(&self.patterns, self.lineage.clone());

        for (index, paragraph) in paragraphs.iter().enumerate() {
            let text = paragraph.as_ref().trim();
            match classify(&self.patterns, text) {
                ParagraphClass::Blank => {}
                ParagraphClass::SectionHeader => machine.section(text),
                _ => machine.content(index, text),
            }
        }

        let (profiles, duplicate_ids) = machine.finish();
        tracing::debug!(
            profiles = profiles.len(),
            duplicate_ids,
            "document scan complete"
        );
        ScanOutput {
            profiles,
            duplicate_ids,
        }
    }
}
