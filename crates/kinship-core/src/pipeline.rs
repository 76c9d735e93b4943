use std::time::Instant;

use crate::link::{self, SpousePolicy};
use crate::profile::Profile;
use crate::resolve::{self, MentionResolver, NameIndex};
use crate::scan::{DocumentScanner, ScanPatterns};
use crate::{story, tags, vitals};

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    pub profiles: usize,
    pub duplicate_ids: usize,
    pub synthetic_children: usize,
    pub merged_children: usize,
    pub retained_children: usize,
    pub parent_child_edges: usize,
    pub spouse_edges: usize,
    pub mention_links: usize,
    pub reciprocal_links: usize,
    pub ambiguous_mentions: usize,
    pub tags_applied: usize,
    pub duration_ms: u64,
}

pub struct PipelineOutput {
    pub profiles: Vec<Profile>,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let raw = if pretty {
            serde_json::to_string_pretty(&self.profiles)?
        } else {
            serde_json::to_string(&self.profiles)?
        };
        Ok(raw)
    }
}

/// The full extraction and entity-resolution pipeline. Stages run
/// strictly in order over a single in-memory profile set: the linear
/// document scan first, then the whole-set passes, each completing before
/// the next begins.
pub struct Pipeline {
    patterns: ScanPatterns,
    lineage: String,
    spouse_policy: Box<dyn SpousePolicy>,
    resolver: MentionResolver,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: ScanPatterns::default(),
            lineage: String::new(),
            spouse_policy: Box::new(link::AhnentafelPairing),
            resolver: MentionResolver::default(),
        }
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
    pub fn with_spouse_policy(mut self, policy: Box<dyn SpousePolicy>) -> Self {
        self.spouse_policy = policy;
        self
    }

    #[must_use]
    pub fn with_mention_resolver(mut self, resolver: MentionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn run<S: AsRef<str>>(&self, paragraphs: &[S]) -> PipelineOutput {
        let start = Instant::now();
        let mut stats = PipelineStats::default();

        let scan = DocumentScanner::new()
            .with_patterns(self.patterns.clone())
            .with_lineage(self.lineage.clone())
            .scan(paragraphs);
        let mut profiles = scan.profiles;
        stats.duplicate_ids = scan.duplicate_ids;
        stats.synthetic_children = profiles.iter().filter(|p| p.is_synthetic()).count();
        tracing::info!(profiles = profiles.len(), "scan stage complete");

        for profile in &mut profiles {
            vitals::apply(&mut profile.vital_stats);
        }

        let link_stats = link::link(&mut profiles, self.spouse_policy.as_ref());
        stats.parent_child_edges = link_stats.parent_child_edges;
        stats.spouse_edges = link_stats.spouse_edges;

        let (mut profiles, reconcile_stats) = link::reconcile(profiles);
        stats.merged_children = reconcile_stats.merged;
        stats.retained_children = reconcile_stats.retained;

        for profile in &mut profiles {
            story::apply(profile);
        }

        let index = NameIndex::build(&profiles);
        let mention_stats = self.resolver.resolve(&mut profiles, &index);
        stats.mention_links = mention_stats.links;
        stats.reciprocal_links = mention_stats.reciprocal_links;
        stats.ambiguous_mentions = mention_stats.ambiguous_skipped;
        resolve::populate_associates(&mut profiles);
        resolve::echo::detect(&mut profiles);

        let tag_stats = tags::classify(&mut profiles);
        stats.tags_applied = tag_stats.tags_applied;

        stats.profiles = profiles.len();
        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            profiles = stats.profiles,
            mention_links = stats.mention_links,
            "pipeline complete"
        );

        PipelineOutput { profiles, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_single_profile() {
        let output = Pipeline::new().run(&[
            "GENERATION I: PARENTS",
            "John Smith {1}",
            "Born: 1750 in Boston",
            "Died: 1820 in Boston",
        ]);

        assert_eq!(output.profiles.len(), 1);
        let profile = &output.profiles[0];
        assert_eq!(profile.id, "1");
        assert_eq!(profile.generation, "GENERATION I: PARENTS");
        assert_eq!(profile.vital_stats.born_year, Some(1750));
        assert_eq!(profile.vital_stats.died_year, Some(1820));
        assert_eq!(profile.vital_stats.born_location.as_deref(), Some("Boston"));
        assert_eq!(profile.vital_stats.died_location.as_deref(), Some("Boston"));
    }

    #[test]
    fn aliases_share_fields_without_implied_kinship() {
        let output = Pipeline::new().run(&[
            "John Smith & Mary Smith {1} & {2}",
            "Born: 1750 in Boston",
        ]);

        assert_eq!(output.profiles.len(), 2);
        let (a, b) = (&output.profiles[0], &output.profiles[1]);
        assert_eq!(a.name, b.name);
        assert_eq!(a.vital_stats.born_year, b.vital_stats.born_year);
        assert!(a.relations.parents.is_empty());
        assert!(a.relations.children.is_empty());
        // The structural id-pairing rule does apply to 1 and 2.
        assert!(a.relations.spouses.contains("2"));
    }

    #[test]
    fn ids_are_unique_in_output() {
        let output = Pipeline::new().run(&[
            "John Smith {1}",
            "John Smith again {1}",
            "Mary Smith {2}",
        ]);

        let mut ids: Vec<&str> = output.profiles.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), output.profiles.len());
        assert_eq!(output.stats.duplicate_ids, 1);
    }

    #[test]
    fn truncated_id_ancestry_is_mutual() {
        let output = Pipeline::new().run(&["Adam Strong {2}", "Seth Strong {2.3}"]);

        let by_id = |id: &str| {
            output
                .profiles
                .iter()
                .find(|p| p.id == id)
                .unwrap()
        };
        assert!(by_id("2").relations.children.contains("2.3"));
        assert!(by_id("2.3").relations.parents.contains("2"));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let paragraphs = [
            "GENERATION I",
            "Ezra Talcott {1}",
            "Born: 1720 in Hartford",
            "Children: Mary (1745); Samuel",
            "NOTES: He emigrated with his cousin Samuel Welles. [Ship: Hector | Year: 1773]",
            "Samuel Welles {3}",
            "Born: 1722 in Hartford",
        ];

        let pipeline = Pipeline::new();
        let first = pipeline.run(&paragraphs).to_json(true).unwrap();
        let second = pipeline.run(&paragraphs).to_json(true).unwrap();
        assert_eq!(first, second);
    }
}
