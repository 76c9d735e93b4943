use std::path::Path;

use anyhow::Result;
use console::style;

use kinship_core::Pipeline;

use super::parse::read_paragraphs;

pub fn run(input: &Path) -> Result<()> {
    let paragraphs = read_paragraphs(input)?;
    let result = Pipeline::new().run(&paragraphs);
    let stats = result.stats;

    let row = |label: &str, value: usize| {
        println!("  {} {value}", style(format!("{label}:")).dim());
    };

    println!("{}", style(input.display()).bold());
    row("profiles", stats.profiles);
    row("duplicate ids dropped", stats.duplicate_ids);
    row("synthetic children", stats.synthetic_children);
    row("children merged", stats.merged_children);
    row("children retained", stats.retained_children);
    row("parent/child edges", stats.parent_child_edges);
    row("spouse edges", stats.spouse_edges);
    row("mention links", stats.mention_links);
    row("reciprocal links", stats.reciprocal_links);
    row("ambiguous mentions skipped", stats.ambiguous_mentions);
    row("tags applied", stats.tags_applied);
    println!("  {} {}ms", style("elapsed:").dim(), stats.duration_ms);

    Ok(())
}
