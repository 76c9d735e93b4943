use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use kinship_core::{NoSpousePairing, Pipeline};

pub fn run(
    input: &Path,
    output: Option<&Path>,
    lineage: Option<&str>,
    pretty: bool,
    no_spouse_pairing: bool,
) -> Result<()> {
    let paragraphs = read_paragraphs(input)?;

    let mut pipeline = Pipeline::new().with_lineage(lineage.unwrap_or_default());
    if no_spouse_pairing {
        pipeline = pipeline.with_spouse_policy(Box::new(NoSpousePairing));
    }

    let result = pipeline.run(&paragraphs);
    let json = result.to_json(pretty)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("could not write {}", path.display()))?;
            eprintln!(
                "{} {} profiles -> {}",
                style("✓").green(),
                result.stats.profiles,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// The document is consumed once, front to back; failing to read it is
/// fatal before any profile is emitted.
pub(crate) fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read source document {}", path.display()))?;
    Ok(raw.lines().map(str::to_string).collect())
}
