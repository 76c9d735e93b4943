use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use kinship_core::enrich::{Geocoder, JsonFileCache};
use kinship_core::Pipeline;

use super::parse::read_paragraphs;

pub fn run(input: &Path, cache: Option<&Path>) -> Result<()> {
    let paragraphs = read_paragraphs(input)?;
    let result = Pipeline::new().run(&paragraphs);

    let mut locations: BTreeSet<String> = BTreeSet::new();
    for profile in &result.profiles {
        locations.extend(profile.vital_stats.born_location.iter().cloned());
        locations.extend(profile.vital_stats.died_location.iter().cloned());
    }

    let cache_path = cache.map_or_else(|| JsonFileCache::default_path("geocode"), Path::to_path_buf);
    let cache = JsonFileCache::open(&cache_path)
        .with_context(|| format!("could not open cache {}", cache_path.display()))?;
    let mut geocoder = Geocoder::new(Box::new(cache));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        for location in &locations {
            match geocoder.geocode(location).await {
                Some(point) => println!(
                    "{location} -> {:.4}, {:.4} {}",
                    point.lat,
                    point.lng,
                    style(format!("(tier {})", point.tier)).dim()
                ),
                None => println!("{location} -> {}", style("unresolved").yellow()),
            }
        }
    });

    geocoder.flush()?;
    Ok(())
}
