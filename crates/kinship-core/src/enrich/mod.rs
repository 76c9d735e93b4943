//! External enrichment collaborators. Everything here is outside the
//! extraction core: lookups are cache-checked first, individually
//! skippable, and never abort the batch. Negative results are cached
//! uniformly across all three collaborators.

pub mod cache;
pub mod geocode;
pub mod imagery;
pub mod ships;

pub use cache::{JsonFileCache, KvCache, MemoryCache};
pub use geocode::{GeoPoint, Geocoder};
pub use imagery::{HeroImage, HeroImageFinder, ImageSource, NullImageSource};
pub use ships::{HttpShipSource, NullShipSource, ShipEnricher, ShipFacts, ShipSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response")]
    Malformed,
}
