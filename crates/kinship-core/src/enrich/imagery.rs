use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cache::KvCache;
use super::EnrichError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// External image-search service queried with a location+era phrase.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn search(&self, phrase: &str) -> Result<Option<HeroImage>, EnrichError>;
}

pub struct NullImageSource;

#[async_trait]
impl ImageSource for NullImageSource {
    async fn search(&self, _phrase: &str) -> Result<Option<HeroImage>, EnrichError> {
        Ok(None)
    }
}

/// Period imagery lookup keyed by (location, century), so every profile
/// from the same place and era shares one cache entry. Negative results
/// are cached to avoid repeat queries.
pub struct HeroImageFinder {
    cache: Box<dyn KvCache>,
    source: Box<dyn ImageSource>,
}

impl HeroImageFinder {
    #[must_use]
    pub fn new(cache: Box<dyn KvCache>, source: Box<dyn ImageSource>) -> Self {
        Self { cache, source }
    }

    pub async fn find(&mut self, location: &str, year: i32) -> Option<HeroImage> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        let century = century_of(year);
        let key = format!("{}|{century}", location.to_lowercase());

        if let Some(cached) = self.cache.get(&key) {
            if cached.is_null() {
                return None;
            }
            return serde_json::from_value(cached).ok();
        }

        let phrase = format!("{location}, {}", era_phrase(century));
        match self.source.search(&phrase).await {
            Ok(Some(image)) => {
                let stored = serde_json::to_value(&image).unwrap_or(Value::Null);
                self.cache.put(&key, stored);
                Some(image)
            }
            Ok(None) => {
                self.cache.put(&key, Value::Null);
                None
            }
            Err(error) => {
                tracing::warn!(%error, %phrase, "hero image search failed");
                self.cache.put(&key, Value::Null);
                None
            }
        }
    }

    pub fn flush(&mut self) -> crate::Result<()> {
        self.cache.flush()
    }
}

const fn century_of(year: i32) -> i32 {
    year.div_euclid(100) + 1
}

fn era_phrase(century: i32) -> String {
    let suffix = match century % 10 {
        1 if century % 100 != 11 => "st",
        2 if century % 100 != 12 => "nd",
        3 if century % 100 != 13 => "rd",
        _ => "th",
    };
    format!("{century}{suffix} century")
}
