use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cache::KvCache;
use super::EnrichError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_built: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tonnage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masts: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where ship facts come from on a cache miss. The production source is
/// an external generative service; tests and offline runs use the null
/// source.
#[async_trait]
pub trait ShipSource: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<Option<ShipFacts>, EnrichError>;
}

pub struct NullShipSource;

#[async_trait]
impl ShipSource for NullShipSource {
    async fn lookup(&self, _name: &str) -> Result<Option<ShipFacts>, EnrichError> {
        Ok(None)
    }
}

/// JSON-over-HTTP source: GET `{endpoint}?name=...` returning `ShipFacts`
/// or 404 for an unknown vessel.
pub struct HttpShipSource {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpShipSource {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: url::Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl ShipSource for HttpShipSource {
    async fn lookup(&self, name: &str) -> Result<Option<ShipFacts>, EnrichError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("name", name);

        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let facts = response.error_for_status()?.json().await?;
        Ok(Some(facts))
    }
}

/// Cache-first ship enrichment. Misses and failures are cached alike, so
/// a warm cache never re-queries; drop the entry to force a retry.
pub struct ShipEnricher {
    cache: Box<dyn KvCache>,
    source: Box<dyn ShipSource>,
}

impl ShipEnricher {
    #[must_use]
    pub fn new(cache: Box<dyn KvCache>, source: Box<dyn ShipSource>) -> Self {
        Self { cache, source }
    }

    pub async fn enrich(&mut self, name: &str) -> Option<ShipFacts> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(&key) {
            if cached.is_null() {
                return None;
            }
            return serde_json::from_value(cached).ok();
        }

        match self.source.lookup(name).await {
            Ok(Some(facts)) => {
                let stored = serde_json::to_value(&facts).unwrap_or(Value::Null);
                self.cache.put(&key, stored);
                Some(facts)
            }
            Ok(None) => {
                self.cache.put(&key, Value::Null);
                None
            }
            Err(error) => {
                tracing::warn!(%error, ship = %name, "ship enrichment failed");
                self.cache.put(&key, Value::Null);
                None
            }
        }
    }

    pub fn flush(&mut self) -> crate::Result<()> {
        self.cache.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::cache::MemoryCache;

    struct StaticSource(ShipFacts);

    #[async_trait]
    impl ShipSource for StaticSource {
        async fn lookup(&self, _name: &str) -> Result<Option<ShipFacts>, EnrichError> {
            Ok(Some(self.0.clone()))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ShipSource for FailingSource {
        async fn lookup(&self, _name: &str) -> Result<Option<ShipFacts>, EnrichError> {
            Err(EnrichError::Malformed)
        }
    }

    #[tokio::test]
    async fn cache_answers_before_the_source() {
        let mut cache = MemoryCache::new();
        cache.put(
            "hector",
            serde_json::json!({"year_built": 1750, "masts": 3}),
        );
        let mut enricher = ShipEnricher::new(Box::new(cache), Box::new(FailingSource));

        let facts = enricher.enrich("Hector").await.unwrap();
        assert_eq!(facts.year_built, Some(1750));
        assert_eq!(facts.masts, Some(3));
    }

    #[tokio::test]
    async fn source_results_are_cached() {
        let facts = ShipFacts {
            year_built: Some(1750),
            ..ShipFacts::default()
        };
        let mut enricher =
            ShipEnricher::new(Box::new(MemoryCache::new()), Box::new(StaticSource(facts)));

        assert!(enricher.enrich("Hector").await.is_some());
        assert!(enricher.cache.get("hector").is_some());
    }

    #[tokio::test]
    async fn failures_cache_as_misses() {
        let mut enricher =
            ShipEnricher::new(Box::new(MemoryCache::new()), Box::new(FailingSource));

        assert!(enricher.enrich("Hector").await.is_none());
        assert_eq!(enricher.cache.get("hector"), Some(Value::Null));
    }

    #[tokio::test]
    async fn null_source_misses_quietly() {
        let mut enricher =
            ShipEnricher::new(Box::new(MemoryCache::new()), Box::new(NullShipSource));
        assert!(enricher.enrich("Hector").await.is_none());
    }
}
