use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cache::KvCache;
use super::EnrichError;
use crate::vitals::{detect_region, Region};

/// Which layer answered: 1 gazetteer, 2 historical places, 3 region
/// centroid, 4 disk cache, 5 live lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub tier: u8,
}

/// Frequent towns in the narrative corpus; exact lowercase match on the
/// leading token of the location string.
const GAZETTEER: &[(&str, f64, f64)] = &[
    ("boston", 42.3601, -71.0589),
    ("hartford", 41.7658, -72.6734),
    ("new haven", 41.3083, -72.9279),
    ("wethersfield", 41.7143, -72.6526),
    ("glastonbury", 41.7123, -72.6082),
    ("warren", 42.2126, -72.1912),
    ("london", 51.5072, -0.1276),
    ("braintree", 51.8780, 0.5500),
    ("greenock", 55.9486, -4.7613),
    ("pictou", 45.6786, -62.7103),
    ("new york", 40.7128, -74.0060),
    ("philadelphia", 39.9526, -75.1652),
];

/// Places that no longer exist under their recorded names.
const HISTORICAL_PLACES: &[(&str, f64, f64)] = &[
    ("new amsterdam", 40.7128, -74.0060),
    ("massachusetts bay colony", 42.3601, -71.0589),
    ("connecticut colony", 41.7658, -72.6734),
    ("plymouth colony", 41.9584, -70.6673),
    ("saybrook colony", 41.2918, -72.3764),
];

const REGION_CENTROIDS: &[(Region, f64, f64)] = &[
    (Region::Usa, 39.8283, -98.5795),
    (Region::Uk, 54.0000, -2.0000),
];

/// Tiered place lookup: curated tables first, then the disk cache, then
/// (optionally) a live lookup whose answers — including misses — are
/// cached so warm runs never re-query.
pub struct Geocoder {
    cache: Box<dyn KvCache>,
    client: Option<reqwest::Client>,
    endpoint: Option<url::Url>,
}

impl Geocoder {
    #[must_use]
    pub fn new(cache: Box<dyn KvCache>) -> Self {
        Self {
            cache,
            client: None,
            endpoint: None,
        }
    }

    /// Enable the live tier against a Nominatim-style search endpoint.
    #[must_use]
    pub fn with_live_lookup(mut self, client: reqwest::Client, endpoint: url::Url) -> Self {
        self.client = Some(client);
        self.endpoint = Some(endpoint);
        self
    }

    pub async fn geocode(&mut self, location: &str) -> Option<GeoPoint> {
        let key = location.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }

        let head = key.split(',').next().unwrap_or(&key).trim();
        if let Some(&(_, lat, lng)) = GAZETTEER.iter().find(|(name, _, _)| *name == head) {
            return Some(GeoPoint { lat, lng, tier: 1 });
        }

        if let Some(&(_, lat, lng)) = HISTORICAL_PLACES
            .iter()
            .find(|(name, _, _)| key.contains(name))
        {
            return Some(GeoPoint { lat, lng, tier: 2 });
        }

        let region = detect_region(&key);
        if let Some(&(_, lat, lng)) = REGION_CENTROIDS.iter().find(|(r, _, _)| *r == region) {
            return Some(GeoPoint { lat, lng, tier: 3 });
        }

        if let Some(cached) = self.cache.get(&key) {
            if cached.is_null() {
                return None;
            }
            return serde_json::from_value(cached)
                .map(|point: GeoPoint| GeoPoint { tier: 4, ..point })
                .ok();
        }

        match self.live_lookup(&key).await {
            Ok(Some(point)) => {
                let stored = serde_json::to_value(point).unwrap_or(Value::Null);
                self.cache.put(&key, stored);
                Some(point)
            }
            Ok(None) => {
                self.cache.put(&key, Value::Null);
                None
            }
            Err(error) => {
                // Transient failures are cached as misses too; delete the
                // entry to allow a retry.
                tracing::warn!(%error, location = %key, "live geocode failed");
                self.cache.put(&key, Value::Null);
                None
            }
        }
    }

    pub fn flush(&mut self) -> crate::Result<()> {
        self.cache.flush()
    }

    async fn live_lookup(&self, query: &str) -> Result<Option<GeoPoint>, EnrichError> {
        let (Some(client), Some(endpoint)) = (&self.client, &self.endpoint) else {
            return Ok(None);
        };

        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let response = client.get(url).send().await?.error_for_status()?;
        let results: Vec<NominatimHit> = response.json().await?;
        let Some(hit) = results.into_iter().next() else {
            return Ok(None);
        };

        let lat = hit.lat.parse().map_err(|_| EnrichError::Malformed)?;
        let lng = hit.lon.parse().map_err(|_| EnrichError::Malformed)?;
        Ok(Some(GeoPoint { lat, lng, tier: 5 }))
    }
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::cache::MemoryCache;

    fn geocoder() -> Geocoder {
        Geocoder::new(Box::new(MemoryCache::new()))
    }

    #[tokio::test]
    async fn gazetteer_answers_first() {
        let point = geocoder().geocode("Boston, MA").await.unwrap();
        assert_eq!(point.tier, 1);
        assert!((point.lat - 42.36).abs() < 0.01);
    }

    #[tokio::test]
    async fn historical_places_answer_second() {
        let point = geocoder().geocode("New Amsterdam").await.unwrap();
        assert_eq!(point.tier, 2);
    }

    #[tokio::test]
    async fn region_centroid_is_the_structural_fallback() {
        let point = geocoder().geocode("Somewhere, Connecticut").await.unwrap();
        assert_eq!(point.tier, 3);
    }

    #[tokio::test]
    async fn cached_negative_results_stay_negative() {
        let mut cache = MemoryCache::new();
        cache.put("atlantis", Value::Null);
        let mut geocoder = Geocoder::new(Box::new(cache));
        assert!(geocoder.geocode("Atlantis").await.is_none());
    }

    #[tokio::test]
    async fn cached_points_answer_at_tier_4() {
        let mut cache = MemoryCache::new();
        cache.put(
            "tadoussac",
            serde_json::json!({"lat": 48.14, "lng": -69.71, "tier": 5}),
        );
        let mut geocoder = Geocoder::new(Box::new(cache));
        let point = geocoder.geocode("Tadoussac").await.unwrap();
        assert_eq!(point.tier, 4);
    }

    #[tokio::test]
    async fn unknown_place_without_live_tier_caches_a_miss() {
        let mut geocoder = geocoder();
        assert!(geocoder.geocode("Atlantis").await.is_none());
        // Second call hits the cached miss rather than re-deciding.
        assert!(geocoder.geocode("Atlantis").await.is_none());
    }
}
