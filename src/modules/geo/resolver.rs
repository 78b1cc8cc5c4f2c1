use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::cache::{AddressCache, CacheStats};
use super::granularity::{self, Granularity, ValidationLevel};
use super::provider::{GeoError, Geocoder};

/// A geocoded address, classified for shipping eligibility.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedAddress {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    pub granularity: Granularity,
    pub validation_level: ValidationLevel,
    pub confidence: f64,
    pub warning_message: Option<String>,
    pub place_id: Option<String>,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no match for address")]
    NotFound,

    #[error(transparent)]
    Provider(#[from] GeoError),
}

/// Wraps a [`Geocoder`] with the country restriction, the TTL cache, and the
/// granularity/confidence policy. Callers must pass a non-empty address.
pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: AddressCache,
    country: String,
}

impl AddressResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, country: String, cache_ttl: Duration) -> Self {
        Self {
            geocoder,
            cache: AddressCache::new(cache_ttl),
            country,
        }
    }

    pub async fn resolve(&self, address: &str) -> Result<ResolvedAddress, ResolveError> {
        if let Some(cached) = self.cache.get(address) {
            return Ok(cached);
        }

        tracing::info!(%address, "geocoding address");
        let matched = self
            .geocoder
            .geocode(address, &self.country)
            .await?
            .ok_or(ResolveError::NotFound)?;

        let granularity = granularity::classify(&matched.place_types);
        let validation_level = granularity::validation_level(granularity);
        let warning_message = granularity::warning_message(granularity);
        let confidence = granularity::confidence(&matched.precision, granularity);

        let resolved = ResolvedAddress {
            lat: matched.coords.lat,
            lng: matched.coords.lng,
            formatted_address: matched.formatted_address,
            granularity,
            validation_level,
            confidence,
            warning_message,
            place_id: matched.place_id,
        };

        self.cache.set(address.to_string(), resolved.clone());
        Ok(resolved)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::geo::provider::{Coordinates, GeocodeMatch};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGeocoder {
        calls: AtomicUsize,
        result: Option<GeocodeMatch>,
    }

    impl CountingGeocoder {
        fn returning(result: Option<GeocodeMatch>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result,
            })
        }
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn geocode(
            &self,
            _address: &str,
            _country: &str,
        ) -> Result<Option<GeocodeMatch>, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn premise_match() -> GeocodeMatch {
        GeocodeMatch {
            coords: Coordinates {
                lat: -33.42,
                lng: -70.61,
            },
            formatted_address: "Av. Ricardo Lyon 1841, Providencia, Chile".to_string(),
            place_types: vec!["street_address".to_string()],
            precision: "ROOFTOP".to_string(),
            place_id: None,
        }
    }

    #[tokio::test]
    async fn resolves_and_classifies() {
        let geocoder = CountingGeocoder::returning(Some(premise_match()));
        let resolver = AddressResolver::new(
            geocoder.clone(),
            "CL".to_string(),
            Duration::from_secs(3600),
        );

        let resolved = resolver.resolve("Av. Ricardo Lyon 1841").await.unwrap();
        assert_eq!(resolved.granularity, Granularity::Premise);
        assert_eq!(resolved.validation_level, ValidationLevel::Accept);
        assert_eq!(resolved.confidence, 1.0);
        assert!(resolved.warning_message.is_none());
    }

    #[tokio::test]
    async fn second_resolve_within_ttl_hits_cache() {
        let geocoder = CountingGeocoder::returning(Some(premise_match()));
        let resolver = AddressResolver::new(
            geocoder.clone(),
            "CL".to_string(),
            Duration::from_secs(3600),
        );

        resolver.resolve("Av. Ricardo Lyon 1841").await.unwrap();
        resolver.resolve("Av. Ricardo Lyon 1841").await.unwrap();
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_second_call() {
        let geocoder = CountingGeocoder::returning(Some(premise_match()));
        let resolver =
            AddressResolver::new(geocoder.clone(), "CL".to_string(), Duration::ZERO);

        resolver.resolve("Av. Ricardo Lyon 1841").await.unwrap();
        resolver.resolve("Av. Ricardo Lyon 1841").await.unwrap();
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let geocoder = CountingGeocoder::returning(None);
        let resolver = AddressResolver::new(
            geocoder.clone(),
            "CL".to_string(),
            Duration::from_secs(3600),
        );

        let err = resolver.resolve("asdf").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound));
        // failures are not cached
        let _ = resolver.resolve("asdf").await;
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }
}
