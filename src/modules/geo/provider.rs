use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Best geocoding match for a free-text address.
#[derive(Clone, Debug)]
pub struct GeocodeMatch {
    pub coords: Coordinates,
    pub formatted_address: String,
    /// Provider place-type tags, e.g. `street_address`, `route`, `locality`.
    pub place_types: Vec<String>,
    /// Positional-precision tag, e.g. `ROOFTOP` or `APPROXIMATE`.
    pub precision: String,
    pub place_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub distance_text: String,
    pub duration_minutes: i32,
    pub duration_text: String,
    /// Full provider payload, persisted with each quote for audit.
    pub raw: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve the single best match for `address`, restricted to `country`.
    /// `Ok(None)` means the provider found no usable match (no result, or a
    /// result without coordinates).
    async fn geocode(&self, address: &str, country: &str) -> Result<Option<GeocodeMatch>, GeoError>;
}

#[async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Driving distance and duration between two points.
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteSummary, GeoError>;
}
