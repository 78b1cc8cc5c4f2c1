use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{Coordinates, DistanceProvider, GeoError, GeocodeMatch, Geocoder, RouteSummary};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Google Maps client covering both consumed contracts: Geocoding API for
/// address resolution and Distance Matrix API for driving routes.
pub struct GoogleMapsClient {
    api_key: String,
    client: Client,
}

impl GoogleMapsClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { api_key, client }
    }
}

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    #[serde(default)]
    types: Vec<String>,
    place_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    location: Option<LatLng>,
    location_type: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str, country: &str) -> Result<Option<GeocodeMatch>, GeoError> {
        let response = self
            .client
            .get(GEOCODE_URL)
            .query(&[
                ("address", address),
                ("components", &format!("country:{country}")),
                ("language", "es"),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(None),
            status => {
                return Err(GeoError::Provider(format!(
                    "geocoding status {status}: {}",
                    response.error_message.unwrap_or_default()
                )))
            }
        }

        // Best match first. A result without coordinates is as useless as no
        // result at all.
        let Some(result) = response.results.into_iter().next() else {
            return Ok(None);
        };
        let Some(location) = result.geometry.as_ref().and_then(|g| g.location.as_ref()) else {
            return Ok(None);
        };

        Ok(Some(GeocodeMatch {
            coords: Coordinates {
                lat: location.lat,
                lng: location.lng,
            },
            formatted_address: result
                .formatted_address
                .unwrap_or_else(|| address.to_string()),
            place_types: result.types,
            precision: result
                .geometry
                .as_ref()
                .and_then(|g| g.location_type.clone())
                .unwrap_or_else(|| "APPROXIMATE".to_string()),
            place_id: result.place_id,
        }))
    }
}

#[derive(Deserialize, Debug)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Deserialize, Debug)]
struct DistanceMatrixRow {
    #[serde(default)]
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Deserialize, Debug)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Deserialize, Debug)]
struct TextValue {
    text: Option<String>,
    value: i64,
}

#[async_trait]
impl DistanceProvider for GoogleMapsClient {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteSummary, GeoError> {
        let origins = format!("{},{}", origin.lat, origin.lng);
        let destinations = format!("{},{}", destination.lat, destination.lng);
        tracing::info!(%origins, %destinations, "requesting driving route");

        let raw = self
            .client
            .get(DISTANCE_MATRIX_URL)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "driving"),
                ("units", "metric"),
                ("language", "es"),
                ("key", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let response: DistanceMatrixResponse = serde_json::from_value(raw.clone())
            .map_err(|e| GeoError::Provider(format!("unexpected distance matrix shape: {e}")))?;

        if response.status != "OK" {
            return Err(GeoError::Provider(format!(
                "distance matrix status {}",
                response.status
            )));
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|r| r.elements.into_iter().next())
            .ok_or_else(|| GeoError::Provider("distance matrix returned no route".to_string()))?;

        if element.status != "OK" {
            return Err(GeoError::Provider(format!(
                "route element status {}",
                element.status
            )));
        }

        let distance = element
            .distance
            .ok_or_else(|| GeoError::Provider("route element missing distance".to_string()))?;
        let duration = element
            .duration
            .ok_or_else(|| GeoError::Provider("route element missing duration".to_string()))?;

        let distance_km = (distance.value as f64 / 1000.0 * 100.0).round() / 100.0;
        let duration_minutes = ((duration.value as f64) / 60.0).round() as i32;

        Ok(RouteSummary {
            distance_km,
            distance_text: distance
                .text
                .unwrap_or_else(|| format!("{distance_km:.2} km")),
            duration_minutes,
            duration_text: duration
                .text
                .unwrap_or_else(|| format!("{duration_minutes} min")),
            raw,
        })
    }
}
