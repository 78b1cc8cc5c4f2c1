use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::modules::geo::google::GoogleMapsClient;
use crate::modules::geo::provider::{DistanceProvider, Geocoder};

/// One Google Maps client serves both contracts. Provider choice is a
/// strategy behind the two traits, not a fixed dependency of the callers.
pub fn init_geo_providers(config: &Config) -> (Arc<dyn Geocoder>, Arc<dyn DistanceProvider>) {
    let client = Arc::new(GoogleMapsClient::new(
        config.google_maps_api_key.clone(),
        Duration::from_secs(config.provider_timeout_seconds),
    ));
    (client.clone(), client)
}
