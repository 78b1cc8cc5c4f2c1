pub mod providers;
pub mod repositories;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::modules::geo::resolver::AddressResolver;
use crate::modules::shipping::service::{DefaultOrigin, QuoteService};
use crate::shared::clock::SystemClock;
use crate::shared::state::AppState;

pub async fn create_app_state(config: &Config) -> AppState {
    let (method_repo, zone_repo, quote_repo) = repositories::init_repositories(config).await;
    let (geocoder, distance) = providers::init_geo_providers(config);

    let resolver = Arc::new(AddressResolver::new(
        geocoder,
        config.geocode_country.clone(),
        Duration::from_secs(config.address_cache_ttl_hours * 3600),
    ));
    let clock = Arc::new(SystemClock::new(config.utc_offset_hours));

    let quote_service = Arc::new(QuoteService::new(
        resolver.clone(),
        distance,
        method_repo.clone(),
        zone_repo.clone(),
        quote_repo.clone(),
        clock.clone(),
        DefaultOrigin {
            lat: config.default_origin_lat,
            lng: config.default_origin_lng,
            name: config.default_origin_name.clone(),
        },
    ));

    AppState {
        config: Arc::new(config.clone()),
        method_repo,
        zone_repo,
        quote_repo,
        resolver,
        clock,
        quote_service,
    }
}
