use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::{json, Value};
use tower::ServiceExt;

use envio_backend::config::Config;
use envio_backend::modules::geo::provider::{
    Coordinates, DistanceProvider, GeoError, GeocodeMatch, Geocoder, RouteSummary,
};
use envio_backend::modules::geo::resolver::AddressResolver;
use envio_backend::modules::shipping::infra::persistence::{
    InMemoryMethodRepository, InMemoryQuoteRepository, InMemoryZoneRepository,
};
use envio_backend::modules::shipping::service::{DefaultOrigin, QuoteService};
use envio_backend::routers;
use envio_backend::shared::clock::{Clock, FixedClock};
use envio_backend::shared::state::AppState;

struct FakeGeocoder {
    calls: AtomicUsize,
    place_types: Vec<String>,
    precision: String,
    fail: bool,
}

impl FakeGeocoder {
    fn premise() -> Arc<Self> {
        Self::with_tags(&["street_address"], "ROOFTOP")
    }

    fn with_tags(tags: &[&str], precision: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            place_types: tags.iter().map(|t| t.to_string()).collect(),
            precision: precision.to_string(),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            place_types: vec![],
            precision: String::new(),
            fail: true,
        })
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(
        &self,
        address: &str,
        _country: &str,
    ) -> Result<Option<GeocodeMatch>, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GeoError::Provider("geocoding status REQUEST_DENIED".into()));
        }
        Ok(Some(GeocodeMatch {
            coords: Coordinates {
                lat: -33.42,
                lng: -70.60,
            },
            formatted_address: format!("{address}, Chile"),
            place_types: self.place_types.clone(),
            precision: self.precision.clone(),
            place_id: None,
        }))
    }
}

struct FakeDistance {
    distance_km: f64,
    fail: bool,
}

impl FakeDistance {
    fn returning(distance_km: f64) -> Arc<Self> {
        Arc::new(Self {
            distance_km,
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            distance_km: 0.0,
            fail: true,
        })
    }
}

#[async_trait]
impl DistanceProvider for FakeDistance {
    async fn route(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
    ) -> Result<RouteSummary, GeoError> {
        if self.fail {
            return Err(GeoError::Provider("distance matrix status OVER_QUERY_LIMIT".into()));
        }
        Ok(RouteSummary {
            distance_km: self.distance_km,
            distance_text: format!("{} km", self.distance_km),
            duration_minutes: 15,
            duration_text: "15 min".to_string(),
            raw: json!({ "status": "OK", "rows": [] }),
        })
    }
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 5,
        database_min_connections: 1,
        database_connect_timeout: 8,
        database_idle_timeout: 8,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        rust_log: "info".to_string(),
        app_env: "test".to_string(),
        google_maps_api_key: String::new(),
        geocode_country: "CL".to_string(),
        default_origin_lat: -33.4372,
        default_origin_lng: -70.6167,
        default_origin_name: "Providencia, Santiago, Chile".to_string(),
        address_cache_ttl_hours: 24,
        provider_timeout_seconds: 10,
        utc_offset_hours: -3,
    }
}

/// Tuesday at the given local time, Chilean offset.
fn tuesday_at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 4, hour, minute, 0)
        .unwrap()
}

fn setup(
    now: DateTime<FixedOffset>,
    geocoder: Arc<dyn Geocoder>,
    distance: Arc<dyn DistanceProvider>,
) -> axum::Router {
    let resolver = Arc::new(AddressResolver::new(
        geocoder,
        "CL".to_string(),
        Duration::from_secs(24 * 3600),
    ));
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));

    let method_repo = Arc::new(InMemoryMethodRepository::default());
    let zone_repo = Arc::new(InMemoryZoneRepository::default());
    let quote_repo = Arc::new(InMemoryQuoteRepository::default());

    let quote_service = Arc::new(QuoteService::new(
        resolver.clone(),
        distance,
        method_repo.clone(),
        zone_repo.clone(),
        quote_repo.clone(),
        clock.clone(),
        DefaultOrigin {
            lat: -33.4372,
            lng: -70.6167,
            name: "Providencia, Santiago, Chile".to_string(),
        },
    ));

    routers::init_router(AppState {
        config: Arc::new(test_config()),
        method_repo,
        zone_repo,
        quote_repo,
        resolver,
        clock,
        quote_service,
    })
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

/// envio_hoy Mon-Fri 00:01-18:00 up to 7 km, three price bands.
async fn seed_envio_hoy(app: &axum::Router) {
    let response = send(
        app,
        json_request(
            "POST",
            "/shipping/admin/api/methods",
            json!({
                "name": "Envío Hoy",
                "code": "envio_hoy",
                "description": "Entrega el mismo día",
                "start_time": "00:01",
                "end_time": "18:00",
                "max_km": 7.0,
                "available_saturday": false,
                "available_sunday": false
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for (min_km, max_km, price_clp) in [(0.0, 3.0, 3500), (3.0, 4.0, 4500), (4.0, 5.0, 5000)] {
        let response = send(
            app,
            json_request(
                "POST",
                "/shipping/admin/api/zones",
                json!({ "min_km": min_km, "max_km": max_km, "price_clp": price_clp }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    let response = send(&app, get_request("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn quote_matches_band_and_persists() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Av. Ricardo Lyon 1841, Providencia", "session_id": "s-1" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["quote_count"], 1);
    assert_eq!(body["route"]["distance_km"], 4.2);
    assert_eq!(body["destination"]["validation"]["level"], "accept");

    let option = &body["shipping_options"][0];
    assert_eq!(option["method_code"], "envio_hoy");
    assert_eq!(option["price_clp"], 5000);
    assert_eq!(option["zone_range"], "4-5 km");
    assert_eq!(option["available_until"], "18:00");
    assert!(option["quote_id"].as_i64().unwrap() > 0);

    // one audit record per matched method
    let quotes = body_json(send(&app, get_request("/shipping/admin/api/quotes")).await).await;
    assert_eq!(quotes["count"], 1);
    assert_eq!(quotes["quotes"][0]["session_id"], "s-1");
    assert_eq!(quotes["quotes"][0]["price_clp"], 5000);

    let stats = body_json(send(&app, get_request("/shipping/admin/api/quotes/stats")).await).await;
    assert_eq!(stats["stats"]["total_quotes"], 1);
    assert_eq!(stats["stats"]["today_quotes"], 1);
}

#[tokio::test]
async fn quote_outside_window_has_no_options() {
    let app = setup(
        tuesday_at(19, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Av. Ricardo Lyon 1841" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["distance_km"], 4.2);

    // nothing persisted when nothing matched
    let quotes = body_json(send(&app, get_request("/shipping/admin/api/quotes")).await).await;
    assert_eq!(quotes["count"], 0);
}

#[tokio::test]
async fn quote_beyond_max_distance_lists_active_zones() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(9.0),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Camino a Farellones 123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["distance_km"], 9.0);
    let zones = body["available_zones"].as_array().unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[0], "0-3 km");
}

#[tokio::test]
async fn imprecise_destination_is_rejected() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::with_tags(&["locality", "political"], "APPROXIMATE"),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Providencia" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["granularity"], "LOCALITY");
    assert_eq!(body["confidence"], 0.12);
}

#[tokio::test]
async fn street_without_number_quotes_with_warning() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::with_tags(&["route"], "GEOMETRIC_CENTER"),
        FakeDistance::returning(2.0),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Av. Ricardo Lyon" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["destination"]["validation"]["level"], "warning");
    assert!(body["warning"].as_str().unwrap().contains("número de casa"));
    assert_eq!(body["shipping_options"][0]["price_clp"], 3500);
}

#[tokio::test]
async fn missing_destination_is_bad_request() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    let response = send(
        &app,
        json_request("POST", "/shipping/api/quote", json!({ "destination": "  " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_method_code_conflicts() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/admin/api/methods",
            json!({
                "name": "Otro",
                "code": "envio_hoy",
                "start_time": "09:00",
                "end_time": "13:00",
                "max_km": 5.0
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn overlapping_zone_is_rejected() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/admin/api/zones",
            json!({ "min_km": 2.5, "max_km": 3.5, "price_clp": 4000 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("0-3 km"));

    // inverted bounds fail fast
    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/admin/api/zones",
            json!({ "min_km": 9.0, "max_km": 8.0, "price_clp": 4000 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a touching band is fine
    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/admin/api/zones",
            json!({ "min_km": 5.0, "max_km": 6.0, "price_clp": 5500 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn referenced_method_cannot_be_deleted() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Av. Ricardo Lyon 1841" }),
        ),
    )
    .await;

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/shipping/admin/api/methods/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/shipping/admin/api/zones/3")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // an unreferenced zone still deletes
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/shipping/admin/api/zones/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn toggled_off_method_disappears_from_public_list() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request("POST", "/shipping/admin/api/methods/1/toggle", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = body_json(send(&app, get_request("/shipping/api/methods")).await).await;
    assert_eq!(public["count"], 0);

    let admin = body_json(send(&app, get_request("/shipping/admin/api/methods")).await).await;
    assert_eq!(admin["methods"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn jumpseller_callback_returns_rates() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;

    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/jumpseller/callback",
            json!({
                "request": {
                    "cart_id": "cart-123",
                    "order_id": "",
                    "to": {
                        "address": "Av. Ricardo Lyon",
                        "street_number": "1841",
                        "city": "Providencia",
                        "region_name": "Región Metropolitana",
                        "municipality_name": "Providencia",
                        "country": "Chile"
                    }
                }
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rates = body["rates"].as_array().unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0]["service_code"], "envio_hoy");
    assert_eq!(rates[0]["total_price"], 5000);

    // correlation id carried from the cart
    let quotes = body_json(send(&app, get_request("/shipping/admin/api/quotes")).await).await;
    assert_eq!(quotes["quotes"][0]["session_id"], "cart-123");
}

#[tokio::test]
async fn jumpseller_failures_degrade_to_empty_rates() {
    // provider down
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::failing(),
    );
    seed_envio_hoy(&app).await;

    let payload = json!({
        "request": {
            "cart_id": "cart-9",
            "to": { "address": "Amapolas 3959", "city": "Providencia" }
        }
    });
    let response = send(
        &app,
        json_request("POST", "/shipping/api/jumpseller/callback", payload.clone()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rates"].as_array().unwrap().len(), 0);

    // geocoder down
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::failing(),
        FakeDistance::returning(4.2),
    );
    seed_envio_hoy(&app).await;
    let response = send(
        &app,
        json_request("POST", "/shipping/api/jumpseller/callback", payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rates"].as_array().unwrap().len(), 0);

    // malformed payload
    let response = send(
        &app,
        json_request("POST", "/shipping/api/jumpseller/callback", json!({"foo": 1})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rates"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn init_default_data_seeds_once() {
    let app = setup(
        tuesday_at(10, 0),
        FakeGeocoder::premise(),
        FakeDistance::returning(4.2),
    );

    let response = send(
        &app,
        json_request("POST", "/shipping/admin/api/init-default-data", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["methods_created"], 2);
    assert_eq!(body["zones_created"], 5);

    let response = send(
        &app,
        json_request("POST", "/shipping/admin/api/init-default-data", json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // seeded config quotes end to end: both methods window-match Tuesday 10:00
    let response = send(
        &app,
        json_request(
            "POST",
            "/shipping/api/quote",
            json!({ "destination": "Av. Ricardo Lyon 1841" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["quote_count"], 2);
}

#[tokio::test]
async fn repeated_resolution_hits_cache() {
    let geocoder = FakeGeocoder::premise();
    let app = setup(
        tuesday_at(10, 0),
        geocoder.clone(),
        FakeDistance::returning(4.2),
    );

    for _ in 0..2 {
        let response = send(
            &app,
            json_request(
                "POST",
                "/shipping/api/test-address",
                json!({ "address": "Av. Ricardo Lyon 1841" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);

    // clearing the cache forces a fresh provider call
    send(
        &app,
        json_request("POST", "/shipping/admin/api/cache/clear", json!({})),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/shipping/api/test-address",
            json!({ "address": "Av. Ricardo Lyon 1841" }),
        ),
    )
    .await;
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
}
