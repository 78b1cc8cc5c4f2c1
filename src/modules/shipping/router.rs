use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // public quoting API
        .route("/api/quote", post(handlers::quote))
        .route("/api/test-address", post(handlers::test_address))
        .route("/api/methods", get(handlers::list_active_methods))
        .route("/api/zones", get(handlers::list_active_zones))
        // e-commerce checkout adapter
        .route(
            "/api/jumpseller/callback",
            post(handlers::jumpseller_callback),
        )
        .route(
            "/api/jumpseller/services",
            get(handlers::jumpseller_services),
        )
        // admin configuration
        .route(
            "/admin/api/methods",
            get(handlers::admin_list_methods).post(handlers::create_method),
        )
        .route(
            "/admin/api/methods/:id",
            put(handlers::update_method).delete(handlers::delete_method),
        )
        .route(
            "/admin/api/methods/:id/toggle",
            post(handlers::toggle_method),
        )
        .route(
            "/admin/api/zones",
            get(handlers::admin_list_zones).post(handlers::create_zone),
        )
        .route(
            "/admin/api/zones/:id",
            put(handlers::update_zone).delete(handlers::delete_zone),
        )
        .route("/admin/api/zones/:id/toggle", post(handlers::toggle_zone))
        // audit and operations
        .route("/admin/api/quotes", get(handlers::recent_quotes))
        .route("/admin/api/quotes/stats", get(handlers::quote_stats))
        .route("/admin/api/cache/stats", get(handlers::cache_stats))
        .route("/admin/api/cache/clear", post(handlers::clear_cache))
        .route(
            "/admin/api/init-default-data",
            post(handlers::init_default_data),
        )
}
