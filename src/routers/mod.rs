use axum::{routing::get, Router};

use crate::modules::shipping;
use crate::shared::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/shipping", shipping::router::router())
        .with_state(state)
}
