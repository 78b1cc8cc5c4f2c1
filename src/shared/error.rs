use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::modules::geo::granularity::Granularity;
use crate::modules::geo::provider::GeoError;
use crate::modules::geo::resolver::ResolveError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("{message}")]
    AddressTooImprecise {
        granularity: Granularity,
        confidence: f64,
        message: String,
    },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("No hay métodos de envío disponibles para {distance_km} km")]
    NoMatchingOptions {
        distance_km: f64,
        active_zones: Vec<String>,
    },
}

impl AppError {
    /// Map a resolver failure, labelling which leg of the trip failed.
    pub fn from_resolve(err: ResolveError, which: &str) -> Self {
        match err {
            ResolveError::NotFound => {
                AppError::AddressNotFound(format!("No se pudo encontrar la dirección de {which}"))
            }
            ResolveError::Provider(e) => AppError::from(e),
        }
    }
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::DbError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Database error" }),
                )
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": "Not found" }),
            ),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Internal server error" }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                json!({ "success": false, "error": msg }),
            ),
            AppError::AddressNotFound(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::AddressTooImprecise {
                granularity,
                confidence,
                message,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": message,
                    "granularity": granularity,
                    "confidence": confidence,
                }),
            ),
            AppError::ProviderError(msg) => {
                tracing::error!("Provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "success": false, "error": "Error al consultar el proveedor de rutas" }),
                )
            }
            AppError::NoMatchingOptions {
                distance_km,
                active_zones,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": format!(
                        "No hay métodos de envío disponibles para {distance_km} km"
                    ),
                    "distance_km": distance_km,
                    "available_zones": active_zones,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
