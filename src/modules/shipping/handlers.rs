use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Datelike, NaiveTime};
use serde::Serialize;
use serde_json::{json, Value};

use super::dtos::{
    parse_hhmm, CreateMethodRequest, CreateZoneRequest, JumpsellerCallback, QuoteRequest,
    TestAddressRequest, UpdateMethodRequest, UpdateZoneRequest,
};
use super::entities::{method, zone};
use super::service::format_clp;
use super::validation::validate_zone;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

fn hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

#[derive(Serialize)]
pub struct MethodResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub start_time: String,
    pub end_time: String,
    pub max_km: f64,
    pub is_available_now: bool,
    pub available_monday: bool,
    pub available_tuesday: bool,
    pub available_wednesday: bool,
    pub available_thursday: bool,
    pub available_friday: bool,
    pub available_saturday: bool,
    pub available_sunday: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl MethodResponse {
    fn from_model(m: &method::Model, state: &AppState) -> Self {
        let now = state.clock.now();
        Self {
            id: m.id,
            name: m.name.clone(),
            code: m.code.clone(),
            description: m.description.clone(),
            is_active: m.is_active,
            start_time: hhmm(m.start_time),
            end_time: hhmm(m.end_time),
            max_km: m.max_km,
            is_available_now: m.is_available_at(now.time(), now.weekday()),
            available_monday: m.available_monday,
            available_tuesday: m.available_tuesday,
            available_wednesday: m.available_wednesday,
            available_thursday: m.available_thursday,
            available_friday: m.available_friday,
            available_saturday: m.available_saturday,
            available_sunday: m.available_sunday,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ZoneResponse {
    pub id: i32,
    pub min_km: f64,
    pub max_km: f64,
    pub price_clp: i32,
    pub price_formatted: String,
    pub range_text: String,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<&zone::Model> for ZoneResponse {
    fn from(z: &zone::Model) -> Self {
        Self {
            id: z.id,
            min_km: z.min_km,
            max_km: z.max_km,
            price_clp: z.price_clp,
            price_formatted: format_clp(z.price_clp),
            range_text: z.range_text(),
            is_active: z.is_active,
            created_at: z.created_at,
            updated_at: z.updated_at,
        }
    }
}

// ========================================
// Public quoting API
// ========================================

pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> AppResult<Json<Value>> {
    let destination = req
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::BadRequest("La dirección de destino es requerida".to_string()))?;

    let outcome = state
        .quote_service
        .quote(destination, req.origin.as_deref(), req.session_id)
        .await?;

    let quote_count = outcome.shipping_options.len();
    let mut body = serde_json::to_value(&outcome)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    body["success"] = json!(true);
    body["quote_count"] = json!(quote_count);
    Ok(Json(body))
}

/// Resolver diagnostics: geocode an address without quoting it.
pub async fn test_address(
    State(state): State<AppState>,
    Json(req): Json<TestAddressRequest>,
) -> AppResult<Json<Value>> {
    let address = req
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::BadRequest("La dirección es requerida".to_string()))?;

    let resolved = state
        .resolver
        .resolve(address)
        .await
        .map_err(|e| AppError::from_resolve(e, "destino"))?;

    Ok(Json(json!({
        "success": true,
        "address": address,
        "geocoded": resolved,
    })))
}

pub async fn list_active_methods(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let methods = state.method_repo.find_active().await?;
    let methods: Vec<MethodResponse> = methods
        .iter()
        .map(|m| MethodResponse::from_model(m, &state))
        .collect();
    Ok(Json(json!({
        "success": true,
        "count": methods.len(),
        "methods": methods,
    })))
}

pub async fn list_active_zones(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let zones = state.zone_repo.find_active().await?;
    let zones: Vec<ZoneResponse> = zones.iter().map(ZoneResponse::from).collect();
    Ok(Json(json!({
        "success": true,
        "count": zones.len(),
        "zones": zones,
    })))
}

// ========================================
// Jumpseller checkout adapter
// ========================================

#[derive(Serialize)]
struct JumpsellerRate {
    rate_id: String,
    service_name: String,
    service_code: String,
    description: String,
    total_price: i32,
}

/// Checkout callback. The platform only understands a rates array, so every
/// failure degrades to an empty list with HTTP 200 instead of an error status.
pub async fn jumpseller_callback(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    let empty = Json(json!({ "rates": [] }));

    let callback: JumpsellerCallback = match serde_json::from_value(payload) {
        Ok(cb) => cb,
        Err(e) => {
            tracing::warn!("jumpseller payload rejected: {e}");
            return empty;
        }
    };

    let destination = callback.request.to.assemble();
    let session_id = callback
        .request
        .order_id
        .filter(|s| !s.is_empty())
        .or(callback.request.cart_id);

    match state
        .quote_service
        .quote(&destination, None, session_id)
        .await
    {
        Ok(outcome) => {
            let rates: Vec<JumpsellerRate> = outcome
                .shipping_options
                .iter()
                .map(|o| JumpsellerRate {
                    rate_id: o.quote_id.to_string(),
                    service_name: o.option.method_name.clone(),
                    service_code: o.option.method_code.clone(),
                    description: o
                        .option
                        .description
                        .clone()
                        .unwrap_or_else(|| o.option.method_name.clone()),
                    total_price: o.option.price_clp,
                })
                .collect();
            Json(json!({ "rates": rates }))
        }
        Err(e) => {
            tracing::warn!(%destination, "jumpseller quote failed: {e}");
            empty
        }
    }
}

/// Service catalogue for platform registration; no route is priced.
pub async fn jumpseller_services(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let methods = state.method_repo.find_active().await?;
    let services: Vec<Value> = methods
        .iter()
        .map(|m| {
            json!({
                "service_name": m.name,
                "service_code": m.code,
                "description": m.description.clone().unwrap_or_else(|| m.name.clone()),
                "available_until": hhmm(m.end_time),
            })
        })
        .collect();
    Ok(Json(json!({ "services": services })))
}

// ========================================
// Admin: shipping methods
// ========================================

pub async fn admin_list_methods(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let methods = state.method_repo.find_all().await?;
    let methods: Vec<MethodResponse> = methods
        .iter()
        .map(|m| MethodResponse::from_model(m, &state))
        .collect();
    Ok(Json(json!({ "success": true, "methods": methods })))
}

pub async fn create_method(
    State(state): State<AppState>,
    Json(req): Json<CreateMethodRequest>,
) -> AppResult<Json<Value>> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name es requerido".to_string()));
    }
    if req.code.trim().is_empty() {
        return Err(AppError::BadRequest("code es requerido".to_string()));
    }
    if !req.max_km.is_finite() || req.max_km <= 0.0 {
        return Err(AppError::BadRequest(
            "max_km debe ser mayor que 0".to_string(),
        ));
    }
    let start_time = parse_hhmm("start_time", &req.start_time)?;
    let end_time = parse_hhmm("end_time", &req.end_time)?;

    if state.method_repo.find_by_code(req.code.trim()).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Ya existe un método con el código \"{}\"",
            req.code.trim()
        )));
    }

    let now = state.clock.now().naive_local();
    let model = method::Model {
        id: 0,
        name: req.name.trim().to_string(),
        code: req.code.trim().to_string(),
        description: req.description,
        is_active: req.is_active.unwrap_or(true),
        start_time,
        end_time,
        max_km: req.max_km,
        available_monday: req.available_monday.unwrap_or(true),
        available_tuesday: req.available_tuesday.unwrap_or(true),
        available_wednesday: req.available_wednesday.unwrap_or(true),
        available_thursday: req.available_thursday.unwrap_or(true),
        available_friday: req.available_friday.unwrap_or(true),
        available_saturday: req.available_saturday.unwrap_or(true),
        available_sunday: req.available_sunday.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    let created = state.method_repo.insert(model).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Método creado correctamente",
        "method": MethodResponse::from_model(&created, &state),
    })))
}

pub async fn update_method(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateMethodRequest>,
) -> AppResult<Json<Value>> {
    let mut model = state
        .method_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(code) = &req.code {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::BadRequest("code no puede ser vacío".to_string()));
        }
        if code != model.code && state.method_repo.find_by_code(code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Ya existe un método con el código \"{code}\""
            )));
        }
        model.code = code.to_string();
    }
    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name no puede ser vacío".to_string()));
        }
        model.name = name.trim().to_string();
    }
    if let Some(description) = req.description {
        model.description = Some(description);
    }
    if let Some(start_time) = &req.start_time {
        model.start_time = parse_hhmm("start_time", start_time)?;
    }
    if let Some(end_time) = &req.end_time {
        model.end_time = parse_hhmm("end_time", end_time)?;
    }
    if let Some(max_km) = req.max_km {
        if !max_km.is_finite() || max_km <= 0.0 {
            return Err(AppError::BadRequest(
                "max_km debe ser mayor que 0".to_string(),
            ));
        }
        model.max_km = max_km;
    }
    if let Some(is_active) = req.is_active {
        model.is_active = is_active;
    }
    if let Some(v) = req.available_monday {
        model.available_monday = v;
    }
    if let Some(v) = req.available_tuesday {
        model.available_tuesday = v;
    }
    if let Some(v) = req.available_wednesday {
        model.available_wednesday = v;
    }
    if let Some(v) = req.available_thursday {
        model.available_thursday = v;
    }
    if let Some(v) = req.available_friday {
        model.available_friday = v;
    }
    if let Some(v) = req.available_saturday {
        model.available_saturday = v;
    }
    if let Some(v) = req.available_sunday {
        model.available_sunday = v;
    }

    model.updated_at = state.clock.now().naive_local();
    let updated = state.method_repo.update(model).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Método actualizado correctamente",
        "method": MethodResponse::from_model(&updated, &state),
    })))
}

pub async fn delete_method(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    state
        .method_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let referencing = state.quote_repo.count_by_method(id).await?;
    if referencing > 0 {
        return Err(AppError::Conflict(format!(
            "No se puede eliminar. Hay {referencing} cotizaciones asociadas a este método."
        )));
    }

    state.method_repo.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Método eliminado correctamente",
    })))
}

pub async fn toggle_method(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    let mut model = state
        .method_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    model.is_active = !model.is_active;
    model.updated_at = state.clock.now().naive_local();
    let updated = state.method_repo.update(model).await?;

    let status = if updated.is_active {
        "activado"
    } else {
        "desactivado"
    };
    Ok(Json(json!({
        "success": true,
        "message": format!("Método {status} correctamente"),
        "method": MethodResponse::from_model(&updated, &state),
    })))
}

// ========================================
// Admin: price zones
// ========================================

pub async fn admin_list_zones(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let zones = state.zone_repo.find_all().await?;
    let zones: Vec<ZoneResponse> = zones.iter().map(ZoneResponse::from).collect();
    Ok(Json(json!({ "success": true, "zones": zones })))
}

pub async fn create_zone(
    State(state): State<AppState>,
    Json(req): Json<CreateZoneRequest>,
) -> AppResult<Json<Value>> {
    if req.price_clp < 0 {
        return Err(AppError::BadRequest(
            "price_clp no puede ser negativo".to_string(),
        ));
    }
    let is_active = req.is_active.unwrap_or(true);
    // Overlap only matters among active zones.
    if is_active {
        let active = state.zone_repo.find_active().await?;
        validate_zone(req.min_km, req.max_km, &active, None)?;
    } else if req.min_km >= req.max_km {
        return Err(AppError::BadRequest(format!(
            "min_km ({}) debe ser menor que max_km ({})",
            req.min_km, req.max_km
        )));
    }

    let now = state.clock.now().naive_local();
    let created = state
        .zone_repo
        .insert(zone::Model {
            id: 0,
            min_km: req.min_km,
            max_km: req.max_km,
            price_clp: req.price_clp,
            is_active,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Zona creada correctamente",
        "zone": ZoneResponse::from(&created),
    })))
}

pub async fn update_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateZoneRequest>,
) -> AppResult<Json<Value>> {
    let mut model = state
        .zone_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(min_km) = req.min_km {
        model.min_km = min_km;
    }
    if let Some(max_km) = req.max_km {
        model.max_km = max_km;
    }
    if let Some(price_clp) = req.price_clp {
        if price_clp < 0 {
            return Err(AppError::BadRequest(
                "price_clp no puede ser negativo".to_string(),
            ));
        }
        model.price_clp = price_clp;
    }
    if let Some(is_active) = req.is_active {
        model.is_active = is_active;
    }

    if model.is_active {
        let active = state.zone_repo.find_active().await?;
        validate_zone(model.min_km, model.max_km, &active, Some(id))?;
    } else if model.min_km >= model.max_km {
        return Err(AppError::BadRequest(format!(
            "min_km ({}) debe ser menor que max_km ({})",
            model.min_km, model.max_km
        )));
    }

    model.updated_at = state.clock.now().naive_local();
    let updated = state.zone_repo.update(model).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Zona actualizada correctamente",
        "zone": ZoneResponse::from(&updated),
    })))
}

pub async fn delete_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    state
        .zone_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let referencing = state.quote_repo.count_by_zone(id).await?;
    if referencing > 0 {
        return Err(AppError::Conflict(format!(
            "No se puede eliminar. Hay {referencing} cotizaciones asociadas a esta zona."
        )));
    }

    state.zone_repo.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Zona eliminada correctamente",
    })))
}

pub async fn toggle_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    let mut model = state
        .zone_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    model.is_active = !model.is_active;
    // Re-activating must not introduce an overlap.
    if model.is_active {
        let active = state.zone_repo.find_active().await?;
        validate_zone(model.min_km, model.max_km, &active, Some(id))?;
    }

    model.updated_at = state.clock.now().naive_local();
    let updated = state.zone_repo.update(model).await?;

    let status = if updated.is_active {
        "activada"
    } else {
        "desactivada"
    };
    Ok(Json(json!({
        "success": true,
        "message": format!("Zona {status} correctamente"),
        "zone": ZoneResponse::from(&updated),
    })))
}

// ========================================
// Admin: quotes, cache, defaults
// ========================================

pub async fn recent_quotes(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let quotes = state.quote_repo.recent(50).await?;
    let quotes: Vec<Value> = quotes
        .iter()
        .map(|q| {
            json!({
                "id": q.id,
                "session_id": q.session_id,
                "origin_address": q.origin_address,
                "destination_address": q.destination_address,
                "distance_km": q.distance_km,
                "duration_minutes": q.duration_minutes,
                "shipping_method_id": q.shipping_method_id,
                "zone_id": q.zone_id,
                "price_clp": q.price_clp,
                "price_formatted": format_clp(q.price_clp),
                "is_available": q.is_available,
                "created_at": q.created_at,
            })
        })
        .collect();
    Ok(Json(json!({
        "success": true,
        "count": quotes.len(),
        "quotes": quotes,
    })))
}

pub async fn quote_stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let midnight = state
        .clock
        .now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");

    let today_quotes = state.quote_repo.count_since(midnight).await?;
    let total_quotes = state.quote_repo.count().await?;

    Ok(Json(json!({
        "success": true,
        "stats": {
            "today_quotes": today_quotes,
            "total_quotes": total_quotes,
        }
    })))
}

pub async fn cache_stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let stats = state.resolver.cache_stats();
    Ok(Json(json!({ "success": true, "cache": stats })))
}

pub async fn clear_cache(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.resolver.clear_cache();
    Ok(Json(json!({
        "success": true,
        "message": "Caché de direcciones limpiado",
    })))
}

/// Seed the original defaults, only into an empty configuration.
pub async fn init_default_data(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if state.method_repo.count().await? > 0 || state.zone_repo.count().await? > 0 {
        return Err(AppError::Conflict(
            "Ya existen datos en el sistema. Usa reset para reinicializar.".to_string(),
        ));
    }

    let now = state.clock.now().naive_local();
    let t = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).expect("valid seed time");

    let methods = [
        method::Model {
            id: 0,
            name: "Envío Hoy".to_string(),
            code: "envio_hoy".to_string(),
            description: Some("Entrega el mismo día (disponible hasta las 18:00)".to_string()),
            is_active: true,
            start_time: t(0, 1),
            end_time: t(18, 0),
            max_km: 7.0,
            available_monday: true,
            available_tuesday: true,
            available_wednesday: true,
            available_thursday: true,
            available_friday: true,
            available_saturday: false,
            available_sunday: false,
            created_at: now,
            updated_at: now,
        },
        method::Model {
            id: 0,
            name: "Envío Programado".to_string(),
            code: "envio_programado".to_string(),
            description: Some("Entrega programada para el día siguiente".to_string()),
            is_active: true,
            start_time: t(0, 0),
            end_time: t(23, 59),
            max_km: 7.0,
            available_monday: true,
            available_tuesday: true,
            available_wednesday: true,
            available_thursday: true,
            available_friday: true,
            available_saturday: true,
            available_sunday: true,
            created_at: now,
            updated_at: now,
        },
    ];
    let zones = [
        (0.0, 3.0, 3500),
        (3.0, 4.0, 4500),
        (4.0, 5.0, 5000),
        (5.0, 6.0, 5500),
        (6.0, 7.0, 6500),
    ];

    let methods_created = methods.len();
    for m in methods {
        state.method_repo.insert(m).await?;
    }
    let zones_created = zones.len();
    for (min_km, max_km, price_clp) in zones {
        state
            .zone_repo
            .insert(zone::Model {
                id: 0,
                min_km,
                max_km,
                price_clp,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }

    Ok(Json(json!({
        "success": true,
        "message": "Datos por defecto inicializados correctamente",
        "methods_created": methods_created,
        "zones_created": zones_created,
    })))
}
