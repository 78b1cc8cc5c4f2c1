use super::entities::zone;
use crate::shared::error::{AppError, AppResult};

/// Admin-side zone validation: bounds must be ordered and the band must not
/// overlap any other active zone. `excluding` skips the record being updated.
pub fn validate_zone(
    min_km: f64,
    max_km: f64,
    active_zones: &[zone::Model],
    excluding: Option<i32>,
) -> AppResult<()> {
    if min_km >= max_km {
        return Err(AppError::BadRequest(format!(
            "min_km ({min_km}) debe ser menor que max_km ({max_km})"
        )));
    }

    let conflicts: Vec<String> = active_zones
        .iter()
        .filter(|z| Some(z.id) != excluding)
        .filter(|z| !(max_km <= z.min_km || z.max_km <= min_km))
        .map(|z| z.range_text())
        .collect();

    if !conflicts.is_empty() {
        return Err(AppError::Conflict(format!(
            "El rango {min_km}-{max_km} km se superpone con zonas existentes: {}",
            conflicts.join(", ")
        )));
    }

    Ok(())
}
