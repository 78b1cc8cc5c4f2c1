use chrono::NaiveTime;
use serde::Deserialize;

use crate::shared::error::{AppError, AppResult};

pub fn parse_hhmm(field: &str, value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::BadRequest(format!("{field} debe tener formato HH:MM")))
}

#[derive(Deserialize, Debug)]
pub struct QuoteRequest {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TestAddressRequest {
    pub address: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CreateMethodRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    /// "HH:MM"
    pub start_time: String,
    pub end_time: String,
    pub max_km: f64,
    pub is_active: Option<bool>,
    pub available_monday: Option<bool>,
    pub available_tuesday: Option<bool>,
    pub available_wednesday: Option<bool>,
    pub available_thursday: Option<bool>,
    pub available_friday: Option<bool>,
    pub available_saturday: Option<bool>,
    pub available_sunday: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateMethodRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_km: Option<f64>,
    pub is_active: Option<bool>,
    pub available_monday: Option<bool>,
    pub available_tuesday: Option<bool>,
    pub available_wednesday: Option<bool>,
    pub available_thursday: Option<bool>,
    pub available_friday: Option<bool>,
    pub available_saturday: Option<bool>,
    pub available_sunday: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct CreateZoneRequest {
    pub min_km: f64,
    pub max_km: f64,
    pub price_clp: i32,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateZoneRequest {
    pub min_km: Option<f64>,
    pub max_km: Option<f64>,
    pub price_clp: Option<i32>,
    pub is_active: Option<bool>,
}

// Jumpseller checkout callback payload. Only the fields the adapter needs;
// the platform sends plenty more.
#[derive(Deserialize, Debug)]
pub struct JumpsellerCallback {
    pub request: JumpsellerRequest,
}

#[derive(Deserialize, Debug)]
pub struct JumpsellerRequest {
    pub cart_id: Option<String>,
    pub order_id: Option<String>,
    pub to: JumpsellerAddress,
}

#[derive(Deserialize, Debug, Default)]
pub struct JumpsellerAddress {
    pub address: Option<String>,
    pub street_number: Option<String>,
    pub city: Option<String>,
    pub municipality_name: Option<String>,
    pub region_name: Option<String>,
    pub country: Option<String>,
}

impl JumpsellerAddress {
    /// Assemble the structured destination into one geocodable string:
    /// street + number, municipality (falling back to city), region, country.
    pub fn assemble(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let street = match (&self.address, &self.street_number) {
            (Some(a), Some(n)) if !a.trim().is_empty() && !n.trim().is_empty() => {
                Some(format!("{} {}", a.trim(), n.trim()))
            }
            (Some(a), _) if !a.trim().is_empty() => Some(a.trim().to_string()),
            _ => None,
        };
        if let Some(s) = street {
            parts.push(s);
        }

        let locality = self
            .municipality_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.city.as_deref().filter(|s| !s.trim().is_empty()));
        if let Some(l) = locality {
            parts.push(l.trim().to_string());
        }

        if let Some(r) = self.region_name.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(r.trim().to_string());
        }

        parts.push(
            self.country
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("Chile")
                .trim()
                .to_string(),
        );

        parts.join(", ")
    }
}
