use chrono::Datelike;
use serde::Serialize;
use std::sync::Arc;

use super::entities::quote;
use super::matcher::{self, MatchContext, QuoteOption};
use super::repository::{MethodRepository, QuoteRepository, ZoneRepository};
use crate::modules::geo::granularity::{Granularity, ValidationLevel};
use crate::modules::geo::provider::{Coordinates, DistanceProvider, RouteSummary};
use crate::modules::geo::resolver::AddressResolver;
use crate::shared::clock::Clock;
use crate::shared::error::{AppError, AppResult};

/// Fixed warehouse origin used when the caller does not override it. Known
/// coordinates, so quoting from it costs no geocoding call.
#[derive(Clone, Debug)]
pub struct DefaultOrigin {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

#[derive(Serialize, Debug)]
pub struct EndpointInfo {
    pub address: String,
    pub formatted_address: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Debug)]
pub struct ValidationInfo {
    pub level: ValidationLevel,
    pub granularity: Granularity,
    pub confidence: f64,
    pub warning: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct DestinationInfo {
    #[serde(flatten)]
    pub endpoint: EndpointInfo,
    pub validation: ValidationInfo,
}

#[derive(Serialize, Debug)]
pub struct RouteInfo {
    pub distance_km: f64,
    pub distance_text: String,
    pub duration_minutes: i32,
    pub duration_text: String,
}

/// A matched option together with its persisted audit record id.
#[derive(Serialize, Debug)]
pub struct MatchedOption {
    #[serde(flatten)]
    pub option: QuoteOption,
    pub quote_id: i32,
    pub price_formatted: String,
    pub duration_text: String,
}

#[derive(Serialize, Debug)]
pub struct QuoteOutcome {
    pub origin: EndpointInfo,
    pub destination: DestinationInfo,
    pub route: RouteInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub shipping_options: Vec<MatchedOption>,
    pub session_id: Option<String>,
}

pub struct QuoteService {
    resolver: Arc<AddressResolver>,
    distance: Arc<dyn DistanceProvider>,
    method_repo: Arc<dyn MethodRepository>,
    zone_repo: Arc<dyn ZoneRepository>,
    quote_repo: Arc<dyn QuoteRepository>,
    clock: Arc<dyn Clock>,
    default_origin: DefaultOrigin,
}

impl QuoteService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolver: Arc<AddressResolver>,
        distance: Arc<dyn DistanceProvider>,
        method_repo: Arc<dyn MethodRepository>,
        zone_repo: Arc<dyn ZoneRepository>,
        quote_repo: Arc<dyn QuoteRepository>,
        clock: Arc<dyn Clock>,
        default_origin: DefaultOrigin,
    ) -> Self {
        Self {
            resolver,
            distance,
            method_repo,
            zone_repo,
            quote_repo,
            clock,
            default_origin,
        }
    }

    /// End-to-end quote: resolve endpoints, compute the route, match
    /// configured methods and zones, persist one audit quote per option.
    pub async fn quote(
        &self,
        destination: &str,
        origin: Option<&str>,
        session_id: Option<String>,
    ) -> AppResult<QuoteOutcome> {
        // Origin: explicit override gets resolved, otherwise the warehouse.
        let origin_info = match origin.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => {
                let resolved = self
                    .resolver
                    .resolve(text)
                    .await
                    .map_err(|e| AppError::from_resolve(e, "origen"))?;
                EndpointInfo {
                    address: text.to_string(),
                    formatted_address: resolved.formatted_address,
                    lat: resolved.lat,
                    lng: resolved.lng,
                }
            }
            None => EndpointInfo {
                address: self.default_origin.name.clone(),
                formatted_address: self.default_origin.name.clone(),
                lat: self.default_origin.lat,
                lng: self.default_origin.lng,
            },
        };

        let dest = self
            .resolver
            .resolve(destination)
            .await
            .map_err(|e| AppError::from_resolve(e, "destino"))?;

        if dest.validation_level == ValidationLevel::Reject {
            return Err(AppError::AddressTooImprecise {
                granularity: dest.granularity,
                confidence: dest.confidence,
                message: dest
                    .warning_message
                    .clone()
                    .unwrap_or_else(|| "Dirección demasiado imprecisa".to_string()),
            });
        }

        let route = self
            .distance
            .route(
                Coordinates {
                    lat: origin_info.lat,
                    lng: origin_info.lng,
                },
                Coordinates {
                    lat: dest.lat,
                    lng: dest.lng,
                },
            )
            .await?;

        let methods = self.method_repo.find_active().await?;
        let zones = self.zone_repo.find_active().await?;

        let now = self.clock.now();
        let ctx = MatchContext {
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            now: now.time(),
            weekday: now.weekday(),
        };
        let options = matcher::match_options(&ctx, &methods, &zones);

        if options.is_empty() {
            tracing::info!(
                distance_km = route.distance_km,
                "no shipping options matched"
            );
            return Err(AppError::NoMatchingOptions {
                distance_km: route.distance_km,
                active_zones: zones.iter().map(|z| z.range_text()).collect(),
            });
        }

        let records = self.build_quote_records(&options, &origin_info, &dest.formatted_address,
            dest.lat, dest.lng, &route, session_id.as_deref());
        let persisted = self.quote_repo.insert_many(records).await?;

        let shipping_options = options
            .into_iter()
            .zip(persisted)
            .map(|(option, record)| MatchedOption {
                price_formatted: format_clp(option.price_clp),
                duration_text: format!("{} minutos", option.duration_minutes),
                quote_id: record.id,
                option,
            })
            .collect();

        Ok(QuoteOutcome {
            origin: origin_info,
            warning: dest.warning_message.clone(),
            destination: DestinationInfo {
                endpoint: EndpointInfo {
                    address: destination.to_string(),
                    formatted_address: dest.formatted_address,
                    lat: dest.lat,
                    lng: dest.lng,
                },
                validation: ValidationInfo {
                    level: dest.validation_level,
                    granularity: dest.granularity,
                    confidence: dest.confidence,
                    warning: dest.warning_message,
                },
            },
            route: RouteInfo {
                distance_km: route.distance_km,
                distance_text: route.distance_text.clone(),
                duration_minutes: route.duration_minutes,
                duration_text: route.duration_text.clone(),
            },
            shipping_options,
            session_id,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_quote_records(
        &self,
        options: &[QuoteOption],
        origin: &EndpointInfo,
        dest_formatted: &str,
        dest_lat: f64,
        dest_lng: f64,
        route: &RouteSummary,
        session_id: Option<&str>,
    ) -> Vec<quote::Model> {
        let created_at = self.clock.now().naive_local();
        let raw = serde_json::to_string(&route.raw).ok();

        options
            .iter()
            .map(|option| quote::Model {
                id: 0,
                session_id: session_id.map(str::to_string),
                origin_address: Some(origin.formatted_address.clone()),
                destination_address: dest_formatted.to_string(),
                origin_lat: Some(origin.lat),
                origin_lng: Some(origin.lng),
                destination_lat: Some(dest_lat),
                destination_lng: Some(dest_lng),
                distance_km: route.distance_km,
                duration_minutes: Some(route.duration_minutes),
                shipping_method_id: Some(option.method_id),
                zone_id: Some(option.zone_id),
                price_clp: option.price_clp,
                is_available: true,
                router_response: raw.clone(),
                created_at,
            })
            .collect()
    }
}

/// "$5,000" -- Chilean pesos have no decimals.
pub fn format_clp(amount: i32) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_clp;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_clp(3500), "$3,500");
        assert_eq!(format_clp(500), "$500");
        assert_eq!(format_clp(1250000), "$1,250,000");
        assert_eq!(format_clp(0), "$0");
    }
}
