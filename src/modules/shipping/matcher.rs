use chrono::{NaiveTime, Weekday};
use serde::Serialize;

use super::entities::{method, zone};

/// Inputs the matcher needs beyond configuration: the computed route and the
/// local wall-clock moment the quote is being made.
#[derive(Clone, Copy, Debug)]
pub struct MatchContext {
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub now: NaiveTime,
    pub weekday: Weekday,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuoteOption {
    pub method_id: i32,
    pub method_code: String,
    pub method_name: String,
    pub description: Option<String>,
    pub zone_id: i32,
    pub price_clp: i32,
    pub distance_km: f64,
    pub duration_minutes: i32,
    #[serde(serialize_with = "hhmm")]
    pub available_until: NaiveTime,
    pub zone_range: String,
}

fn hhmm<S: serde::Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.format("%H:%M").to_string())
}

/// First active zone whose band contains the distance.
pub fn find_zone_for_distance(zones: &[zone::Model], distance_km: f64) -> Option<&zone::Model> {
    zones
        .iter()
        .find(|z| z.is_active && z.contains(distance_km))
}

/// Evaluate every active method against the computed route. Side-effect free;
/// persisting the matches as audit quotes is the caller's job.
pub fn match_options(
    ctx: &MatchContext,
    methods: &[method::Model],
    zones: &[zone::Model],
) -> Vec<QuoteOption> {
    let mut options = Vec::new();

    for method in methods {
        if !method.is_available_at(ctx.now, ctx.weekday) {
            continue;
        }
        if ctx.distance_km > method.max_km {
            continue;
        }
        // Distance in an unpriced gap between zones: no offer for this method.
        let Some(zone) = find_zone_for_distance(zones, ctx.distance_km) else {
            continue;
        };

        options.push(QuoteOption {
            method_id: method.id,
            method_code: method.code.clone(),
            method_name: method.name.clone(),
            description: method.description.clone(),
            zone_id: zone.id,
            price_clp: zone.price_clp,
            distance_km: ctx.distance_km,
            duration_minutes: ctx.duration_minutes,
            available_until: method.end_time,
            zone_range: zone.range_text(),
        });
    }

    options
}
