use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub server_host: String,
    pub server_port: u16,
    pub rust_log: String,
    pub app_env: String,
    pub google_maps_api_key: String,
    pub geocode_country: String,
    pub default_origin_lat: f64,
    pub default_origin_lng: f64,
    pub default_origin_name: String,
    pub address_cache_ttl_hours: u64,
    pub provider_timeout_seconds: u64,
    pub utc_offset_hours: i32,
}

impl Config {
    pub fn init() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("SERVER_PORT must be a valid number");
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Google Maps Config (required outside dev since every quote hits the API)
        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY").unwrap_or_else(|_| {
            if app_env != "dev" {
                panic!("GOOGLE_MAPS_API_KEY must be set");
            }
            String::new()
        });
        let geocode_country = env::var("GEOCODE_COUNTRY").unwrap_or_else(|_| "CL".to_string());

        // Warehouse origin, "lat,lng". Falls back to Providencia centro.
        let default_origin = env::var("DEFAULT_ORIGIN_ADDRESS")
            .unwrap_or_else(|_| "-33.4372,-70.6167".to_string());
        let (default_origin_lat, default_origin_lng) =
            parse_coords(&default_origin).unwrap_or_else(|| {
                tracing::error!(
                    "Invalid DEFAULT_ORIGIN_ADDRESS '{default_origin}', using fallback"
                );
                (-33.4372, -70.6167)
            });
        let default_origin_name = env::var("DEFAULT_ORIGIN_NAME")
            .unwrap_or_else(|_| "Providencia, Santiago, Chile".to_string());

        Self {
            database_url,
            database_max_connections: env_num("DATABASE_MAX_CONNECTIONS", 100),
            database_min_connections: env_num("DATABASE_MIN_CONNECTIONS", 5),
            database_connect_timeout: env_num("DATABASE_CONNECT_TIMEOUT", 8),
            database_idle_timeout: env_num("DATABASE_IDLE_TIMEOUT", 8),
            server_host,
            server_port,
            rust_log,
            app_env,
            google_maps_api_key,
            geocode_country,
            default_origin_lat,
            default_origin_lng,
            default_origin_name,
            address_cache_ttl_hours: env_num("ADDRESS_CACHE_TTL_HOURS", 24),
            provider_timeout_seconds: env_num("PROVIDER_TIMEOUT_SECONDS", 10),
            utc_offset_hours: env_num("UTC_OFFSET_HOURS", -3),
        }
    }
}

fn env_num<T: std::str::FromStr>(key: &str, default: T) -> T
where
    T::Err: std::fmt::Debug,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .unwrap_or_else(|_| panic!("{key} must be a valid number")),
        Err(_) => default,
    }
}

fn parse_coords(s: &str) -> Option<(f64, f64)> {
    let mut parts = s.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lng = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::parse_coords;

    #[test]
    fn parses_lat_lng_pair() {
        assert_eq!(
            parse_coords("-33.4372,-70.6167"),
            Some((-33.4372, -70.6167))
        );
        assert_eq!(
            parse_coords(" -33.4372 , -70.6167 "),
            Some((-33.4372, -70.6167))
        );
    }

    #[test]
    fn rejects_malformed_coords() {
        assert_eq!(parse_coords("Santiago Centro"), None);
        assert_eq!(parse_coords("1,2,3"), None);
        assert_eq!(parse_coords("-33.4372"), None);
    }
}
