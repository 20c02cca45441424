use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_BOOKING_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_NEARBY_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote portal API that stores appointments.
    pub booking_api_url: String,
    pub port: u16,
    pub search_radius_km: f64,
    pub nearby_result_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            booking_api_url: DEFAULT_BOOKING_API_URL.to_string(),
            port: DEFAULT_PORT,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            nearby_result_limit: DEFAULT_NEARBY_RESULT_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            booking_api_url: env::var("BOOKING_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("BOOKING_API_URL not set, using default");
                    DEFAULT_BOOKING_API_URL.to_string()
                }),
            port: parse_var("PORT", DEFAULT_PORT),
            search_radius_km: parse_var("SEARCH_RADIUS_KM", DEFAULT_SEARCH_RADIUS_KM),
            nearby_result_limit: parse_var("NEARBY_RESULT_LIMIT", DEFAULT_NEARBY_RESULT_LIMIT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - booking submission is disabled");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.booking_api_url.is_empty()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
