use anyhow::{Context, Result};

use crate::models::GeoPoint;

pub const DEFAULT_DISCOVERY_URL: &str = "https://app.ticketmaster.com/discovery/v2/events.json";
const DEFAULT_CITY: &str = "Paris";
const DEFAULT_COUNTRY_CODE: &str = "FR";
const DEFAULT_GEO_POINT: GeoPoint = GeoPoint {
    latitude: 48.8566,
    longitude: 2.3522,
};
const DEFAULT_RADIUS_KM: u32 = 40;
const DEFAULT_GENRE_ID: &str = "KnvZfZ7vAe1";

/// Run configuration, built once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub ntfy_url: Option<String>,
    pub city: String,
    pub country_code: String,
    pub geo_point: GeoPoint,
    pub radius_km: u32,
    pub genre_id: String,
    pub discovery_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            ntfy_url: None,
            city: DEFAULT_CITY.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            geo_point: DEFAULT_GEO_POINT,
            radius_km: DEFAULT_RADIUS_KM,
            genre_id: DEFAULT_GENRE_ID.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let geo_point = match read("GEO_POINT") {
            Some(raw) => raw
                .parse::<GeoPoint>()
                .with_context(|| format!("GEO_POINT must look like \"lat,lon\", got {raw:?}"))?,
            None => defaults.geo_point,
        };

        let radius_km = match read("SEARCH_RADIUS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("SEARCH_RADIUS must be a whole number, got {raw:?}"))?,
            None => defaults.radius_km,
        };

        Ok(Self {
            api_key: read("API_KEY"),
            ntfy_url: read("NTFY_URL"),
            city: read("CITY_NAME").unwrap_or(defaults.city),
            country_code: read("COUNTRY_CODE").unwrap_or(defaults.country_code),
            geo_point,
            radius_km,
            genre_id: read("EVENT_GENRE_ID").unwrap_or(defaults.genre_id),
            discovery_url: read("DISCOVERY_URL").unwrap_or(defaults.discovery_url),
        })
    }
}
