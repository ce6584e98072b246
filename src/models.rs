use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const NAME_FALLBACK: &str = "Name not available";
pub const VENUE_FALLBACK: &str = "Venue not available";
pub const LINK_FALLBACK: &str = "Link not available";
pub const DATE_FALLBACK: &str = "Date unknown";
pub const GENRE_FALLBACK: &str = "Genre not available";

/// The discovery API refuses pages larger than this.
pub const MAX_PAGE_SIZE: u32 = 100;
const RADIUS_UNIT: &str = "km";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeoPointError {
    #[error("expected \"lat,lon\"")]
    Shape,
    #[error("not a number: {0}")]
    Number(String),
    #[error("coordinates out of range")]
    Range,
}

impl FromStr for GeoPoint {
    type Err = GeoPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or(GeoPointError::Shape)?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| GeoPointError::Number(part.trim().to_string()))
        };
        let latitude = parse(lat)?;
        let longitude = parse(lon)?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::Range);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// One search against the discovery API. The API key travels with the client, not the query.
#[derive(Clone, Debug, PartialEq)]
pub struct EventQuery {
    pub city: String,
    pub country_code: String,
    pub geo_point: GeoPoint,
    pub radius_km: u32,
    pub genre_id: String,
    pub on_sale_start: NaiveDate,
    pub page_size: u32,
}

impl EventQuery {
    pub fn new(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            city: config.city.clone(),
            country_code: config.country_code.clone(),
            geo_point: config.geo_point,
            radius_km: config.radius_km,
            genre_id: config.genre_id.clone(),
            on_sale_start: today - Duration::days(1),
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.min(MAX_PAGE_SIZE);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", "*".to_string()),
            ("city", self.city.clone()),
            ("countryCode", self.country_code.clone()),
            (
                "onsaleOnStartDate",
                self.on_sale_start.format("%Y-%m-%d").to_string(),
            ),
            ("genreId", self.genre_id.clone()),
            ("geoPoint", self.geo_point.to_string()),
            ("radius", self.radius_km.to_string()),
            ("unit", RADIUS_UNIT.to_string()),
            ("size", self.page_size.min(MAX_PAGE_SIZE).to_string()),
        ]
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<SearchEmbedded>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SearchEmbedded {
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// A single event from the discovery API. Every level is optional; the
/// accessors below supply the display fallbacks.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EventRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<EventDates>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EventEmbedded>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EventDates {
    pub start: Option<EventStart>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EventEmbedded {
    #[serde(default)]
    pub venues: Vec<Venue>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Venue {
    pub name: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub genre: Option<NamedRef>,
    pub sub_genre: Option<NamedRef>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NamedRef {
    pub name: Option<String>,
}

impl EventRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NAME_FALLBACK)
    }

    pub fn venue_name(&self) -> &str {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.venues.first())
            .and_then(|venue| venue.name.as_deref())
            .unwrap_or(VENUE_FALLBACK)
    }

    pub fn link(&self) -> &str {
        self.url.as_deref().unwrap_or(LINK_FALLBACK)
    }

    /// Local date, with " at <time>" appended when a non-empty local time exists.
    pub fn when(&self) -> String {
        let start = self.dates.as_ref().and_then(|dates| dates.start.as_ref());
        let date = start
            .and_then(|start| start.local_date.as_deref())
            .unwrap_or(DATE_FALLBACK);
        match start
            .and_then(|start| start.local_time.as_deref())
            .filter(|time| !time.is_empty())
        {
            Some(time) => format!("{date} at {time}"),
            None => date.to_string(),
        }
    }

    pub fn genre(&self) -> String {
        let Some(first) = self.classifications.first() else {
            return GENRE_FALLBACK.to_string();
        };
        let name_of = |named: &Option<NamedRef>| {
            named
                .as_ref()
                .and_then(|n| n.name.clone())
                .unwrap_or_default()
        };
        let genre = name_of(&first.genre);
        let sub_genre = name_of(&first.sub_genre);
        if genre.is_empty() || sub_genre.is_empty() {
            GENRE_FALLBACK.to_string()
        } else {
            format!("{genre}/{sub_genre}")
        }
    }
}
