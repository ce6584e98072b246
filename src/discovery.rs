use std::collections::HashSet;

use reqwest::{blocking::Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::{EventQuery, EventRecord, SearchResponse};
use crate::utils;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid discovery url: {0}")]
    Url(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("discovery api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

pub struct DiscoveryClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl DiscoveryClient {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.discovery_url.clone(),
            api_key: config.api_key.clone(),
            client: utils::http_client(),
        }
    }

    pub fn search_url(&self, query: &EventQuery) -> Result<Url, DiscoveryError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| DiscoveryError::Url(err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                pairs.append_pair("apikey", key);
            }
            for (key, value) in query.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// Runs one search and returns the first page, deduplicated by name.
    ///
    /// A response without an embedded events container means "no events" and
    /// yields an empty list; transport, status and decode failures are errors.
    pub fn fetch_events(&self, query: &EventQuery) -> Result<Vec<EventRecord>, DiscoveryError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|err| DiscoveryError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(DiscoveryError::Status { status, body: text });
        }

        let payload: SearchResponse =
            serde_json::from_str(&text).map_err(|err| DiscoveryError::Parse(err.to_string()))?;

        let events = match payload.embedded {
            Some(embedded) => embedded.events,
            None => {
                debug!("search response has no embedded events");
                return Ok(Vec::new());
            }
        };

        let received = events.len();
        let unique = dedupe_by_name(events);
        debug!(received, unique = unique.len(), "deduplicated search results");
        Ok(unique)
    }
}

/// Keeps the first event for each exact name, in input order. Unnamed events have no key and are all kept.
pub fn dedupe_by_name(events: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    events
        .into_iter()
        .filter(|event| match &event.name {
            Some(name) => seen.insert(name.clone()),
            None => true,
        })
        .collect()
}
