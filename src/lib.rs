pub mod config;
pub mod discovery;
pub mod message;
pub mod models;
pub mod ntfy;
mod utils;

#[cfg(test)]
mod test_support;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use config::AppConfig;
use discovery::DiscoveryClient;
use models::EventQuery;
use ntfy::Notifier;

pub use utils::today;

/// Tally of one run. `fetch_failed` separates "search failed" from "nothing new".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub delivered: usize,
    pub failed: usize,
    pub fetch_failed: bool,
}

/// Fetch, then format and notify each event strictly one after another.
pub fn run(config: &AppConfig, today: NaiveDate) -> RunSummary {
    info!(
        "🔍 Searching for events in {} ({})...",
        config.city, config.country_code
    );
    if config.api_key.is_none() {
        warn!("API_KEY is not configured; the search will likely be rejected");
    }

    let query = EventQuery::new(config, today);
    let mut summary = RunSummary::default();

    let events = match DiscoveryClient::from_config(config).fetch_events(&query) {
        Ok(events) => events,
        Err(err) => {
            error!("✗ Event search failed: {err}");
            summary.fetch_failed = true;
            return summary;
        }
    };

    if events.is_empty() {
        info!("ℹ No new events found");
        return summary;
    }

    summary.found = events.len();
    info!("✓ {} event(s) found", events.len());

    let notifier = Notifier::from_config(config);
    for event in &events {
        let message = message::generate_message(event);
        if notifier.send_notification(&message) {
            summary.delivered += 1;
        } else {
            summary.failed += 1;
        }
        info!("  → {}", event.display_name());
    }

    info!(
        found = summary.found,
        delivered = summary.delivered,
        failed = summary.failed,
        "run complete"
    );
    summary
}
