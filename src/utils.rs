use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("ticket-alerts/", env!("CARGO_PKG_VERSION"));

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to a default http client");
            Client::new()
        })
});

/// Shared blocking client. No timeout is set; reqwest's defaults apply.
pub fn http_client() -> Client {
    CLIENT.clone()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
