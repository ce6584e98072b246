use reqwest::{blocking::Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::utils;

const TITLE: &str = "New Ticketmaster Event";
const PRIORITY: &str = "default";
const TAGS: &str = "ticket,calendar";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("NTFY_URL is not configured")]
    MissingUrl,
    #[error("http error: {0}")]
    Http(String),
    #[error("ntfy returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unreadable ntfy response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct NotifyReceipt {
    pub status: StatusCode,
    pub body: Value,
}

impl NotifyReceipt {
    pub fn message_id(&self) -> Option<&str> {
        self.body.get("id").and_then(|val| val.as_str())
    }
}

pub struct Notifier {
    url: Option<String>,
    client: Client,
}

impl Notifier {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            url: config.ntfy_url.clone(),
            client: utils::http_client(),
        }
    }

    /// Publishes one message. Only a 200 with a JSON body counts as delivered.
    pub fn post(&self, message: &str) -> Result<NotifyReceipt, NotifyError> {
        let url = self.url.as_deref().ok_or(NotifyError::MissingUrl)?;

        let response = self
            .client
            .post(url)
            .header("Title", TITLE)
            .header("Priority", PRIORITY)
            .header("Tags", TAGS)
            .body(message.as_bytes().to_vec())
            .send()
            .map_err(|err| NotifyError::Http(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| NotifyError::Http(err.to_string()))?;

        if status != StatusCode::OK {
            return Err(NotifyError::Status { status, body: text });
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|err| NotifyError::Parse(err.to_string()))?;
        Ok(NotifyReceipt { status, body })
    }

    /// Fire-and-forget wrapper around [`Notifier::post`]: logs the outcome, never fails.
    pub fn send_notification(&self, message: &str) -> bool {
        match self.post(message) {
            Ok(receipt) => {
                info!(
                    status = receipt.status.as_u16(),
                    id = receipt.message_id().unwrap_or("unknown"),
                    "✓ Notification sent successfully"
                );
                info!("  Response: {}", receipt.body);
                true
            }
            Err(NotifyError::MissingUrl) => {
                error!("Error: NTFY_URL is not configured");
                false
            }
            Err(NotifyError::Status { status, body }) => {
                error!(status = status.as_u16(), "✗ Error sending notification");
                error!("  Response: {body}");
                false
            }
            Err(err) => {
                error!("✗ Exception while sending: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, CannedServer};

    const MESSAGE: &str = "🎭 Concert A\n🔗 More info: Link not available";

    fn notifier_for(url: Option<String>) -> Notifier {
        let config = AppConfig {
            ntfy_url: url,
            ..AppConfig::default()
        };
        Notifier::from_config(&config)
    }

    #[test]
    fn missing_url_fails_without_network() {
        let notifier = notifier_for(None);
        assert!(matches!(notifier.post(MESSAGE), Err(NotifyError::MissingUrl)));
        assert!(!notifier.send_notification(MESSAGE));
    }

    #[test]
    fn ok_response_is_delivered() {
        let server = CannedServer::json(200, r#"{"id":"abc","topic":"shows","event":"message"}"#);
        let notifier = notifier_for(Some(server.url.clone()));

        let receipt = notifier.post(MESSAGE).expect("delivered");
        assert_eq!(receipt.status, StatusCode::OK);
        assert_eq!(receipt.message_id(), Some("abc"));

        let request = server.request();
        let lowered = request.to_ascii_lowercase();
        assert!(request.starts_with("POST / "));
        assert!(lowered.contains("title: new ticketmaster event"));
        assert!(lowered.contains("priority: default"));
        assert!(lowered.contains("tags: ticket,calendar"));
        assert!(request.ends_with(MESSAGE));
    }

    #[test]
    fn send_notification_reports_success() {
        let server = CannedServer::json(200, r#"{"id":"abc"}"#);
        assert!(notifier_for(Some(server.url.clone())).send_notification(MESSAGE));
    }

    #[test]
    fn server_error_is_not_delivered() {
        let server = CannedServer::respond(500, "text/plain", "upstream exploded");
        let notifier = notifier_for(Some(server.url.clone()));
        match notifier.post(MESSAGE) {
            Err(NotifyError::Status { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn send_notification_swallows_server_error() {
        let server = CannedServer::respond(500, "text/plain", "upstream exploded");
        assert!(!notifier_for(Some(server.url.clone())).send_notification(MESSAGE));
    }

    #[test]
    fn non_json_ok_body_counts_as_failure() {
        let server = CannedServer::respond(200, "text/plain", "ok");
        let notifier = notifier_for(Some(server.url.clone()));
        assert!(matches!(notifier.post(MESSAGE), Err(NotifyError::Parse(_))));
    }

    #[test]
    fn transport_failure_returns_false() {
        assert!(!notifier_for(Some(dead_url())).send_notification(MESSAGE));
    }
}
