//! # Failure Notifications
//!
//! Narrow notification port for out-of-band operator alerts. Every failure
//! path in the pipeline may send a plain-text alert with a subject and body;
//! delivery is strictly best-effort. [`notify_failure`] is the only way the
//! pipeline talks to the port and it swallows notifier errors at the
//! boundary, so a broken alert channel can never abort a run that has
//! already substantively succeeded.

use crate::config::AlertsConfig;
use crate::error::{ConnectorError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::{error, warn};

/// Fire-and-forget plain-text alert channel.
#[async_trait]
pub trait MailNotifier: Send + Sync {
    async fn send_plain_text(&self, subject: &str, body: &str) -> Result<()>;
}

/// Send an alert and discard any delivery failure. Failures are logged at
/// `warn` and nothing else; callers never see them.
pub async fn notify_failure(notifier: &dyn MailNotifier, subject: &str, body: &str) {
    if let Err(notify_error) = notifier.send_plain_text(subject, body).await {
        warn!(
            subject,
            %notify_error,
            "Failed to deliver failure notification, continuing"
        );
    }
}

/// Notifier that posts the alert as JSON to a mail relay webhook.
pub struct HttpMailNotifier {
    http: reqwest::Client,
    webhook_url: String,
    from: String,
    to: String,
}

impl HttpMailNotifier {
    pub fn new(webhook_url: String, config: &AlertsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }
}

#[async_trait]
impl MailNotifier for HttpMailNotifier {
    async fn send_plain_text(&self, subject: &str, body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": self.to,
            "subject": subject,
            "body": body,
        });

        let response = self.http.post(&self.webhook_url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ConnectorError::Notification(format!(
                "Mail relay returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Notifier that only logs the alert. Selected when no webhook URL is
/// configured.
#[derive(Default)]
pub struct LogOnlyNotifier;

#[async_trait]
impl MailNotifier for LogOnlyNotifier {
    async fn send_plain_text(&self, subject: &str, body: &str) -> Result<()> {
        error!(subject, body, "ALERT (log-only notifier)");
        Ok(())
    }
}

/// Build the notifier selected by configuration.
pub fn notifier_from_config(config: &AlertsConfig) -> Arc<dyn MailNotifier> {
    match &config.webhook_url {
        Some(url) => Arc::new(HttpMailNotifier::new(url.clone(), config)),
        None => Arc::new(LogOnlyNotifier),
    }
}

/// Test double that records sent alerts and can be switched to fail.
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailNotifier for RecordingNotifier {
    async fn send_plain_text(&self, subject: &str, body: &str) -> Result<()> {
        if self.failing {
            return Err(ConnectorError::Notification(
                "recording notifier configured to fail".to_string(),
            ));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_failure_swallows_notifier_errors() {
        let notifier = RecordingNotifier::failing();

        // Must not panic or propagate anything.
        notify_failure(&notifier, "subject", "body").await;

        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn notify_failure_delivers_through_working_notifier() {
        let notifier = RecordingNotifier::new();

        notify_failure(&notifier, "Issue detected", "details").await;

        assert_eq!(
            notifier.sent(),
            vec![("Issue detected".to_string(), "details".to_string())]
        );
    }

    #[test]
    fn log_only_notifier_is_selected_without_webhook_url() {
        let config = AlertsConfig {
            webhook_url: None,
            from: "a@b".to_string(),
            to: "c@d".to_string(),
        };

        // Just ensure construction succeeds; behaviour is covered above.
        let _notifier = notifier_from_config(&config);
    }
}
