use crate::config::NotificationConfig;
use crate::domain::model::ContactMessage;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// JSON body sent to the mail relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_contact_email(
    message: &ContactMessage,
    sender: &str,
    recipient: &str,
) -> ContactEmail {
    let body = escape_html(&message.message).replace('\n', "<br>");
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Subject:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n\
         <p><strong>Submitted at:</strong> {}</p>\n",
        escape_html(&message.name),
        escape_html(&message.email),
        escape_html(&message.subject),
        body,
        message.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    ContactEmail {
        from: sender.to_string(),
        to: recipient.to_string(),
        reply_to: message.email.clone(),
        subject: format!("New Contact Form Submission: {}", message.subject),
        html,
    }
}

/// Used when notifications are switched off.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_contact(&self, message: &ContactMessage) -> Result<()> {
        tracing::debug!(id = message.id, "Notifications disabled, skipping contact email");
        Ok(())
    }
}

/// Posts each contact message to an HTTP mail relay. One attempt, no retry.
pub struct MailRelayNotifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    sender: String,
    recipient: String,
}

impl MailRelayNotifier {
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| SiteError::ConfigError {
                message: "notification.endpoint is required when notifications are enabled"
                    .to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
        })
    }
}

#[async_trait]
impl Notifier for MailRelayNotifier {
    async fn notify_contact(&self, message: &ContactMessage) -> Result<()> {
        let email = render_contact_email(message, &self.sender, &self.recipient);

        tracing::debug!("Posting contact email to relay: {}", self.endpoint);
        let mut request = self.client.post(&self.endpoint).json(&email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiteError::NotificationError {
                message: format!("mail relay responded with {}: {}", status, body),
            });
        }

        Ok(())
    }
}

pub fn build_notifier(config: &NotificationConfig) -> Result<Arc<dyn Notifier>> {
    if !config.enabled {
        tracing::info!("Contact notifications disabled");
        return Ok(Arc::new(NoopNotifier));
    }

    let notifier = MailRelayNotifier::new(config)?;
    tracing::info!("📧 Contact notifications via {}", notifier.endpoint);
    Ok(Arc::new(notifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use httpmock::prelude::*;

    fn message() -> ContactMessage {
        ContactMessage {
            id: 7,
            name: "Jo <Tan>".to_string(),
            email: "jo@example.com".to_string(),
            subject: "Quote & timeline".to_string(),
            message: "Line one\nLine two".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    fn config(endpoint: String) -> NotificationConfig {
        NotificationConfig {
            enabled: true,
            endpoint: Some(endpoint),
            api_key: Some("relay-key".to_string()),
            sender: "Website <noreply@example.com>".to_string(),
            recipient: "contact@example.com".to_string(),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_render_contact_email() {
        let email = render_contact_email(
            &message(),
            "Website <noreply@example.com>",
            "contact@example.com",
        );

        assert_eq!(email.to, "contact@example.com");
        assert_eq!(email.reply_to, "jo@example.com");
        assert_eq!(email.subject, "New Contact Form Submission: Quote & timeline");
        assert!(email.html.contains("<strong>Name:</strong> Jo &lt;Tan&gt;"));
        assert!(email.html.contains("Quote &amp; timeline"));
        assert!(email.html.contains("<p>Line one<br>Line two</p>"));
        assert!(email.html.contains("2024-05-01 09:30:00 UTC"));
    }

    #[test]
    fn test_build_notifier_requires_endpoint_when_enabled() {
        let mut cfg = config(String::new());
        cfg.endpoint = None;
        assert!(build_notifier(&cfg).is_err());

        cfg.enabled = false;
        assert!(build_notifier(&cfg).is_ok());
    }

    #[tokio::test]
    async fn test_noop_notifier_succeeds() {
        assert!(NoopNotifier.notify_contact(&message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_relay_receives_rendered_email() {
        let server = MockServer::start();
        let relay_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/send")
                .header("authorization", "Bearer relay-key")
                .json_body_partial(
                    r#"{"to": "contact@example.com", "replyTo": "jo@example.com"}"#,
                );
            then.status(202);
        });

        let notifier = MailRelayNotifier::new(&config(server.url("/send"))).unwrap();
        notifier.notify_contact(&message()).await.unwrap();

        relay_mock.assert();
    }

    #[tokio::test]
    async fn test_relay_error_status_is_notification_error() {
        let server = MockServer::start();
        let relay_mock = server.mock(|when, then| {
            when.method(POST).path("/send");
            then.status(500).body("smtp down");
        });

        let notifier = MailRelayNotifier::new(&config(server.url("/send"))).unwrap();
        let result = notifier.notify_contact(&message()).await;

        relay_mock.assert();
        match result {
            Err(SiteError::NotificationError { message }) => {
                assert!(message.contains("smtp down"))
            }
            other => panic!("expected notification error, got {other:?}"),
        }
    }
}
