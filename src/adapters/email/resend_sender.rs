//! Resend email adapter.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::ports::{
    DueReminderNotice, NotificationError, NotificationSender, PaymentReceivedNotice,
};

use super::templates::{self, RenderedEmail};

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends customer emails through the Resend API.
pub struct ResendNotificationSender {
    api_key: SecretString,
    api_base_url: String,
    from: String,
    recipient_override: Option<String>,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl ResendNotificationSender {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            api_key: SecretString::new(config.resend_api_key.clone()),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            from: config.from_header(),
            recipient_override: config.recipient_override.clone(),
            timeout: config.send_timeout(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, to: &str, email: RenderedEmail) -> Result<(), NotificationError> {
        let recipient = self.recipient_override.as_deref().unwrap_or(to);
        let body = SendEmailBody {
            from: &self.from,
            to: [recipient],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %error_text, "Resend send failed");
            return Err(NotificationError::Rejected(format!("{}: {}", status, error_text)));
        }

        tracing::info!(subject = %email.subject, overridden = self.recipient_override.is_some(), "Email sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    async fn send_payment_received(
        &self,
        notice: &PaymentReceivedNotice,
    ) -> Result<(), NotificationError> {
        self.send(&notice.to, templates::payment_received(notice)).await
    }

    async fn send_due_reminder(&self, notice: &DueReminderNotice) -> Result<(), NotificationError> {
        self.send(&notice.to, templates::due_reminder(notice)).await
    }
}
