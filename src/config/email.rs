//! Email configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key. Empty logs emails instead of sending them.
    #[serde(default)]
    pub resend_api_key: String,

    /// Resend API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Deliver every message to this address instead of the customer
    pub recipient_override: Option<String>,

    /// Upper bound on a single send, in seconds
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Whether real delivery is configured
    pub fn is_enabled(&self) -> bool {
        !self.resend_api_key.is_empty()
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_enabled() && !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if let Some(address) = &self.recipient_override {
            if !address.contains('@') {
                return Err(ValidationError::InvalidRecipientOverride);
            }
        }
        if self.send_timeout_secs == 0 || self.send_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            api_base_url: default_api_base_url(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            recipient_override: None,
            send_timeout_secs: default_send_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from_email() -> String {
    "billing@invoicer.app".to_string()
}

fn default_from_name() -> String {
    "Invoicer".to_string()
}

fn default_send_timeout() -> u64 {
    10
}
