//! Payment gateway configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment gateway configuration (Midtrans Snap)
///
/// Keys are per owner and live in the credential store, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Snap base URL for sandbox keys
    #[serde(default = "default_sandbox_url")]
    pub snap_sandbox_url: String,

    /// Snap base URL for production keys
    #[serde(default = "default_production_url")]
    pub snap_production_url: String,

    /// Gateway request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for url in [&self.snap_sandbox_url, &self.snap_production_url] {
            if !url.starts_with("https://") {
                return Err(ValidationError::GatewayUrlMustBeHttps(url.clone()));
            }
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            snap_sandbox_url: default_sandbox_url(),
            snap_production_url: default_production_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_sandbox_url() -> String {
    "https://app.sandbox.midtrans.com".to_string()
}

fn default_production_url() -> String {
    "https://app.midtrans.com".to_string()
}

fn default_request_timeout() -> u64 {
    15
}
