//! Midtrans Snap adapter.
//!
//! Implements `PaymentGateway` against the Snap transactions API. The owner's
//! server key authenticates each call (HTTP basic auth, empty password) and
//! its prefix picks the sandbox or production host.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::config::PaymentConfig;
use crate::domain::invoice::{GatewayCredentials, GatewayMode};
use crate::ports::{GatewayError, PaymentGateway, TransactionRequest, TransactionToken};

use super::snap_types::{SnapErrorResponse, SnapTokenResponse, SnapTransactionBody};

/// Snap API configuration.
#[derive(Debug, Clone)]
pub struct SnapConfig {
    sandbox_base_url: String,
    production_base_url: String,
    request_timeout: Duration,
}

impl SnapConfig {
    pub fn new(
        sandbox_base_url: impl Into<String>,
        production_base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            sandbox_base_url: trim_slash(sandbox_base_url.into()),
            production_base_url: trim_slash(production_base_url.into()),
            request_timeout,
        }
    }

    /// Host for the given environment.
    pub fn base_url(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::Sandbox => &self.sandbox_base_url,
            GatewayMode::Production => &self.production_base_url,
        }
    }
}

impl From<&PaymentConfig> for SnapConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self::new(
            config.snap_sandbox_url.clone(),
            config.snap_production_url.clone(),
            config.request_timeout(),
        )
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Snap payment gateway adapter.
pub struct SnapClient {
    config: SnapConfig,
    http_client: reqwest::Client,
}

impl SnapClient {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for SnapClient {
    async fn create_transaction_token(
        &self,
        credentials: &GatewayCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionToken, GatewayError> {
        let mode = credentials.mode();
        let url = format!("{}/snap/v1/transactions", self.config.base_url(mode));

        let response = self
            .http_client
            .post(&url)
            .basic_auth(credentials.server_key().expose_secret(), Some(""))
            .timeout(self.config.request_timeout)
            .json(&SnapTransactionBody::from(request))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, order_id = %request.order_id, "Snap request failed");
                GatewayError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(
                order_id = %request.order_id,
                sandbox = mode.is_sandbox(),
                "Snap rejected server key"
            );
            return Err(GatewayError::Unauthorized { mode });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = SnapErrorResponse::describe(&body);
            tracing::error!(status = status.as_u16(), error = %message, "Snap create transaction failed");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: SnapTokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!(order_id = %request.order_id, sandbox = mode.is_sandbox(), "Snap token issued");
        Ok(TransactionToken {
            token: token.token,
            redirect_url: token.redirect_url,
        })
    }

    fn checkout_script_url(&self, mode: GatewayMode) -> String {
        format!("{}/snap/snap.js", self.config.base_url(mode))
    }
}
