//! Payment gateway port for starting hosted checkout transactions.
//!
//! # Design
//!
//! - **Credentials per call**: the adapter holds no keys; each request carries
//!   the invoice owner's credentials
//! - **Mode from credentials**: sandbox or production follows `GatewayCredentials::mode`

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::invoice::{GatewayCredentials, GatewayMode};
use crate::domain::payment::OrderId;

/// Port for creating checkout transactions with the payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Requests a checkout token for a single-payment transaction.
    async fn create_transaction_token(
        &self,
        credentials: &GatewayCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionToken, GatewayError>;

    /// Browser script the client loads to open checkout for `mode`.
    fn checkout_script_url(&self, mode: GatewayMode) -> String;
}

/// Transaction to open on the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub order_id: OrderId,
    /// Invoice total in minor units.
    pub gross_amount: i64,
    pub customer_name: String,
    pub customer_email: String,
}

/// Token returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionToken {
    pub token: String,
    pub redirect_url: Option<String>,
}

/// Errors from the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway rejected the server key.
    #[error("Gateway rejected credentials ({mode:?})")]
    Unauthorized { mode: GatewayMode },

    /// The gateway refused the transaction.
    #[error("Gateway returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The gateway could not be reached.
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// The gateway answered with something we could not read.
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Owner-facing hint for a credential rejection.
    pub fn auth_hint(mode: GatewayMode) -> &'static str {
        match mode {
            GatewayMode::Sandbox => {
                "Sandbox server key was rejected; check the SB- key in your settings for typos."
            }
            GatewayMode::Production => {
                "Production key was rejected; the merchant account may not be approved for live \
                 payments yet. Use an SB- sandbox key for testing."
            }
        }
    }
}
