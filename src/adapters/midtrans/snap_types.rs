//! Snap API wire types.

use serde::{Deserialize, Serialize};

use crate::ports::TransactionRequest;

/// Body of `POST /snap/v1/transactions`.
#[derive(Debug, Clone, Serialize)]
pub struct SnapTransactionBody {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    pub credit_card: CreditCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditCard {
    /// Forces 3-D Secure on card payments.
    pub secure: bool,
}

impl From<&TransactionRequest> for SnapTransactionBody {
    fn from(request: &TransactionRequest) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id: request.order_id.as_str().to_string(),
                gross_amount: request.gross_amount,
            },
            customer_details: CustomerDetails {
                first_name: request.customer_name.clone(),
                email: request.customer_email.clone(),
            },
            credit_card: CreditCard { secure: true },
        }
    }
}

/// Successful token response.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapTokenResponse {
    pub token: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Error response; Snap reports a list of messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapErrorResponse {
    #[serde(default)]
    pub error_messages: Vec<String>,
}

impl SnapErrorResponse {
    /// Joins the messages, falling back to the raw body.
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<SnapErrorResponse>(body) {
            Ok(parsed) if !parsed.error_messages.is_empty() => parsed.error_messages.join("; "),
            _ => body.trim().to_string(),
        }
    }
}
