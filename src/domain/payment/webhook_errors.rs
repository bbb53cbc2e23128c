//! Error types for payment notification handling.
//!
//! The gateway retries any non-2xx response, so the status code mapping
//! decides whether a delivery is retried.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while verifying or reconciling a payment notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature did not match the owner's server key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Paid amount differs from the invoice total.
    #[error("Amount mismatch: invoice total is {expected}, notification reports {received}")]
    AmountMismatch { expected: i64, received: i64 },

    /// Body is not a usable notification.
    #[error("Malformed notification: {0}")]
    Malformed(String),

    /// Required field missing or empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Order id does not contain an invoice id.
    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// Referenced invoice could not be found.
    #[error("Invoice not found")]
    InvoiceNotFound,

    /// Invoice owner has no server key on file.
    #[error("Gateway credentials not configured for invoice owner")]
    CredentialsMissing,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the gateway should redeliver.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::FORBIDDEN,

            WebhookError::AmountMismatch { .. }
            | WebhookError::Malformed(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            WebhookError::UnknownOrder(_)
            | WebhookError::InvoiceNotFound
            | WebhookError::CredentialsMissing => StatusCode::NOT_FOUND,

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
