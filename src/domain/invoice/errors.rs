//! Invoice-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | InvalidState | 409 |
//! | Conflict | 409 |
//! | ValidationFailed | 400 |
//! | GatewayNotConfigured | 422 |
//! | GatewayAuth | 502 |
//! | Gateway | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId, ValidationError};

use super::{InvoiceStatus, MoneyError};

/// Errors raised by owner-facing invoice operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceError {
    /// Invoice does not exist (or is not visible to the requester).
    NotFound(InvoiceId),

    /// Requester is not the owning account.
    Forbidden,

    /// The lifecycle table does not allow the requested change.
    InvalidState {
        current: InvoiceStatus,
        attempted: String,
    },

    /// The invoice changed underneath the request.
    Conflict(InvoiceId),

    /// Input failed validation.
    ValidationFailed { field: String, message: String },

    /// The owner has not stored payment gateway keys.
    GatewayNotConfigured,

    /// The gateway rejected the owner's credentials.
    GatewayAuth { hint: String },

    /// Any other gateway failure.
    Gateway(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl InvoiceError {
    pub fn invalid_state(current: InvoiceStatus, attempted: impl Into<String>) -> Self {
        InvoiceError::InvalidState {
            current,
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        InvoiceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            InvoiceError::NotFound(_) => ErrorCode::InvoiceNotFound,
            InvoiceError::Forbidden => ErrorCode::Forbidden,
            InvoiceError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            InvoiceError::Conflict(_) => ErrorCode::Conflict,
            InvoiceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            InvoiceError::GatewayNotConfigured => ErrorCode::GatewayNotConfigured,
            InvoiceError::GatewayAuth { .. } => ErrorCode::GatewayAuthenticationFailed,
            InvoiceError::Gateway(_) => ErrorCode::GatewayError,
            InvoiceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Field the error refers to, for form-level rendering.
    pub fn field(&self) -> Option<&str> {
        match self {
            InvoiceError::ValidationFailed { field, .. } => Some(field),
            InvoiceError::InvalidState { .. } => Some("status"),
            _ => None,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            InvoiceError::NotFound(id) => format!("Invoice not found: {}", id),
            InvoiceError::Forbidden => "You do not own this invoice".to_string(),
            InvoiceError::InvalidState { current, attempted } => {
                format!("Cannot {} an invoice that is {}", attempted, current)
            }
            InvoiceError::Conflict(id) => {
                format!("Invoice {} was modified concurrently, reload and retry", id)
            }
            InvoiceError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            InvoiceError::GatewayNotConfigured => {
                "Payment gateway keys are not configured in your business settings".to_string()
            }
            InvoiceError::GatewayAuth { hint } => {
                format!("Payment gateway rejected the credentials. {}", hint)
            }
            InvoiceError::Gateway(msg) => format!("Payment gateway error: {}", msg),
            InvoiceError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for InvoiceError {}

impl From<ValidationError> for InvoiceError {
    fn from(err: ValidationError) -> Self {
        InvoiceError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<MoneyError> for InvoiceError {
    fn from(err: MoneyError) -> Self {
        ValidationError::from(err).into()
    }
}

impl From<DomainError> for InvoiceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => InvoiceError::Forbidden,
            ErrorCode::ValidationFailed => InvoiceError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => InvoiceError::Infrastructure(err.to_string()),
        }
    }
}
