//! Error responses shared by the owner-facing API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::DomainError;
use crate::domain::invoice::InvoiceError;

/// Error body: `{code, message, field?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Offending input field, for form errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// HTTP status for an invoice error.
pub fn status_for(err: &InvoiceError) -> StatusCode {
    match err {
        InvoiceError::NotFound(_) => StatusCode::NOT_FOUND,
        InvoiceError::Forbidden => StatusCode::FORBIDDEN,
        InvoiceError::InvalidState { .. } | InvoiceError::Conflict(_) => StatusCode::CONFLICT,
        InvoiceError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        InvoiceError::GatewayNotConfigured => StatusCode::UNPROCESSABLE_ENTITY,
        InvoiceError::GatewayAuth { .. } | InvoiceError::Gateway(_) => StatusCode::BAD_GATEWAY,
        InvoiceError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// API error type that converts invoice errors to HTTP responses.
#[derive(Debug)]
pub struct InvoiceApiError(pub InvoiceError);

impl From<InvoiceError> for InvoiceApiError {
    fn from(err: InvoiceError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for InvoiceApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for InvoiceApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Invoice request failed");
        }

        let mut body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        if let Some(field) = self.0.field() {
            body = body.with_field(field);
        }
        (status, Json(body)).into_response()
    }
}
