//! HTTP handlers for owner-facing invoice endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::{
    ChangeInvoiceStatusCommand, CreateInvoiceCommand, CreatePaymentTokenCommand,
    DeleteInvoiceCommand, GetInvoiceQuery, MarkInvoiceSentCommand, UpdateInvoiceCommand,
};
use crate::domain::foundation::InvoiceId;
use crate::domain::invoice::{InvoiceError, InvoiceStatus};

use super::super::error::{status_for, InvoiceApiError};
use super::super::extract::AuthenticatedOwner;
use super::super::state::AppState;
use super::dto::{
    ChangeStatusRequest, InvoiceRequest, InvoiceResponse, PaymentTokenFailure,
    PaymentTokenResponse,
};

/// POST /api/invoices - Create an invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(request): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let status = request.status.unwrap_or(InvoiceStatus::Draft);
    let cmd = CreateInvoiceCommand {
        owner_id: owner.owner_id,
        draft: request.into_draft()?,
        status,
    };

    let invoice = state.create_invoice_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(&invoice))))
}

/// GET /api/invoices/:id - Invoice with its payment history
pub async fn get_invoice(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let query = GetInvoiceQuery {
        invoice_id,
        owner_id: owner.owner_id,
    };

    let result = state.get_invoice_handler().handle(query).await?;
    let response = InvoiceResponse::from(&result.invoice).with_events(result.payment_events);
    Ok(Json(response))
}

/// PUT /api/invoices/:id - Edit a draft or pending invoice
pub async fn update_invoice(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
    Json(request): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let cmd = UpdateInvoiceCommand {
        invoice_id,
        owner_id: owner.owner_id,
        draft: request.into_draft()?,
    };

    let invoice = state.update_invoice_handler().handle(cmd).await?;
    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// DELETE /api/invoices/:id
pub async fn delete_invoice(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let cmd = DeleteInvoiceCommand {
        invoice_id,
        owner_id: owner.owner_id,
    };

    state.delete_invoice_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/invoices/:id/status - Owner-requested status change
pub async fn change_status(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let cmd = ChangeInvoiceStatusCommand {
        invoice_id,
        owner_id: owner.owner_id,
        target: request.status,
    };

    let result = state.change_status_handler().handle(cmd).await?;
    Ok(Json(InvoiceResponse::from(&result.invoice)))
}

/// POST /api/invoices/:id/sent - Draft to Pending once the invoice is sent
pub async fn mark_sent(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let cmd = MarkInvoiceSentCommand {
        invoice_id,
        owner_id: owner.owner_id,
    };

    let invoice = state.mark_sent_handler().handle(cmd).await?;
    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Token endpoint failures use the checkout page's `{success:false, message}` shape.
pub struct PaymentTokenApiError(InvoiceError);

impl From<InvoiceError> for PaymentTokenApiError {
    fn from(err: InvoiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentTokenApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment token request failed");
        }
        let body = PaymentTokenFailure {
            success: false,
            code: self.0.code().to_string(),
            message: self.0.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /api/invoices/:id/payment-token - Open a checkout transaction
pub async fn create_payment_token(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<impl IntoResponse, PaymentTokenApiError> {
    let cmd = CreatePaymentTokenCommand {
        invoice_id,
        owner_id: owner.owner_id,
    };

    let result = state.payment_token_handler().handle(cmd).await?;
    Ok(Json(PaymentTokenResponse::from(result)))
}
