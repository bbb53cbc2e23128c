//! Axum router configuration for invoice endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    change_status, create_invoice, create_payment_token, delete_invoice, get_invoice, mark_sent,
    update_invoice,
};

/// Create the invoice API router, mounted at `/api/invoices`.
///
/// # Routes
///
/// - `POST /` - Create an invoice
/// - `GET /:id` - Invoice with payment history
/// - `PUT /:id` - Edit a draft or pending invoice
/// - `DELETE /:id` - Delete an unpaid invoice
/// - `POST /:id/status` - Owner status change
/// - `POST /:id/sent` - Mark a draft as sent
/// - `POST /:id/payment-token` - Open a checkout transaction
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invoice))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/:id/status", post(change_status))
        .route("/:id/sent", post(mark_sent))
        .route("/:id/payment-token", post(create_payment_token))
}
