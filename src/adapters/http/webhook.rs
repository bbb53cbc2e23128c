//! Payment notification endpoint.
//!
//! No owner authentication: the body is authenticated by its signature.
//! Any 2xx acknowledges the delivery; anything else makes the gateway retry.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::application::handlers::{ReconcileOutcome, ReconcilePaymentCommand};
use crate::domain::payment::WebhookError;

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
    pub outcome: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WebhookFailure {
    pub ok: bool,
    pub message: String,
}

/// Maps webhook errors to the status the gateway sees.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if self.0.is_retryable() {
            tracing::error!(error = %self.0, "Payment notification failed, gateway will retry");
        }
        let body = WebhookFailure {
            ok: false,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn outcome_label(outcome: &ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Applied { .. } => "applied",
        ReconcileOutcome::Unchanged => "unchanged",
        ReconcileOutcome::Ignored { .. } => "ignored",
        ReconcileOutcome::Rejected { .. } => "rejected",
    }
}

/// POST /webhooks/payment
///
/// Takes the raw body so the signature is checked against exactly what was sent.
pub async fn handle_payment_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let cmd = ReconcilePaymentCommand {
        payload: body.to_vec(),
    };

    let outcome = state.reconcile_handler().handle(cmd).await?;
    Ok(Json(WebhookAck {
        ok: true,
        outcome: outcome_label(&outcome),
    }))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/payment", post(handle_payment_notification))
}
