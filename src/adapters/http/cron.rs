//! Scheduled job endpoint, called by an external scheduler once a day.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::error::{ErrorResponse, InvoiceApiError};
use super::state::AppState;

/// Header alternative to the `key` query parameter.
pub const CRON_KEY_HEADER: &str = "X-Cron-Key";

#[derive(Debug, Deserialize)]
pub struct CronParams {
    #[serde(default)]
    pub key: Option<String>,
    /// Overrides the current date, for backfills.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CronResponse {
    pub date: NaiveDate,
    pub reminders_sent: usize,
    pub reminders_failed: usize,
    pub marked_overdue: usize,
    pub overdue_skipped: usize,
}

/// An empty configured secret never matches, which disables the endpoint.
fn key_matches(configured: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(p) if !configured.is_empty() => {
            bool::from(configured.as_bytes().ct_eq(p.trim().as_bytes()))
        }
        _ => false,
    }
}

/// GET|POST /internal/cron/invoices - Due reminders, then the overdue sweep
pub async fn run_invoice_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CronParams>,
) -> Result<axum::response::Response, InvoiceApiError> {
    let provided = params
        .key
        .as_deref()
        .or_else(|| headers.get(CRON_KEY_HEADER).and_then(|v| v.to_str().ok()));
    if !key_matches(state.settings.cron_secret.expose_secret(), provided) {
        warn!(target: "security", "Cron request with missing or wrong key");
        let body = ErrorResponse::new("UNAUTHORIZED", "Invalid cron key");
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    }

    let today = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let reminders = state.due_reminders_handler().handle(today).await?;
    let overdue = state.overdue_handler().handle(today).await?;

    info!(
        date = %today,
        reminders_sent = reminders.sent,
        reminders_failed = reminders.failed,
        marked_overdue = overdue.marked,
        "Invoice jobs finished"
    );

    let response = CronResponse {
        date: today,
        reminders_sent: reminders.sent,
        reminders_failed: reminders.failed,
        marked_overdue: overdue.marked,
        overdue_skipped: overdue.skipped,
    };
    Ok(Json(response).into_response())
}

pub fn cron_routes() -> Router<AppState> {
    Router::new().route("/invoices", get(run_invoice_jobs).post(run_invoice_jobs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_must_match_exactly() {
        assert!(key_matches("s3cret", Some("s3cret")));
        assert!(key_matches("s3cret", Some(" s3cret ")));
        assert!(!key_matches("s3cret", Some("s3cre")));
        assert!(!key_matches("s3cret", None));
    }

    #[test]
    fn empty_secret_disables_endpoint() {
        assert!(!key_matches("", Some("")));
        assert!(!key_matches("", Some("anything")));
    }
}
