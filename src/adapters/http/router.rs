//! Top-level router with the shared middleware stack.

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::cron::cron_routes;
use super::health::health;
use super::invoice::invoice_routes;
use super::settings::settings_routes;
use super::state::AppState;
use super::webhook::webhook_routes;

/// Builds the application router.
///
/// # Routes
///
/// - `/health` - liveness
/// - `/api/invoices` - owner invoice API
/// - `/api/settings` - owner gateway keys
/// - `/webhooks` - payment notifications
/// - `/internal/cron` - scheduled jobs
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/invoices", invoice_routes())
        .nest("/api/settings", settings_routes())
        .nest("/webhooks", webhook_routes())
        .nest("/internal/cron", cron_routes())
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
