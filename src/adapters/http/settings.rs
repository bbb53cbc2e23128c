//! Business settings endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::put;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::application::handlers::SaveGatewayCredentialsCommand;

use super::error::InvoiceApiError;
use super::extract::AuthenticatedOwner;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GatewayCredentialsRequest {
    pub client_key: String,
    pub server_key: String,
}

#[derive(Debug, Serialize)]
pub struct GatewayCredentialsResponse {
    pub saved: bool,
    pub is_sandbox: bool,
}

/// PUT /api/settings/gateway
///
/// The server key is write-only; it is never echoed back.
pub async fn save_gateway_credentials(
    State(state): State<AppState>,
    owner: AuthenticatedOwner,
    Json(request): Json<GatewayCredentialsRequest>,
) -> Result<impl IntoResponse, InvoiceApiError> {
    let cmd = SaveGatewayCredentialsCommand {
        owner_id: owner.owner_id,
        client_key: request.client_key,
        server_key: request.server_key,
    };

    let mode = state.save_credentials_handler().handle(cmd).await?;
    Ok(Json(GatewayCredentialsResponse {
        saved: true,
        is_sandbox: mode.is_sandbox(),
    }))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/gateway", put(save_gateway_credentials))
}
