//! SaveGatewayCredentialsHandler - stores an owner's payment gateway keys.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::invoice::{GatewayCredentials, GatewayMode, InvoiceError};
use crate::ports::GatewayCredentialStore;

#[derive(Debug, Clone)]
pub struct SaveGatewayCredentialsCommand {
    pub owner_id: UserId,
    pub client_key: String,
    pub server_key: String,
}

pub struct SaveGatewayCredentialsHandler {
    store: Arc<dyn GatewayCredentialStore>,
}

impl SaveGatewayCredentialsHandler {
    pub fn new(store: Arc<dyn GatewayCredentialStore>) -> Self {
        Self { store }
    }

    /// Validates and saves the key pair, returning the inferred environment.
    pub async fn handle(&self, cmd: SaveGatewayCredentialsCommand) -> Result<GatewayMode, InvoiceError> {
        let credentials = GatewayCredentials::new(cmd.owner_id, &cmd.client_key, &cmd.server_key);
        if credentials.client_key().is_empty() {
            return Err(InvoiceError::validation("client_key", "Client key is required"));
        }
        if !credentials.is_complete() {
            return Err(InvoiceError::validation("server_key", "Server key is required"));
        }

        self.store.save(&credentials).await?;

        let mode = credentials.mode();
        info!(owner_id = %credentials.owner_id(), sandbox = mode.is_sandbox(), "Gateway credentials saved");
        Ok(mode)
    }
}
