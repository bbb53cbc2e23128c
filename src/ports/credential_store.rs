//! Per-owner gateway credential storage port.
//!
//! Keys live in each owner's business profile. There is no process-wide
//! gateway secret.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::invoice::GatewayCredentials;

#[async_trait]
pub trait GatewayCredentialStore: Send + Sync {
    /// Returns `None` if the owner has never saved keys.
    async fn find_by_owner(&self, owner_id: &UserId)
        -> Result<Option<GatewayCredentials>, DomainError>;

    /// Insert or replace the owner's keys.
    async fn save(&self, credentials: &GatewayCredentials) -> Result<(), DomainError>;
}
