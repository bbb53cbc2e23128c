//! In-memory gateway credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::invoice::GatewayCredentials;
use crate::ports::GatewayCredentialStore;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<HashMap<UserId, GatewayCredentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GatewayCredentialStore for InMemoryCredentialStore {
    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<GatewayCredentials>, DomainError> {
        Ok(self.credentials.read().await.get(owner_id).cloned())
    }

    async fn save(&self, credentials: &GatewayCredentials) -> Result<(), DomainError> {
        self.credentials
            .write()
            .await
            .insert(credentials.owner_id().clone(), credentials.clone());
        Ok(())
    }
}
