//! PostgreSQL implementation of GatewayCredentialStore.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::invoice::GatewayCredentials;
use crate::ports::GatewayCredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    client_key: String,
    server_key: String,
}

#[async_trait]
impl GatewayCredentialStore for PostgresCredentialStore {
    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<GatewayCredentials>, DomainError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT client_key, server_key FROM gateway_credentials WHERE owner_id = $1",
        )
        .bind(owner_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load credentials: {}", e)))?;

        Ok(row.map(|r| GatewayCredentials::new(owner_id.clone(), &r.client_key, &r.server_key)))
    }

    async fn save(&self, credentials: &GatewayCredentials) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO gateway_credentials (owner_id, client_key, server_key, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (owner_id) DO UPDATE SET
                client_key = EXCLUDED.client_key,
                server_key = EXCLUDED.server_key,
                updated_at = now()
            "#,
        )
        .bind(credentials.owner_id().as_str())
        .bind(credentials.client_key())
        .bind(credentials.server_key().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save credentials: {}", e)))?;

        Ok(())
    }
}
