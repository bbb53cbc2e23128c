//! PostgreSQL implementation of PaymentEventLog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId};
use crate::ports::{PaymentEventLog, PaymentEventOutcome, PaymentEventRecord};

pub struct PostgresPaymentEventLog {
    pool: PgPool,
}

impl PostgresPaymentEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentEventRow {
    order_id: String,
    invoice_id: Option<Uuid>,
    transaction_status: String,
    fraud_status: Option<String>,
    gross_amount: String,
    transaction_id: Option<String>,
    outcome: String,
    detail: Option<String>,
    received_at: DateTime<Utc>,
}

impl TryFrom<PaymentEventRow> for PaymentEventRecord {
    type Error = DomainError;

    fn try_from(row: PaymentEventRow) -> Result<Self, Self::Error> {
        let outcome = parse_outcome(&row.outcome)?;
        Ok(PaymentEventRecord {
            order_id: row.order_id,
            invoice_id: row.invoice_id.map(InvoiceId::from_uuid),
            transaction_status: row.transaction_status,
            fraud_status: row.fraud_status,
            gross_amount: row.gross_amount,
            transaction_id: row.transaction_id,
            outcome,
            detail: row.detail,
            received_at: row.received_at,
        })
    }
}

fn parse_outcome(s: &str) -> Result<PaymentEventOutcome, DomainError> {
    match s {
        "applied" => Ok(PaymentEventOutcome::Applied),
        "unchanged" => Ok(PaymentEventOutcome::Unchanged),
        "ignored" => Ok(PaymentEventOutcome::Ignored),
        "rejected" => Ok(PaymentEventOutcome::Rejected),
        "failed" => Ok(PaymentEventOutcome::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment event outcome: {}", s),
        )),
    }
}

#[async_trait]
impl PaymentEventLog for PostgresPaymentEventLog {
    async fn record(&self, record: &PaymentEventRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payment_events (
                order_id, invoice_id, transaction_status, fraud_status, gross_amount,
                transaction_id, outcome, detail, received_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.order_id)
        .bind(record.invoice_id.map(|id| *id.as_uuid()))
        .bind(&record.transaction_status)
        .bind(&record.fraud_status)
        .bind(&record.gross_amount)
        .bind(&record.transaction_id)
        .bind(record.outcome.as_str())
        .bind(&record.detail)
        .bind(record.received_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record payment event: {}", e)))?;

        Ok(())
    }

    async fn find_by_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<PaymentEventRecord>, DomainError> {
        let rows: Vec<PaymentEventRow> = sqlx::query_as(
            r#"
            SELECT order_id, invoice_id, transaction_status, fraud_status, gross_amount,
                   transaction_id, outcome, detail, received_at
            FROM payment_events
            WHERE invoice_id = $1
            ORDER BY received_at DESC, id DESC
            "#,
        )
        .bind(invoice_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load payment events: {}", e)))?;

        rows.into_iter().map(PaymentEventRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_round_trips_through_storage_text() {
        for outcome in [
            PaymentEventOutcome::Applied,
            PaymentEventOutcome::Unchanged,
            PaymentEventOutcome::Ignored,
            PaymentEventOutcome::Rejected,
            PaymentEventOutcome::Failed,
        ] {
            assert_eq!(parse_outcome(outcome.as_str()).unwrap(), outcome);
        }
        assert!(parse_outcome("lost").is_err());
    }
}
