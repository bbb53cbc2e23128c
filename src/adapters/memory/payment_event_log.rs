//! In-memory payment notification audit log.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, InvoiceId};
use crate::ports::{PaymentEventLog, PaymentEventRecord};

#[derive(Default)]
pub struct InMemoryPaymentEventLog {
    records: RwLock<Vec<PaymentEventRecord>>,
}

impl InMemoryPaymentEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in arrival order.
    pub async fn records(&self) -> Vec<PaymentEventRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl PaymentEventLog for InMemoryPaymentEventLog {
    async fn record(&self, record: &PaymentEventRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> Result<Vec<PaymentEventRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.invoice_id == Some(invoice_id))
            .cloned()
            .collect())
    }
}
