//! GetInvoiceHandler - Query handler for an owner's invoice and its payment history.

use std::sync::Arc;

use crate::domain::foundation::{InvoiceId, OwnedByUser, UserId};
use crate::domain::invoice::{Invoice, InvoiceError};
use crate::ports::{InvoiceRepository, PaymentEventLog, PaymentEventRecord};

#[derive(Debug, Clone)]
pub struct GetInvoiceQuery {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
}

#[derive(Debug, Clone)]
pub struct GetInvoiceResult {
    pub invoice: Invoice,
    /// Payment notifications received for this invoice, newest first.
    pub payment_events: Vec<PaymentEventRecord>,
}

pub struct GetInvoiceHandler {
    repository: Arc<dyn InvoiceRepository>,
    event_log: Arc<dyn PaymentEventLog>,
}

impl GetInvoiceHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>, event_log: Arc<dyn PaymentEventLog>) -> Self {
        Self {
            repository,
            event_log,
        }
    }

    pub async fn handle(&self, query: GetInvoiceQuery) -> Result<GetInvoiceResult, InvoiceError> {
        let invoice = self
            .repository
            .find_by_id(query.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(query.invoice_id))?;
        invoice.check_ownership(&query.owner_id)?;

        let payment_events = self.event_log.find_by_invoice(invoice.id()).await?;
        Ok(GetInvoiceResult {
            invoice,
            payment_events,
        })
    }
}
