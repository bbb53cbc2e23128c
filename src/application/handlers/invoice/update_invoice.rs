//! UpdateInvoiceHandler - Command handler for editing an unsettled invoice.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{InvoiceId, UserId};
use crate::domain::invoice::{Invoice, InvoiceDraft, InvoiceError};
use crate::ports::InvoiceRepository;

use super::storage_error;

/// Command to replace an invoice's content.
#[derive(Debug, Clone)]
pub struct UpdateInvoiceCommand {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
    pub draft: InvoiceDraft,
}

/// Handler for editing invoices.
///
/// Only Draft and Pending invoices can be edited, and the status itself is
/// never changed here.
pub struct UpdateInvoiceHandler {
    repository: Arc<dyn InvoiceRepository>,
}

impl UpdateInvoiceHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateInvoiceCommand) -> Result<Invoice, InvoiceError> {
        let mut invoice = self
            .repository
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(cmd.invoice_id))?;

        let observed = invoice.status();
        invoice.revise(&cmd.owner_id, cmd.draft)?;

        let customer_id = self
            .repository
            .resolve_customer(&cmd.owner_id, invoice.customer())
            .await?;
        invoice.assign_customer(customer_id);

        self.repository
            .update(&invoice, observed)
            .await
            .map_err(|e| storage_error(invoice.id(), e))?;

        info!(
            invoice_id = %invoice.id(),
            total_amount = invoice.total_amount(),
            "Invoice updated"
        );
        Ok(invoice)
    }
}
