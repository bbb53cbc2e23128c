//! CreateInvoiceHandler - Command handler for issuing a new invoice.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CustomerId, InvoiceId, UserId};
use crate::domain::invoice::{Invoice, InvoiceDraft, InvoiceError, InvoiceStatus};
use crate::ports::InvoiceRepository;

/// Command to create an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
    pub owner_id: UserId,
    pub draft: InvoiceDraft,
    /// Draft, or Pending when the invoice is ready to send.
    pub status: InvoiceStatus,
}

/// Handler for creating invoices.
///
/// Totals come from the money engine; the customer record is created or
/// refreshed for the contact's email.
pub struct CreateInvoiceHandler {
    repository: Arc<dyn InvoiceRepository>,
}

impl CreateInvoiceHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateInvoiceCommand) -> Result<Invoice, InvoiceError> {
        let mut invoice = Invoice::create(
            InvoiceId::new(),
            cmd.owner_id.clone(),
            CustomerId::new(),
            cmd.draft,
            cmd.status,
        )?;

        let customer_id = self
            .repository
            .resolve_customer(&cmd.owner_id, invoice.customer())
            .await?;
        invoice.assign_customer(customer_id);

        self.repository.save(&invoice).await?;

        info!(
            invoice_id = %invoice.id(),
            owner_id = %cmd.owner_id,
            total_amount = invoice.total_amount(),
            status = %invoice.status(),
            "Invoice created"
        );
        Ok(invoice)
    }
}
