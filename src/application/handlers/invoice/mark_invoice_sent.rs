//! MarkInvoiceSentHandler - records that an invoice was dispatched.
//!
//! Called after the invoice email or PDF goes out. A Draft invoice becomes
//! Pending; any other status is left alone.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{InvoiceId, OwnedByUser, UserId};
use crate::domain::invoice::{
    Invoice, InvoiceError, InvoiceStatus, TransitionAuthority, TransitionOutcome,
};
use crate::ports::InvoiceRepository;

#[derive(Debug, Clone)]
pub struct MarkInvoiceSentCommand {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
}

pub struct MarkInvoiceSentHandler {
    repository: Arc<dyn InvoiceRepository>,
}

impl MarkInvoiceSentHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: MarkInvoiceSentCommand) -> Result<Invoice, InvoiceError> {
        let mut invoice = self
            .repository
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(cmd.invoice_id))?;
        invoice.check_ownership(&cmd.owner_id)?;

        if invoice.status() != InvoiceStatus::Draft {
            return Ok(invoice);
        }

        let outcome = invoice.transition(
            InvoiceStatus::Pending,
            TransitionAuthority::Owner(&cmd.owner_id),
        )?;
        if let TransitionOutcome::Moved { from, .. } = outcome {
            if !self.repository.save_status(&invoice, from).await? {
                return Err(InvoiceError::Conflict(invoice.id()));
            }
            info!(invoice_id = %invoice.id(), "Draft invoice sent, now pending");
        }
        Ok(invoice)
    }
}
