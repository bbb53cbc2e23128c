//! ChangeInvoiceStatusHandler - Owner-initiated status changes.
//!
//! Covers the manual "mark paid", "mark unpaid" and "void" actions. Owner
//! changes never send the payment-received email; that is reserved for
//! payments confirmed by the gateway.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{InvoiceId, UserId};
use crate::domain::invoice::{
    Invoice, InvoiceError, InvoiceStatus, TransitionAuthority, TransitionOutcome,
};
use crate::ports::InvoiceRepository;

/// Command to move an invoice to another status.
#[derive(Debug, Clone)]
pub struct ChangeInvoiceStatusCommand {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
    pub target: InvoiceStatus,
}

/// Result of a status change request.
#[derive(Debug, Clone)]
pub struct ChangeInvoiceStatusResult {
    pub invoice: Invoice,
    /// False when the invoice already had the requested status.
    pub changed: bool,
}

pub struct ChangeInvoiceStatusHandler {
    repository: Arc<dyn InvoiceRepository>,
}

impl ChangeInvoiceStatusHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: ChangeInvoiceStatusCommand,
    ) -> Result<ChangeInvoiceStatusResult, InvoiceError> {
        let mut invoice = self
            .repository
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(cmd.invoice_id))?;

        let outcome = invoice.transition(cmd.target, TransitionAuthority::Owner(&cmd.owner_id))?;

        let TransitionOutcome::Moved { from, to } = outcome else {
            return Ok(ChangeInvoiceStatusResult {
                invoice,
                changed: false,
            });
        };

        if !self.repository.save_status(&invoice, from).await? {
            return Err(InvoiceError::Conflict(invoice.id()));
        }

        info!(
            invoice_id = %invoice.id(),
            from = %from,
            to = %to,
            "Invoice status changed by owner"
        );
        Ok(ChangeInvoiceStatusResult {
            invoice,
            changed: true,
        })
    }
}
