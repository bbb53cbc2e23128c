//! DeleteInvoiceHandler - owner-initiated invoice deletion.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{InvoiceId, UserId};
use crate::domain::invoice::InvoiceError;
use crate::ports::InvoiceRepository;

#[derive(Debug, Clone)]
pub struct DeleteInvoiceCommand {
    pub invoice_id: InvoiceId,
    pub owner_id: UserId,
}

/// Deletes an invoice and its line items.
///
/// Paid invoices are kept as the record of a settled payment.
pub struct DeleteInvoiceHandler {
    repository: Arc<dyn InvoiceRepository>,
}

impl DeleteInvoiceHandler {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteInvoiceCommand) -> Result<(), InvoiceError> {
        let invoice = self
            .repository
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or(InvoiceError::NotFound(cmd.invoice_id))?;
        invoice.ensure_deletable(&cmd.owner_id)?;

        // a payment may have settled since the read
        if !self.repository.delete(cmd.invoice_id, &cmd.owner_id).await? {
            return Err(InvoiceError::Conflict(cmd.invoice_id));
        }

        info!(invoice_id = %cmd.invoice_id, "Invoice deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryInvoiceRepository;
    use crate::application::handlers::test_fixtures::{invoice_with_status, owner, stranger};
    use crate::domain::invoice::InvoiceStatus;

    async fn setup(status: InvoiceStatus) -> (DeleteInvoiceHandler, Arc<InMemoryInvoiceRepository>, InvoiceId) {
        let repo = Arc::new(InMemoryInvoiceRepository::new());
        let invoice = invoice_with_status(status);
        repo.save(&invoice).await.unwrap();
        (DeleteInvoiceHandler::new(repo.clone()), repo, invoice.id())
    }

    #[tokio::test]
    async fn owner_deletes_unpaid_invoice() {
        let (handler, repo, id) = setup(InvoiceStatus::Pending).await;
        handler
            .handle(DeleteInvoiceCommand { invoice_id: id, owner_id: owner() })
            .await
            .unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn paid_invoice_is_kept() {
        let (handler, repo, id) = setup(InvoiceStatus::Paid).await;
        let err = handler
            .handle(DeleteInvoiceCommand { invoice_id: id, owner_id: owner() })
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidState { .. }));
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let (handler, repo, id) = setup(InvoiceStatus::Draft).await;
        let err = handler
            .handle(DeleteInvoiceCommand { invoice_id: id, owner_id: stranger() })
            .await
            .unwrap_err();
        assert_eq!(err, InvoiceError::Forbidden);
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }
}
