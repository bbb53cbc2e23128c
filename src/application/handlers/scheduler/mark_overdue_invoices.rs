//! MarkOverdueInvoicesHandler - moves Pending invoices past their due date to Overdue.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::invoice::{InvoiceError, InvoiceStatus, TransitionAuthority, TransitionOutcome};
use crate::ports::InvoiceRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdueSummary {
    pub marked: usize,
    /// Invoices that changed under us (usually a payment landing first).
    pub skipped: usize,
}

pub struct MarkOverdueInvoicesHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl MarkOverdueInvoicesHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, today: NaiveDate) -> Result<OverdueSummary, InvoiceError> {
        let candidates = self
            .invoices
            .find_by_status_due_before(InvoiceStatus::Pending, today)
            .await?;

        let mut summary = OverdueSummary::default();
        for mut invoice in candidates {
            let moved = match invoice.transition(
                InvoiceStatus::Overdue,
                TransitionAuthority::Scheduler { today },
            ) {
                Ok(TransitionOutcome::Moved { from, .. }) => {
                    self.invoices.save_status(&invoice, from).await?
                }
                Ok(TransitionOutcome::Unchanged) => false,
                Err(err) => {
                    warn!(invoice_id = %invoice.id(), error = %err, "Overdue sweep refused");
                    false
                }
            };
            if moved {
                summary.marked += 1;
            } else {
                summary.skipped += 1;
            }
        }

        info!(marked = summary.marked, skipped = summary.skipped, "Overdue sweep complete");
        Ok(summary)
    }
}
