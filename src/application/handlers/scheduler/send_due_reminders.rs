//! SendDueRemindersHandler - emails customers whose invoices fall due soon.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::domain::invoice::{InvoiceError, InvoiceStatus};
use crate::ports::{DueReminderNotice, InvoiceRepository, NotificationSender};

/// Result of one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct SendDueRemindersHandler {
    invoices: Arc<dyn InvoiceRepository>,
    notifier: Arc<dyn NotificationSender>,
    days_ahead: u64,
}

impl SendDueRemindersHandler {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        notifier: Arc<dyn NotificationSender>,
        days_ahead: u64,
    ) -> Self {
        Self {
            invoices,
            notifier,
            days_ahead,
        }
    }

    /// Reminds every Pending invoice due exactly `days_ahead` days after `today`.
    ///
    /// A failed send is counted and the pass continues.
    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, today: NaiveDate) -> Result<ReminderSummary, InvoiceError> {
        let Some(due_date) = today.checked_add_days(Days::new(self.days_ahead)) else {
            return Ok(ReminderSummary::default());
        };

        let invoices = self
            .invoices
            .find_by_status_due_on(InvoiceStatus::Pending, due_date)
            .await?;

        let mut summary = ReminderSummary::default();
        for invoice in invoices {
            let notice = DueReminderNotice {
                to: invoice.customer().email.clone(),
                customer_name: invoice.customer().name.clone(),
                invoice_number: invoice.invoice_number().to_string(),
                amount: invoice.total_amount(),
                due_date: invoice.due_date(),
            };
            match self.notifier.send_due_reminder(&notice).await {
                Ok(()) => summary.sent += 1,
                Err(err) => {
                    warn!(invoice_id = %invoice.id(), error = %err, "Due reminder failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            due_date = %due_date,
            sent = summary.sent,
            failed = summary.failed,
            "Due reminder pass complete"
        );
        Ok(summary)
    }
}
