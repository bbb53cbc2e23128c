//! Notification sender that only logs, used when no email provider is configured.

use async_trait::async_trait;

use crate::ports::{
    DueReminderNotice, NotificationError, NotificationSender, PaymentReceivedNotice,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationSender;

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn send_payment_received(
        &self,
        notice: &PaymentReceivedNotice,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            to = %notice.to,
            invoice_number = %notice.invoice_number,
            amount = notice.amount,
            "Payment received email (not sent, email disabled)"
        );
        Ok(())
    }

    async fn send_due_reminder(&self, notice: &DueReminderNotice) -> Result<(), NotificationError> {
        tracing::info!(
            to = %notice.to,
            invoice_number = %notice.invoice_number,
            due_date = %notice.due_date,
            "Due reminder email (not sent, email disabled)"
        );
        Ok(())
    }
}
