//! Outbound customer notification port (email).

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Port for customer-facing notifications.
///
/// Callers treat every send as best-effort; a failure never changes invoice state.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Tell the customer their payment was received.
    async fn send_payment_received(&self, notice: &PaymentReceivedNotice)
        -> Result<(), NotificationError>;

    /// Remind the customer that an invoice is coming due.
    async fn send_due_reminder(&self, notice: &DueReminderNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceivedNotice {
    pub to: String,
    pub customer_name: String,
    pub invoice_number: String,
    /// Minor units.
    pub amount: i64,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminderNotice {
    pub to: String,
    pub customer_name: String,
    pub invoice_number: String,
    pub amount: i64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Email provider rejected the message: {0}")]
    Rejected(String),

    #[error("Email provider unreachable: {0}")]
    Network(String),
}
