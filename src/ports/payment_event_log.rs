//! Audit log of received payment notifications.
//!
//! Every delivery is recorded with its outcome, including rejected ones, so
//! forged or mismatched callbacks can be investigated later.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, InvoiceId};

/// How a notification was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEventOutcome {
    Applied,
    Unchanged,
    Ignored,
    Rejected,
    Failed,
}

impl PaymentEventOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentEventOutcome::Applied => "applied",
            PaymentEventOutcome::Unchanged => "unchanged",
            PaymentEventOutcome::Ignored => "ignored",
            PaymentEventOutcome::Rejected => "rejected",
            PaymentEventOutcome::Failed => "failed",
        }
    }
}

/// One received notification.
#[derive(Debug, Clone)]
pub struct PaymentEventRecord {
    pub order_id: String,
    /// Resolved invoice, when the order id could be decoded.
    pub invoice_id: Option<InvoiceId>,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub gross_amount: String,
    pub transaction_id: Option<String>,
    pub outcome: PaymentEventOutcome,
    /// Why the event was rejected, ignored or failed.
    pub detail: Option<String>,
    pub received_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentEventLog: Send + Sync {
    async fn record(&self, record: &PaymentEventRecord) -> Result<(), DomainError>;

    /// Most recent first.
    async fn find_by_invoice(&self, invoice_id: InvoiceId)
        -> Result<Vec<PaymentEventRecord>, DomainError>;
}
