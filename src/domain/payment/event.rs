//! Payment events that passed verification.

use crate::domain::foundation::InvoiceId;
use crate::domain::invoice::InvoiceStatus;

use super::{map_gateway_status, OrderId, PaymentNotification};

/// A notification whose signature and amount have been checked against the
/// invoice it names.
///
/// Only the notification verifier inside this crate can build one, which is
/// what makes gateway transitions unreachable from unauthenticated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPaymentEvent {
    invoice_id: InvoiceId,
    order_id: OrderId,
    transaction_status: String,
    fraud_status: Option<String>,
    gross_amount: i64,
    target: Option<InvoiceStatus>,
    transaction_id: Option<String>,
    payment_type: Option<String>,
}

impl VerifiedPaymentEvent {
    pub(crate) fn new(
        invoice_id: InvoiceId,
        gross_amount: i64,
        notification: PaymentNotification,
    ) -> Self {
        let target = map_gateway_status(
            &notification.transaction_status,
            notification.fraud_status.as_deref(),
        );
        Self {
            invoice_id,
            order_id: OrderId::from_gateway(notification.order_id),
            transaction_status: notification.transaction_status,
            fraud_status: notification.fraud_status,
            gross_amount,
            target,
            transaction_id: notification.transaction_id,
            payment_type: notification.payment_type,
        }
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn transaction_status(&self) -> &str {
        &self.transaction_status
    }

    pub fn fraud_status(&self) -> Option<&str> {
        self.fraud_status.as_deref()
    }

    pub fn gross_amount(&self) -> i64 {
        self.gross_amount
    }

    /// Lifecycle status the gateway is asking for, if any.
    pub fn target(&self) -> Option<InvoiceStatus> {
        self.target
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn payment_type(&self) -> Option<&str> {
        self.payment_type.as_deref()
    }
}
