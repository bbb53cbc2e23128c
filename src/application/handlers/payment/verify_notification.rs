//! PaymentNotificationVerifier - authenticates gateway notifications.
//!
//! A notification is only trusted once it resolves to a stored invoice, its
//! signature matches that invoice owner's server key, and the amount it
//! reports matches the invoice total.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::OwnedByUser;
use crate::domain::invoice::Invoice;
use crate::domain::payment::{
    verify_signature, PaymentNotification, VerifiedPaymentEvent, WebhookError,
};
use crate::ports::{GatewayCredentialStore, InvoiceRepository};

/// A verified event together with the invoice state it was checked against.
#[derive(Debug, Clone)]
pub struct VerifiedNotification {
    pub event: VerifiedPaymentEvent,
    pub invoice: Invoice,
}

pub struct PaymentNotificationVerifier {
    invoices: Arc<dyn InvoiceRepository>,
    credentials: Arc<dyn GatewayCredentialStore>,
}

impl PaymentNotificationVerifier {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        credentials: Arc<dyn GatewayCredentialStore>,
    ) -> Self {
        Self {
            invoices,
            credentials,
        }
    }

    /// Verifies a parsed notification.
    ///
    /// # Errors
    ///
    /// - `UnknownOrder` - order id carries no invoice id
    /// - `InvoiceNotFound` - no such invoice
    /// - `CredentialsMissing` - owner has no server key
    /// - `InvalidSignature` - signature mismatch
    /// - `AmountMismatch` - floored gross amount differs from the invoice total
    pub async fn verify(
        &self,
        notification: PaymentNotification,
    ) -> Result<VerifiedNotification, WebhookError> {
        let order_id = notification.order_id();
        let invoice_id = order_id
            .invoice_id()
            .ok_or_else(|| WebhookError::UnknownOrder(order_id.to_string()))?;

        let invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?
            .ok_or(WebhookError::InvoiceNotFound)?;

        let credentials = self
            .credentials
            .find_by_owner(invoice.owner_id())
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?
            .filter(|c| c.is_complete())
            .ok_or(WebhookError::CredentialsMissing)?;

        if let Err(err) = verify_signature(&notification, credentials.server_key()) {
            warn!(
                target: "security",
                order_id = %order_id,
                invoice_id = %invoice_id,
                "Payment notification signature mismatch"
            );
            return Err(err);
        }

        let gross_amount = notification.gross_amount_minor()?;
        if gross_amount != invoice.total_amount() {
            warn!(
                order_id = %order_id,
                expected = invoice.total_amount(),
                received = gross_amount,
                "Payment notification amount does not match invoice total"
            );
            return Err(WebhookError::AmountMismatch {
                expected: invoice.total_amount(),
                received: gross_amount,
            });
        }

        Ok(VerifiedNotification {
            event: VerifiedPaymentEvent::new(invoice_id, gross_amount, notification),
            invoice,
        })
    }
}
