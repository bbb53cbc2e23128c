//! Translation of gateway transaction vocabulary into invoice statuses.

use crate::domain::invoice::InvoiceStatus;

/// Lifecycle target for a gateway transaction status.
///
/// `None` means the notification is acknowledged without any transition.
pub fn map_gateway_status(
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Option<InvoiceStatus> {
    match transaction_status {
        "capture" => match fraud_status {
            Some("challenge") => Some(InvoiceStatus::Pending),
            Some("accept") => Some(InvoiceStatus::Paid),
            _ => None,
        },
        "settlement" => Some(InvoiceStatus::Paid),
        "cancel" | "deny" | "expire" => Some(InvoiceStatus::Void),
        "pending" => Some(InvoiceStatus::Pending),
        _ => None,
    }
}
