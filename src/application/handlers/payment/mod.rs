//! Payment notification handlers.

mod reconcile_payment;
mod verify_notification;

pub use reconcile_payment::{ReconcileOutcome, ReconcilePaymentCommand, ReconcilePaymentHandler};
pub use verify_notification::{PaymentNotificationVerifier, VerifiedNotification};
