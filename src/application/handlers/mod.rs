//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod invoice;
pub mod payment;
pub mod scheduler;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use invoice::{
    ChangeInvoiceStatusCommand, ChangeInvoiceStatusHandler, ChangeInvoiceStatusResult,
    CreateInvoiceCommand, CreateInvoiceHandler, CreatePaymentTokenCommand,
    CreatePaymentTokenHandler, DeleteInvoiceCommand, DeleteInvoiceHandler, GetInvoiceHandler,
    GetInvoiceQuery, GetInvoiceResult, MarkInvoiceSentCommand, MarkInvoiceSentHandler,
    PaymentTokenResult, UpdateInvoiceCommand, UpdateInvoiceHandler,
};
pub use payment::{
    PaymentNotificationVerifier, ReconcileOutcome, ReconcilePaymentCommand,
    ReconcilePaymentHandler, VerifiedNotification,
};
pub use scheduler::{
    MarkOverdueInvoicesHandler, OverdueSummary, ReminderSummary, SendDueRemindersHandler,
};
pub use settings::{SaveGatewayCredentialsCommand, SaveGatewayCredentialsHandler};
