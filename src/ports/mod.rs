//! Ports (interfaces) between the domain and infrastructure.
//!
//! # Ports
//!
//! - `InvoiceRepository` - invoice persistence with conditional status writes
//! - `GatewayCredentialStore` - per-owner payment gateway keys
//! - `PaymentGateway` - checkout token issuance
//! - `NotificationSender` - customer emails
//! - `PaymentEventLog` - audit trail of payment notifications

mod credential_store;
mod invoice_repository;
mod notification_sender;
mod payment_event_log;
mod payment_gateway;

pub use credential_store::GatewayCredentialStore;
pub use invoice_repository::InvoiceRepository;
pub use notification_sender::{
    DueReminderNotice, NotificationError, NotificationSender, PaymentReceivedNotice,
};
pub use payment_event_log::{PaymentEventLog, PaymentEventOutcome, PaymentEventRecord};
pub use payment_gateway::{GatewayError, PaymentGateway, TransactionRequest, TransactionToken};
