//! In-memory adapters for tests and running without a database.

mod credential_store;
mod invoice_repository;
mod payment_event_log;

pub use credential_store::InMemoryCredentialStore;
pub use invoice_repository::InMemoryInvoiceRepository;
pub use payment_event_log::InMemoryPaymentEventLog;
