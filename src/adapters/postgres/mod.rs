//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresInvoiceRepository` - invoices, line items and customers
//! - `PostgresCredentialStore` - per-owner gateway keys
//! - `PostgresPaymentEventLog` - payment notification audit trail

mod credential_store;
mod invoice_repository;
mod payment_event_log;
mod pool;

pub use credential_store::PostgresCredentialStore;
pub use invoice_repository::PostgresInvoiceRepository;
pub use payment_event_log::PostgresPaymentEventLog;
pub use pool::{connect_pool, run_migrations};
