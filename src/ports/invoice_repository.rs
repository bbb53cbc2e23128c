//! Invoice repository port.
//!
//! The store is the only concurrency control point for invoice state: every
//! write that depends on the current status is conditional on it, and the
//! affected-row count tells the caller whether its write landed.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{CustomerId, DomainError, InvoiceId, UserId};
use crate::domain::invoice::{CustomerContact, Invoice, InvoiceStatus};

/// Repository port for Invoice aggregate persistence.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Returns the owner's customer record for `contact.email`, creating it
    /// or refreshing its name and address.
    async fn resolve_customer(
        &self,
        owner_id: &UserId,
        contact: &CustomerContact,
    ) -> Result<CustomerId, DomainError>;

    /// Save a new invoice.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` (field `invoice_number`) if the owner already uses the number
    /// - `DatabaseError` on persistence failure
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Replace the editable content of an invoice, provided its status is
    /// still `expected_status`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the status changed or the invoice disappeared
    /// - `ValidationFailed` on a duplicate invoice number
    async fn update(&self, invoice: &Invoice, expected_status: InvoiceStatus)
        -> Result<(), DomainError>;

    /// Compare-and-set the status (with `paid_at` and `updated_at`) from
    /// `expected_status` to `invoice.status()`.
    ///
    /// The write also requires the stored total to still equal
    /// `invoice.total_amount()`, so a payment verified against one total
    /// cannot settle an invoice that was edited in the meantime.
    ///
    /// Returns `false` when another writer got there first.
    async fn save_status(
        &self,
        invoice: &Invoice,
        expected_status: InvoiceStatus,
    ) -> Result<bool, DomainError>;

    /// Find an invoice by id, regardless of owner.
    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Delete an owner's invoice unless it is Paid.
    ///
    /// Returns `false` if nothing matched.
    async fn delete(&self, id: InvoiceId, owner_id: &UserId) -> Result<bool, DomainError>;

    /// Invoices with `status` whose due date is exactly `due_date`.
    async fn find_by_status_due_on(
        &self,
        status: InvoiceStatus,
        due_date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError>;

    /// Invoices with `status` whose due date is strictly before `date`.
    async fn find_by_status_due_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError>;
}
