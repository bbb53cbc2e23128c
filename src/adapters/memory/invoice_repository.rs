//! In-memory invoice repository for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, InvoiceId, OwnedByUser, UserId,
};
use crate::domain::invoice::{CustomerContact, Invoice, InvoiceStatus};
use crate::ports::InvoiceRepository;

/// Invoice store backed by a map, with the same conditional-write rules as
/// the Postgres adapter.
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
    customers: RwLock<HashMap<(UserId, String), CustomerId>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invoices.
    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }
}

fn duplicate_number(invoices: &HashMap<InvoiceId, Invoice>, invoice: &Invoice) -> bool {
    invoices.values().any(|other| {
        other.id() != invoice.id()
            && other.owner_id() == invoice.owner_id()
            && other.invoice_number() == invoice.invoice_number()
    })
}

fn duplicate_number_error() -> DomainError {
    DomainError::validation("invoice_number", "Invoice number is already used")
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn resolve_customer(
        &self,
        owner_id: &UserId,
        contact: &CustomerContact,
    ) -> Result<CustomerId, DomainError> {
        let mut customers = self.customers.write().await;
        let key = (owner_id.clone(), contact.email.to_lowercase());
        Ok(*customers.entry(key).or_insert_with(CustomerId::new))
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut invoices = self.invoices.write().await;
        if invoices.contains_key(&invoice.id()) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Invoice {} already exists", invoice.id()),
            ));
        }
        if duplicate_number(&invoices, invoice) {
            return Err(duplicate_number_error());
        }
        invoices.insert(invoice.id(), invoice.clone());
        Ok(())
    }

    async fn update(
        &self,
        invoice: &Invoice,
        expected_status: InvoiceStatus,
    ) -> Result<(), DomainError> {
        let mut invoices = self.invoices.write().await;
        if duplicate_number(&invoices, invoice) {
            return Err(duplicate_number_error());
        }
        match invoices.get_mut(&invoice.id()) {
            Some(stored) if stored.status() == expected_status => {
                let mut updated = invoice.clone();
                updated.adopt_status_of(stored);
                *stored = updated;
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Invoice {} changed before the update was saved", invoice.id()),
            )),
        }
    }

    async fn save_status(
        &self,
        invoice: &Invoice,
        expected_status: InvoiceStatus,
    ) -> Result<bool, DomainError> {
        let mut invoices = self.invoices.write().await;
        match invoices.get_mut(&invoice.id()) {
            Some(stored)
                if stored.status() == expected_status
                    && stored.total_amount() == invoice.total_amount() =>
            {
                stored.adopt_status_of(invoice);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: InvoiceId, owner_id: &UserId) -> Result<bool, DomainError> {
        let mut invoices = self.invoices.write().await;
        let deletable = invoices
            .get(&id)
            .map(|i| i.is_owner(owner_id) && i.status() != InvoiceStatus::Paid)
            .unwrap_or(false);
        if deletable {
            invoices.remove(&id);
        }
        Ok(deletable)
    }

    async fn find_by_status_due_on(
        &self,
        status: InvoiceStatus,
        due_date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError> {
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.status() == status && i.due_date() == due_date)
            .cloned()
            .collect())
    }

    async fn find_by_status_due_before(
        &self,
        status: InvoiceStatus,
        date: NaiveDate,
    ) -> Result<Vec<Invoice>, DomainError> {
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.status() == status && i.due_date() < date)
            .cloned()
            .collect())
    }
}
