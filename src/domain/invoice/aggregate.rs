//! Invoice aggregate entity.
//!
//! # Design Decisions
//!
//! - **Money in minor units**: amounts are i64, totals always come from the money engine
//! - **Single authority for status**: every status change goes through `transition`
//! - **Settled amounts are frozen**: line items can only be revised while Draft or Pending

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{
    CustomerId, InvoiceId, OwnedByUser, StateMachine, Timestamp, UserId, ValidationError,
};
use crate::domain::payment::VerifiedPaymentEvent;

use super::{
    compute_totals, CustomerContact, InvoiceError, InvoiceStatus, InvoiceTotals, LineItemAmounts,
    TaxRate, TransitionActor,
};

/// Maximum invoice number length accepted from the owner.
pub const MAX_INVOICE_NUMBER_LEN: usize = 64;

/// One billed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLineItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl InvoiceLineItem {
    /// quantity × unit_price; overflow was ruled out when totals were computed.
    pub fn line_total(&self) -> i64 {
        self.quantity.saturating_mul(self.unit_price)
    }

    fn amounts(&self) -> LineItemAmounts {
        LineItemAmounts {
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Owner-supplied content of an invoice, used for both create and edit.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub customer: CustomerContact,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub tax_rate: TaxRate,
    pub items: Vec<InvoiceLineItem>,
}

/// Who is asking for a status change, with the proof each actor needs.
#[derive(Debug, Clone, Copy)]
pub enum TransitionAuthority<'a> {
    /// A signed-in account; must own the invoice.
    Owner(&'a UserId),

    /// A gateway notification that passed signature and amount checks.
    Gateway(&'a VerifiedPaymentEvent),

    /// The scheduled sweep, evaluated against `today`.
    Scheduler { today: NaiveDate },
}

impl TransitionAuthority<'_> {
    pub fn actor(&self) -> TransitionActor {
        match self {
            TransitionAuthority::Owner(_) => TransitionActor::Owner,
            TransitionAuthority::Gateway(_) => TransitionActor::Gateway,
            TransitionAuthority::Scheduler { .. } => TransitionActor::Scheduler,
        }
    }
}

/// Outcome of a successful `transition` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Already in the target status; nothing to persist, nothing to notify.
    Unchanged,

    /// Status moved; persist with `from` as the expected current value.
    Moved {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },
}

/// Invoice aggregate.
///
/// # Invariants
///
/// - `total_amount == sub_total + tax_amount`, produced by `compute_totals`
/// - `due_date >= issue_date`
/// - `paid_at` is set exactly when status is Paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    id: InvoiceId,
    owner_id: UserId,
    invoice_number: String,
    customer_id: CustomerId,
    customer: CustomerContact,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    items: Vec<InvoiceLineItem>,
    totals: InvoiceTotals,
    status: InvoiceStatus,
    paid_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

/// Persisted state used to rebuild an invoice without re-running creation rules.
#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub owner_id: UserId,
    pub invoice_number: String,
    pub customer_id: CustomerId,
    pub customer: CustomerContact,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceLineItem>,
    pub sub_total: i64,
    pub tax_rate: TaxRate,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub status: InvoiceStatus,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    /// Creates a new invoice in Draft or Pending.
    pub fn create(
        id: InvoiceId,
        owner_id: UserId,
        customer_id: CustomerId,
        draft: InvoiceDraft,
        initial_status: InvoiceStatus,
    ) -> Result<Self, InvoiceError> {
        if !initial_status.is_initial() {
            return Err(InvoiceError::validation(
                "status",
                format!("a new invoice cannot start as {}", initial_status),
            ));
        }

        let (draft, totals) = validate_draft(draft)?;
        let now = Timestamp::now();

        Ok(Self {
            id,
            owner_id,
            invoice_number: draft.invoice_number,
            customer_id,
            customer: draft.customer,
            issue_date: draft.issue_date,
            due_date: draft.due_date,
            items: draft.items,
            totals,
            status: initial_status,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds an invoice from storage.
    ///
    /// Totals are trusted as stored; a record that breaks the total invariant
    /// is reported rather than silently recomputed.
    pub fn reconstitute(record: InvoiceRecord) -> Result<Self, ValidationError> {
        if record.sub_total.checked_add(record.tax_amount) != Some(record.total_amount) {
            return Err(ValidationError::invalid_format(
                "total_amount",
                format!(
                    "stored total {} does not equal sub total {} plus tax {}",
                    record.total_amount, record.sub_total, record.tax_amount
                ),
            ));
        }

        Ok(Self {
            id: record.id,
            owner_id: record.owner_id,
            invoice_number: record.invoice_number,
            customer_id: record.customer_id,
            customer: record.customer,
            issue_date: record.issue_date,
            due_date: record.due_date,
            items: record.items,
            totals: InvoiceTotals {
                sub_total: record.sub_total,
                tax_rate: record.tax_rate,
                tax_amount: record.tax_amount,
                total_amount: record.total_amount,
            },
            status: record.status,
            paid_at: record.paid_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn customer(&self) -> &CustomerContact {
        &self.customer
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn items(&self) -> &[InvoiceLineItem] {
        &self.items
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    pub fn total_amount(&self) -> i64 {
        self.totals.total_amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn paid_at(&self) -> Option<Timestamp> {
        self.paid_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Replaces the owner-editable content and recomputes totals.
    ///
    /// Status is untouched; status changes go through `transition`.
    pub fn revise(&mut self, requested_by: &UserId, draft: InvoiceDraft) -> Result<(), InvoiceError> {
        self.check_ownership(requested_by)?;
        if !self.status.is_editable() {
            return Err(InvoiceError::invalid_state(self.status, "edit"));
        }

        let (draft, totals) = validate_draft(draft)?;
        self.invoice_number = draft.invoice_number;
        self.customer = draft.customer;
        self.issue_date = draft.issue_date;
        self.due_date = draft.due_date;
        self.items = draft.items;
        self.totals = totals;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Points the invoice at the stored customer record for its contact.
    pub fn assign_customer(&mut self, customer_id: CustomerId) {
        self.customer_id = customer_id;
    }

    /// Copies the status fields of `other`, leaving content untouched.
    ///
    /// Used by stores that persist a status change without rewriting the
    /// rest of the record.
    pub fn adopt_status_of(&mut self, other: &Invoice) {
        self.status = other.status;
        self.paid_at = other.paid_at;
        self.updated_at = other.updated_at;
    }

    /// Owner-initiated deletion guard.
    pub fn ensure_deletable(&self, requested_by: &UserId) -> Result<(), InvoiceError> {
        self.check_ownership(requested_by)?;
        if self.status == InvoiceStatus::Paid {
            return Err(InvoiceError::invalid_state(self.status, "delete"));
        }
        Ok(())
    }

    /// Applies a status change if `authority` is allowed to make it.
    ///
    /// Re-applying the current status is `Unchanged` for every actor. On any
    /// error the invoice is left untouched.
    pub fn transition(
        &mut self,
        target: InvoiceStatus,
        authority: TransitionAuthority<'_>,
    ) -> Result<TransitionOutcome, InvoiceError> {
        match authority {
            TransitionAuthority::Owner(user) => self.check_ownership(user)?,
            TransitionAuthority::Gateway(event) => {
                if event.invoice_id() != self.id {
                    return Err(InvoiceError::validation(
                        "order_id",
                        "payment notification refers to a different invoice",
                    ));
                }
            }
            TransitionAuthority::Scheduler { today } => {
                if self.due_date >= today {
                    return Err(InvoiceError::invalid_state(
                        self.status,
                        "mark overdue before the due date",
                    ));
                }
            }
        }

        if self.status == target {
            return Ok(TransitionOutcome::Unchanged);
        }

        let from = self.status;
        let to = from
            .transition_to(target, authority.actor())
            .map_err(|_| InvoiceError::invalid_state(from, format!("move to {}", target)))?;

        let now = Timestamp::now();
        self.status = to;
        self.paid_at = if to == InvoiceStatus::Paid { Some(now) } else { None };
        self.updated_at = now;

        Ok(TransitionOutcome::Moved { from, to })
    }
}

impl OwnedByUser for Invoice {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

fn validate_draft(draft: InvoiceDraft) -> Result<(InvoiceDraft, InvoiceTotals), InvoiceError> {
    let invoice_number = draft.invoice_number.trim().to_string();
    if invoice_number.is_empty() {
        return Err(ValidationError::empty_field("invoice_number").into());
    }
    if invoice_number.chars().count() > MAX_INVOICE_NUMBER_LEN {
        return Err(ValidationError::out_of_range(
            "invoice_number",
            1,
            MAX_INVOICE_NUMBER_LEN as i64,
            invoice_number.chars().count() as i64,
        )
        .into());
    }
    if draft.due_date < draft.issue_date {
        return Err(InvoiceError::validation(
            "due_date",
            "due date cannot be before the issue date",
        ));
    }

    let mut items = Vec::with_capacity(draft.items.len());
    for (index, item) in draft.items.into_iter().enumerate() {
        let description = item.description.trim().to_string();
        if description.is_empty() {
            return Err(
                ValidationError::empty_field(format!("items[{}].description", index)).into(),
            );
        }
        items.push(InvoiceLineItem { description, ..item });
    }

    let amounts: Vec<LineItemAmounts> = items.iter().map(InvoiceLineItem::amounts).collect();
    let totals = compute_totals(&amounts, draft.tax_rate)?;

    Ok((
        InvoiceDraft {
            invoice_number,
            items,
            ..draft
        },
        totals,
    ))
}
