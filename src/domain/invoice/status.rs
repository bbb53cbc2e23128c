//! Invoice status state machine.
//!
//! One transition table governs every status change, whoever asks for it:
//! the business owner through the dashboard, the payment gateway through a
//! verified notification, or the scheduler sweeping overdue invoices.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Saved but not yet sent to the customer.
    Draft,

    /// Sent and awaiting payment.
    Pending,

    /// Payment received.
    Paid,

    /// Past its due date without payment.
    Overdue,

    /// Cancelled. Nothing moves an invoice out of this state.
    Void,
}

/// Who is requesting a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionActor {
    Owner,
    Gateway,
    Scheduler,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Void,
    ];

    /// Persisted and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Void => "void",
        }
    }

    /// Line items and amounts may only be edited before the invoice is settled.
    pub fn is_editable(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Pending)
    }

    /// Valid statuses for a freshly created invoice.
    pub fn is_initial(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Pending)
    }
}

impl StateMachine for InvoiceStatus {
    type Actor = TransitionActor;

    fn actors() -> &'static [TransitionActor] {
        &[
            TransitionActor::Owner,
            TransitionActor::Gateway,
            TransitionActor::Scheduler,
        ]
    }

    fn valid_transitions(&self, actor: TransitionActor) -> Vec<Self> {
        use InvoiceStatus::*;
        use TransitionActor::*;
        match (self, actor) {
            (Draft, Owner) => vec![Pending, Void],
            (Draft, Gateway) => vec![Pending],

            (Pending, Owner) => vec![Paid, Void],
            (Pending, Gateway) => vec![Paid, Pending, Void],
            (Pending, Scheduler) => vec![Overdue],

            // manual "mark unpaid"
            (Paid, Owner) => vec![Pending],

            (Overdue, Owner) => vec![Paid, Void],
            (Overdue, Gateway) => vec![Paid],

            (Draft, Scheduler)
            | (Paid, Gateway)
            | (Paid, Scheduler)
            | (Overdue, Scheduler)
            | (Void, _) => vec![],
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "void" => Ok(InvoiceStatus::Void),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}
