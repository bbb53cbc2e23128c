//! Invoice domain module.
//!
//! # Module Structure
//!
//! - `money` - totals computation and tax rate value object
//! - `status` - InvoiceStatus state machine and transition actors
//! - `aggregate` - Invoice aggregate entity
//! - `customer` - billed customer contact
//! - `credentials` - per-owner payment gateway keys

mod aggregate;
mod credentials;
mod customer;
mod errors;
mod money;
mod status;

pub use aggregate::{
    Invoice, InvoiceDraft, InvoiceLineItem, InvoiceRecord, TransitionAuthority, TransitionOutcome,
    MAX_INVOICE_NUMBER_LEN,
};
pub use credentials::{GatewayCredentials, GatewayMode, SANDBOX_KEY_PREFIX};
pub use customer::CustomerContact;
pub use errors::InvoiceError;
pub use money::{compute_totals, InvoiceTotals, LineItemAmounts, MoneyError, TaxRate};
pub use status::{InvoiceStatus, TransitionActor};
