//! Owner-facing invoice handlers.

mod change_invoice_status;
mod create_invoice;
mod create_payment_token;
mod delete_invoice;
mod get_invoice;
mod mark_invoice_sent;
mod update_invoice;

pub use change_invoice_status::{
    ChangeInvoiceStatusCommand, ChangeInvoiceStatusHandler, ChangeInvoiceStatusResult,
};
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceHandler};
pub use create_payment_token::{
    CreatePaymentTokenCommand, CreatePaymentTokenHandler, PaymentTokenResult,
};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceHandler};
pub use get_invoice::{GetInvoiceHandler, GetInvoiceQuery, GetInvoiceResult};
pub use mark_invoice_sent::{MarkInvoiceSentCommand, MarkInvoiceSentHandler};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceHandler};

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId};
use crate::domain::invoice::InvoiceError;

/// Maps a store error, turning a failed conditional write into `Conflict`.
fn storage_error(invoice_id: InvoiceId, err: DomainError) -> InvoiceError {
    match err.code {
        ErrorCode::Conflict => InvoiceError::Conflict(invoice_id),
        _ => err.into(),
    }
}
