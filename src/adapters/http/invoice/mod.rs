//! Owner-facing invoice HTTP API.

mod dto;
mod handlers;
mod routes;

pub use dto::{InvoiceRequest, InvoiceResponse, PaymentTokenResponse};
pub use routes::invoice_routes;
