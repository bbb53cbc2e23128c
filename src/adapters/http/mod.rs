//! HTTP adapters - REST API, payment webhook and cron endpoints.

mod cron;
mod error;
mod extract;
mod health;
mod invoice;
mod router;
mod settings;
mod state;
mod webhook;

pub use error::{ErrorResponse, InvoiceApiError};
pub use extract::{AuthenticatedOwner, OWNER_HEADER};
pub use invoice::{InvoiceRequest, InvoiceResponse, PaymentTokenResponse};
pub use router::app_router;
pub use state::{AppState, HttpSettings};
