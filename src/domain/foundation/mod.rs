//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine and ownership traits, and the
//! error vocabulary used by the invoice and payment modules.

mod errors;
mod ids;
mod ownership;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CustomerId, InvoiceId, UserId};
pub use ownership::OwnedByUser;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
