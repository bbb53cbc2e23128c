//! Payment gateway notification domain.
//!
//! # Module Structure
//!
//! - `order_id` - composite order reference embedding the invoice id
//! - `notification` - raw notification body
//! - `signature` - SHA-512 signature verification
//! - `gateway_status` - gateway vocabulary to invoice status mapping
//! - `event` - verified payment event
//! - `webhook_errors` - errors and HTTP status mapping

mod event;
mod gateway_status;
mod notification;
mod order_id;
mod signature;
mod webhook_errors;

pub use event::VerifiedPaymentEvent;
pub use gateway_status::map_gateway_status;
pub use notification::PaymentNotification;
pub use order_id::{OrderId, MAX_ORDER_ID_LEN, ORDER_ID_SEPARATOR};
pub use signature::{expected_signature, verify_signature};
pub use webhook_errors::WebhookError;

#[cfg(test)]
pub(crate) use event::test_support;
