//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, traits)
//! - `invoice` - Money engine, invoice lifecycle, invoice aggregate
//! - `payment` - Gateway order ids, notifications, signature verification

pub mod foundation;
pub mod invoice;
pub mod payment;
