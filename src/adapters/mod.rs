//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - invoice, credential and audit storage
//! - `memory` - in-process storage for tests and database-less runs
//! - `midtrans` - Snap checkout token client
//! - `email` - Resend email delivery
//! - `http` - axum REST API, payment webhook and cron endpoints

pub mod email;
pub mod http;
pub mod memory;
pub mod midtrans;
pub mod postgres;
