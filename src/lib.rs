//! Invoicer - invoice totals, payment lifecycle and gateway reconciliation.
//!
//! Owners issue invoices whose totals come from a single money engine.
//! Customers pay through Midtrans Snap checkout, and signed payment
//! notifications drive the invoice status through one lifecycle table.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
