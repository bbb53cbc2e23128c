//! Midtrans Snap payment gateway adapter.

mod snap_client;
mod snap_types;

pub use snap_client::{SnapClient, SnapConfig};
