//! Gateway order identifiers.
//!
//! The gateway only echoes back the order id we gave it, so the invoice id is
//! embedded in it: `{invoice_number}_{invoice_id}`. The invoice id is rendered
//! without hyphens and never contains the separator, which makes the last
//! `_` an unambiguous split point even when the invoice number has its own.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::InvoiceId;

pub const ORDER_ID_SEPARATOR: char = '_';

/// Longest order id the gateway accepts.
pub const MAX_ORDER_ID_LEN: usize = 50;

/// Composite order reference sent to and echoed back by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Builds the order id for an invoice.
    ///
    /// Characters the gateway rejects are replaced with `-` and the number
    /// prefix is shortened so the whole id fits the gateway's length limit.
    pub fn for_invoice(invoice_number: &str, invoice_id: InvoiceId) -> Self {
        let id = invoice_id.simple();
        let room = MAX_ORDER_ID_LEN - id.len() - ORDER_ID_SEPARATOR.len_utf8();

        let mut prefix: String = invoice_number
            .trim()
            .chars()
            .map(|c| if is_allowed(c) { c } else { '-' })
            .take(room)
            .collect();
        if prefix.is_empty() {
            prefix.push_str("INV");
        }

        Self(format!("{}{}{}", prefix, ORDER_ID_SEPARATOR, id))
    }

    /// Wraps an order id received from the gateway.
    pub fn from_gateway(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the invoice id from the part after the last separator.
    pub fn invoice_id(&self) -> Option<InvoiceId> {
        let (_, tail) = self.0.rsplit_once(ORDER_ID_SEPARATOR)?;
        tail.parse().ok()
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '~' | '.')
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
