//! Raw payment notification as posted by the gateway.

use serde::{Deserialize, Deserializer};

use super::{OrderId, WebhookError};

/// Notification body. Untrusted until its signature has been checked.
///
/// `status_code` and `gross_amount` are kept exactly as received because the
/// signature is computed over their textual form.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    pub order_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gross_amount: String,
    #[serde(default)]
    pub signature_key: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub transaction_time: Option<String>,
}

impl PaymentNotification {
    /// Parses and checks that every field the signature needs is present.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let notification: PaymentNotification = serde_json::from_slice(body)
            .map_err(|e| WebhookError::Malformed(e.to_string()))?;

        let required = [
            ("order_id", &notification.order_id),
            ("status_code", &notification.status_code),
            ("gross_amount", &notification.gross_amount),
            ("signature_key", &notification.signature_key),
            ("transaction_status", &notification.transaction_status),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(WebhookError::MissingField(name));
            }
        }

        Ok(notification)
    }

    pub fn order_id(&self) -> OrderId {
        OrderId::from_gateway(self.order_id.clone())
    }

    /// Paid amount in minor units, fractional part discarded.
    pub fn gross_amount_minor(&self) -> Result<i64, WebhookError> {
        let raw = self.gross_amount.trim();
        let malformed = || WebhookError::Malformed(format!("gross_amount '{}' is not an amount", raw));

        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        whole.parse::<i64>().map_err(|_| malformed())
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
