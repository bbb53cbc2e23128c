//! Payment notification signature verification.
//!
//! The gateway signs each notification with
//! `hex(sha512(order_id + status_code + gross_amount + server_key))`.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::{PaymentNotification, WebhookError};

/// Computes the lowercase hex signature the gateway should have sent.
pub fn expected_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &SecretString,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a notification's `signature_key` against the owner's server key.
///
/// Comparison is constant-time and byte-exact over the lowercase hex text the
/// gateway sends.
pub fn verify_signature(
    notification: &PaymentNotification,
    server_key: &SecretString,
) -> Result<(), WebhookError> {
    let expected = expected_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        server_key,
    );
    let provided = notification.signature_key.as_bytes();

    if bool::from(expected.as_bytes().ct_eq(provided)) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::new("SB-Mid-server-test".to_string())
    }

    fn notification(signature_key: String, gross_amount: &str) -> PaymentNotification {
        PaymentNotification {
            order_id: "INV-1_abc".to_string(),
            status_code: "200".to_string(),
            gross_amount: gross_amount.to_string(),
            signature_key,
            transaction_status: "settlement".to_string(),
            fraud_status: None,
            transaction_id: None,
            payment_type: None,
            transaction_time: None,
        }
    }

    #[test]
    fn signature_is_sha512_hex_of_concatenation() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        let direct = hex::encode(Sha512::digest(b"INV-1_abc200110000.00SB-Mid-server-test"));
        assert_eq!(sig, direct);
        assert_eq!(sig.len(), 128);
    }

    #[test]
    fn valid_signature_passes() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        assert!(verify_signature(&notification(sig, "110000.00"), &key()).is_ok());
    }

    #[test]
    fn uppercase_hex_is_rejected() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key()).to_uppercase();
        assert!(matches!(
            verify_signature(&notification(sig, "110000.00"), &key()),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        let padded = format!(" {}\n", sig);
        assert!(verify_signature(&notification(padded, "110000.00"), &key()).is_err());
    }

    #[test]
    fn tampered_amount_fails() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        assert!(matches!(
            verify_signature(&notification(sig, "999999"), &key()),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn other_owners_key_fails() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        let other = SecretString::new("SB-Mid-server-other".to_string());
        assert!(verify_signature(&notification(sig, "110000.00"), &other).is_err());
    }

    #[test]
    fn truncated_signature_fails() {
        let sig = expected_signature("INV-1_abc", "200", "110000.00", &key());
        assert!(verify_signature(&notification(sig[..64].to_string(), "110000.00"), &key()).is_err());
    }
}
