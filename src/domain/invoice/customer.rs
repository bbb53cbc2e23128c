//! Customer contact details recorded on an invoice.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Who the invoice is billed to.
///
/// Stored per owner and keyed by email; the invoice keeps the contact it was
/// issued with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerContact {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if name.is_empty() {
            return Err(ValidationError::empty_field("customer.name"));
        }
        if email.is_empty() {
            return Err(ValidationError::empty_field("customer.email"));
        }
        if !looks_like_email(&email) {
            return Err(ValidationError::invalid_format(
                "customer.email",
                "expected an address like name@example.com",
            ));
        }

        Ok(Self {
            name,
            email,
            address: address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
