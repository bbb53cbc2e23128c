//! Per-owner payment gateway credentials.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::UserId;

/// Server keys issued for the gateway's test environment carry this prefix.
pub const SANDBOX_KEY_PREFIX: &str = "SB-";

/// Which gateway environment a key pair belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Sandbox,
    Production,
}

impl GatewayMode {
    pub fn is_sandbox(&self) -> bool {
        matches!(self, GatewayMode::Sandbox)
    }
}

/// Gateway key pair stored in an owner's business profile.
///
/// Keys are trimmed on construction; pasted keys frequently carry stray
/// whitespace that the gateway rejects.
#[derive(Clone)]
pub struct GatewayCredentials {
    owner_id: UserId,
    client_key: String,
    server_key: SecretString,
}

impl GatewayCredentials {
    pub fn new(owner_id: UserId, client_key: &str, server_key: &str) -> Self {
        Self {
            owner_id,
            client_key: client_key.trim().to_string(),
            server_key: SecretString::new(server_key.trim().to_string()),
        }
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    pub fn server_key(&self) -> &SecretString {
        &self.server_key
    }

    /// Both keys must be present before a payment can be started.
    pub fn is_complete(&self) -> bool {
        !self.client_key.is_empty() && !self.server_key.expose_secret().is_empty()
    }

    /// Environment inferred from the server key prefix.
    pub fn mode(&self) -> GatewayMode {
        if self.server_key.expose_secret().starts_with(SANDBOX_KEY_PREFIX) {
            GatewayMode::Sandbox
        } else {
            GatewayMode::Production
        }
    }
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("owner_id", &self.owner_id)
            .field("client_key", &self.client_key)
            .field("server_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    #[test]
    fn sandbox_prefix_selects_sandbox_mode() {
        let creds = GatewayCredentials::new(owner(), "SB-Mid-client-x", "SB-Mid-server-x");
        assert_eq!(creds.mode(), GatewayMode::Sandbox);

        let creds = GatewayCredentials::new(owner(), "Mid-client-x", "Mid-server-x");
        assert_eq!(creds.mode(), GatewayMode::Production);
    }

    #[test]
    fn keys_are_trimmed_before_use() {
        let creds = GatewayCredentials::new(owner(), "  Mid-client-x\n", "\tSB-Mid-server-x ");
        assert_eq!(creds.client_key(), "Mid-client-x");
        assert_eq!(creds.server_key().expose_secret(), "SB-Mid-server-x");
        assert!(creds.mode().is_sandbox());
    }

    #[test]
    fn blank_keys_are_incomplete() {
        assert!(!GatewayCredentials::new(owner(), "", "SB-x").is_complete());
        assert!(!GatewayCredentials::new(owner(), "client", "   ").is_complete());
        assert!(GatewayCredentials::new(owner(), "client", "server").is_complete());
    }

    #[test]
    fn debug_output_redacts_server_key() {
        let creds = GatewayCredentials::new(owner(), "client", "SB-super-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
