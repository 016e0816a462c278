//! Authentication for the Fastly client.
//!
//! Fastly authenticates API calls with a per-user token sent in the
//! `Fastly-Key` header. The token is never logged; only [`ApiKeyAuth::key_hint`] output
//! (its last four characters) may appear in `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::FastlyError;

/// Header carrying the API token.
pub const API_KEY_HEADER: &str = "Fastly-Key";

/// Supplies credentials for outgoing requests.
pub trait AuthProvider: Send + Sync {
    /// Writes the credential headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Name of the header or scheme used.
    fn scheme(&self) -> &str;

    /// Checks the credentials before the client is built.
    fn validate(&self) -> Result<(), FastlyError>;
}

/// Token authentication through the `Fastly-Key` header.
pub struct ApiKeyAuth {
    token: SecretString,
}

impl ApiKeyAuth {
    /// Wraps an already-secret token.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Creates from a plain string token.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self::new(SecretString::new(token.into()))
    }

    /// Last four characters of the token, for diagnostics.
    pub fn key_hint(&self) -> String {
        key_hint(self.token.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(API_KEY_HEADER.to_string(), self.token.expose_secret().clone());
    }

    fn scheme(&self) -> &str {
        API_KEY_HEADER
    }

    fn validate(&self) -> Result<(), FastlyError> {
        let token = self.token.expose_secret();
        if token.is_empty() {
            return Err(FastlyError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }
        // Header values cannot carry whitespace or control bytes.
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FastlyError::Configuration {
                message: format!("API key {} contains whitespace", key_hint(token)),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("token", &"[REDACTED]")
            .field("hint", &self.key_hint())
            .finish()
    }
}

/// Masks all but the last four characters of a token.
pub(crate) fn key_hint(token: &str) -> String {
    let count = token.chars().count();
    if count > 4 {
        let tail: String = token.chars().skip(count - 4).collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_fastly_key_only() {
        let auth = ApiKeyAuth::from_string("test_key_12345");
        let mut headers = HashMap::new();

        auth.apply_auth(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Fastly-Key").map(String::as_str), Some("test_key_12345"));
        assert_eq!(auth.scheme(), "Fastly-Key");
    }

    #[test]
    fn test_validate() {
        assert!(ApiKeyAuth::from_string("key").validate().is_ok());
        assert!(ApiKeyAuth::from_string("").validate().is_err());
        assert!(ApiKeyAuth::from_string("abcd\n").validate().is_err());
        assert!(ApiKeyAuth::from_string("ab cd").validate().is_err());
    }

    #[test]
    fn test_key_hint() {
        assert_eq!(ApiKeyAuth::from_string("test_key_12345").key_hint(), "...2345");
        assert_eq!(ApiKeyAuth::from_string("abc").key_hint(), "****");
        assert_eq!(key_hint("clé-ünïcödé"), "...cödé");
    }

    #[test]
    fn test_debug_redacts_token() {
        let auth = ApiKeyAuth::from_string("secret_token_value");
        let debug_str = format!("{:?}", auth);

        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret_token_value"));
    }
}
