use std::fmt;
use std::time::Duration;

use crate::error::{ZypCredsError, ZypCredsResult};
use crate::response::ContentType;

const DEFAULT_VERIFY_URI: &str = "https://api.zypcreds.com/verify/";
const DEFAULT_TOKEN_URI: &str = "https://api.zypcreds.com/token/";
const DEFAULT_WHITELIST_URI: &str = "https://api.zypcreds.com/whitelist/";
const DEFAULT_BLACKLIST_URI: &str = "https://api.zypcreds.com/blacklist/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials, endpoints and transport settings for a [`crate::ZypCredsClient`].
///
/// Use [`ClientConfig::new`] to get the production endpoints with default settings.
#[derive(Clone, PartialEq, Eq, uniffi::Record)]
pub struct ClientConfig {
    /// The caller's API ID. Sent with every request.
    pub account_id: String,
    /// The caller's API key. Used only as the signing key, never sent.
    pub secret_key: String,
    /// Endpoint for requesting and attempting verifications.
    pub verify_uri: String,
    /// Endpoint for checking session tokens.
    pub token_uri: String,
    /// Endpoint for whitelist operations.
    pub whitelist_uri: String,
    /// Endpoint for blacklist operations.
    pub blacklist_uri: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// Response format requested through the `Accept` header and used to decode replies.
    pub content_type: ContentType,
}

impl ClientConfig {
    /// Creates a configuration for the production service with default settings
    /// (30 second timeout, JSON responses).
    #[must_use]
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            secret_key: secret_key.into(),
            verify_uri: DEFAULT_VERIFY_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            whitelist_uri: DEFAULT_WHITELIST_URI.to_string(),
            blacklist_uri: DEFAULT_BLACKLIST_URI.to_string(),
            timeout: DEFAULT_TIMEOUT,
            content_type: ContentType::default(),
        }
    }

    /// Points every endpoint at `base_url`, keeping the service's path layout
    /// (`{base_url}/verify/`, `{base_url}/token/`, ...).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.verify_uri = format!("{base_url}/verify/");
        self.token_uri = format!("{base_url}/token/");
        self.whitelist_uri = format!("{base_url}/whitelist/");
        self.blacklist_uri = format!("{base_url}/blacklist/");
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the response format.
    #[must_use]
    pub const fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Checks that both credentials are present.
    ///
    /// # Errors
    ///
    /// Returns [`ZypCredsError::Configuration`] if the account id or the secret key is blank.
    pub fn validate(&self) -> ZypCredsResult<()> {
        if self.account_id.trim().is_empty() || self.secret_key.trim().is_empty() {
            return Err(ZypCredsError::configuration(
                "account id and secret key are both required",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("account_id", &self.account_id)
            .field("secret_key", &"[REDACTED]")
            .field("verify_uri", &self.verify_uri)
            .field("token_uri", &self.token_uri)
            .field("whitelist_uri", &self.whitelist_uri)
            .field("blacklist_uri", &self.blacklist_uri)
            .field("timeout", &self.timeout)
            .field("content_type", &self.content_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("acct-1", "s3cr3t");
        assert_eq!(config.verify_uri, "https://api.zypcreds.com/verify/");
        assert_eq!(config.token_uri, "https://api.zypcreds.com/token/");
        assert_eq!(config.whitelist_uri, "https://api.zypcreds.com/whitelist/");
        assert_eq!(config.blacklist_uri, "https://api.zypcreds.com/blacklist/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.content_type, ContentType::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_base_url() {
        let config = ClientConfig::new("acct-1", "s3cr3t").with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.verify_uri, "http://127.0.0.1:1234/verify/");
        assert_eq!(config.blacklist_uri, "http://127.0.0.1:1234/blacklist/");
    }

    #[test_case("", "s3cr3t" ; "missing account id")]
    #[test_case("acct-1", "" ; "missing secret key")]
    #[test_case("  ", "  " ; "blank both")]
    fn test_validate_rejects_missing_credentials(account_id: &str, secret_key: &str) {
        let err = ClientConfig::new(account_id, secret_key).validate().unwrap_err();
        assert!(matches!(err, ZypCredsError::Configuration { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", ClientConfig::new("acct-1", "s3cr3t"));
        assert!(debug.contains("acct-1"));
        assert!(!debug.contains("s3cr3t"));
    }
}
