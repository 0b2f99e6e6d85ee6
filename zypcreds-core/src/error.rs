use thiserror::Error;

/// Result type for ZypCreds operations.
pub type ZypCredsResult<T, E = ZypCredsError> = std::result::Result<T, E>;

/// Error outputs from `ZypCreds`.
///
/// Failures reported by the service itself (an error number/description in the
/// response body) are not errors at this level. They are carried inside a
/// successfully decoded [`crate::NormalizedResult`].
#[derive(Debug, Error, uniffi::Error)]
pub enum ZypCredsError {
    /// A required business parameter was missing or blank. No request was sent.
    #[error("missing required parameter: {field}")]
    Validation {
        /// Name of the missing parameter.
        field: String,
    },

    /// The client configuration is unusable (empty credentials, unparseable endpoint).
    #[error("configuration error: {error}")]
    Configuration {
        /// Description of the problem.
        error: String,
    },

    /// Network connection or HTTP failure.
    #[error("transport error for {url} (status {status:?}): {error}")]
    Transport {
        /// Request URL (without query string).
        url: String,
        /// HTTP status, when the service replied.
        status: Option<u16>,
        /// Error details.
        error: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// Request URL (without query string).
        url: String,
    },

    /// The response bytes are malformed for the declared content type.
    #[error("failed to decode {content_type} response: {error}")]
    Decode {
        /// The content type the bytes were decoded as.
        content_type: String,
        /// Parser error details.
        error: String,
    },
}

impl ZypCredsError {
    pub(crate) fn validation(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
        }
    }

    pub(crate) fn configuration(error: impl Into<String>) -> Self {
        Self::Configuration {
            error: error.into(),
        }
    }
}
