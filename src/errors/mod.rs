//! Error types for the Fastly client.
//!
//! Local validation failures are raised before any request leaves the
//! process; everything else is a transport, HTTP, or decoding failure passed
//! through unchanged.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Fastly operations.
pub type FastlyResult<T> = Result<T, FastlyError>;

/// Error type for Fastly client operations.
#[derive(Debug, Error)]
pub enum FastlyError {
    /// The service ID was empty.
    #[error("Missing required field 'service'")]
    MissingService,

    /// The configuration version was zero.
    #[error("Missing required field 'version'")]
    MissingVersion,

    /// The endpoint name was empty.
    #[error("Missing required field 'name'")]
    MissingName,

    /// KMS server-side encryption was requested without a key ID.
    #[error("Missing required field 'server_side_encryption_kms_key_id'")]
    MissingKmsKeyId,

    /// The API answered a delete with a status other than "ok".
    #[error("Received unexpected status from the API: {message}")]
    NotOk {
        /// Message returned alongside the status, if any.
        message: String,
    },

    /// Configuration error (missing API key, bad base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Authentication or authorization failure (HTTP 401/403).
    #[error("Authentication failed (HTTP {status_code}): {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
        /// HTTP status code.
        status_code: u16,
    },

    /// Resource not found (HTTP 404).
    #[error("Not found: {message}")]
    NotFound {
        /// Error message from the API.
        message: String,
    },

    /// Any other non-success HTTP response.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message.
        message: String,
        /// Additional detail from the error body.
        detail: Option<String>,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl FastlyError {
    /// Returns true for errors raised by local input validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FastlyError::MissingService
                | FastlyError::MissingVersion
                | FastlyError::MissingName
                | FastlyError::MissingKmsKeyId
        )
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FastlyError::Authentication { status_code, .. }
            | FastlyError::Api { status_code, .. } => Some(*status_code),
            FastlyError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Short, stable label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FastlyError::MissingService
            | FastlyError::MissingVersion
            | FastlyError::MissingName
            | FastlyError::MissingKmsKeyId => "validation",
            FastlyError::NotOk { .. } => "not_ok",
            FastlyError::Configuration { .. } => "configuration",
            FastlyError::Authentication { .. } => "authentication",
            FastlyError::NotFound { .. } => "not_found",
            FastlyError::Api { .. } => "api",
            FastlyError::Network { .. } => "network",
            FastlyError::Timeout { .. } => "timeout",
            FastlyError::Serialization { .. } => "serialization",
        }
    }

    /// Maps a non-success response to an error.
    ///
    /// The body may be either the classic `{"msg", "detail"}` shape or a
    /// JSON:API `{"errors": [...]}` document.
    pub fn from_response(status: u16, body: &[u8], request_id: Option<String>) -> Self {
        let (message, detail) = match serde_json::from_slice::<ApiErrorResponse>(body) {
            Ok(parsed) => parsed.into_parts(),
            Err(_) => (None, None),
        };
        let message = message.unwrap_or_else(|| format!("HTTP {} error", status));

        match status {
            401 | 403 => FastlyError::Authentication {
                message,
                status_code: status,
            },
            404 => FastlyError::NotFound { message },
            _ => FastlyError::Api {
                status_code: status,
                message,
                detail,
                request_id,
            },
        }
    }
}

/// Error body returned by the Fastly API.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Short error message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Longer explanation.
    #[serde(default)]
    pub detail: Option<String>,
    /// JSON:API style error list.
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// A single JSON:API error entry.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// Error title.
    #[serde(default)]
    pub title: Option<String>,
    /// Error detail.
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorResponse {
    fn into_parts(self) -> (Option<String>, Option<String>) {
        if self.msg.is_some() {
            return (self.msg, self.detail);
        }
        match self.errors.into_iter().next() {
            Some(first) => (first.title, first.detail),
            None => (None, self.detail),
        }
    }
}

impl From<TransportError> for FastlyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => FastlyError::Timeout {
                message: err.to_string(),
            },
            _ => FastlyError::Network {
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for FastlyError {
    fn from(err: serde_json::Error) -> Self {
        FastlyError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_urlencoded::ser::Error> for FastlyError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        FastlyError::Serialization {
            message: format!("Failed to encode form body: {}", err),
        }
    }
}

impl From<url::ParseError> for FastlyError {
    fn from(err: url::ParseError) -> Self {
        FastlyError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
