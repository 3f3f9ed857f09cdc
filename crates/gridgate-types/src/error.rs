//! Error types for gridgate.

use thiserror::Error;

/// Result type alias for gridgate operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while querying the Markets Gateway.
///
/// Propagation policy: field-level problems are recovered locally with
/// defaults and never appear here (see
/// [`FieldIssue`](crate::FieldIssue)); exchange-level errors abort only
/// the exchange that raised them; authentication failures abort the
/// whole run.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response XML was malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Authentication against the single sign-on endpoint failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A required credential environment variable is not set.
    #[error("Missing credentials: set the {var} environment variable")]
    MissingCredentials {
        /// Name of the missing environment variable.
        var: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
