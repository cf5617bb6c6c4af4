//! Caller-facing error taxonomy for gateway operations.

use thiserror::Error;

/// Failure of one gateway operation, as surfaced to callers.
///
/// `Display` carries only the message a client may see; transport and parse
/// detail is logged at the failure site and never crosses this boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required parameter is missing or malformed. Maps to HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// The provider reports the requested entity does not exist. Maps to 404.
    #[error("{0}")]
    NotFound(String),

    /// Subprocess failure, non-2xx remote response, or unparsable payload.
    /// Maps to HTTP 500 with a generic message.
    #[error("{0}")]
    Backend(String),
}
