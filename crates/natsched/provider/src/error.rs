//! Error types for the cloud networking seam.

use thiserror::Error;

/// Failure surfaced by a [`crate::NetworkProvider`] call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The API rejected the request.
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure reaching the API.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Credentials were rejected or lacked permission.
    #[error("authorization failure: {0}")]
    Unauthorized(String),

    /// The API accepted the request but returned no usable identifier.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
