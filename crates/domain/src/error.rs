//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request path is not a relative path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The base URL combined with the path does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value is invalid.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// An institution-scoped call was made without the required session field.
    #[error("missing session context: {0}")]
    MissingSessionContext(String),

    /// A request body could not be encoded as JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A token could not be decoded.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
