//! Application error types

use campus_domain::{AuthError, DomainError};
use thiserror::Error;

use crate::ports::{HttpClientError, SessionStoreError};

/// Errors returned to callers of the API client.
///
/// Every failure path ends in one of these; session teardown is the only
/// side effect that accompanies an error, and it is always reported as
/// [`ApiError::SessionExpired`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure before any HTTP response.
    #[error("network error: {0}")]
    Network(#[from] HttpClientError),

    /// The service answered with an error status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Response status code.
        status: u16,
        /// Server-provided message, or the raw body text.
        message: String,
    },

    /// The session could not be refreshed and has been cleared.
    #[error("session expired: {reason}")]
    SessionExpired {
        /// Refresh failure reason tag.
        reason: String,
    },

    /// The caller's input was rejected before any network call.
    #[error("invalid request: {0}")]
    Validation(#[from] DomainError),

    /// A success response did not contain the expected JSON.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Parse error description.
        message: String,
    },

    /// The session store could not persist a change.
    #[error("session store error: {0}")]
    Store(#[from] SessionStoreError),

    /// Login was refused or the identity provider was unreachable.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// HTTP status for `Http` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the caller should send the user back to the login screen.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

/// Result type alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;
