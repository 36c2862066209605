//! Authentication types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::TokenGrant;

/// Username and password submitted to the identity provider.
///
/// Custom `Debug` implementation redacts the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a single refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The identity provider issued a new token pair.
    Success(TokenGrant),
    /// The refresh failed; the session cannot be recovered.
    Failure(RefreshFailure),
}

impl RefreshOutcome {
    /// Returns true for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Why a refresh attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The session holds no refresh token; no network call was made.
    NoRefreshToken,
    /// The identity provider did not answer in time.
    Timeout,
    /// Transport failure before any HTTP response.
    Network {
        /// Transport error description.
        message: String,
    },
    /// The identity provider refused the refresh token.
    Rejected {
        /// Server-provided `error_description`.
        description: String,
    },
    /// The response could not be read as a token grant.
    MalformedResponse {
        /// Parse error description.
        message: String,
    },
}

impl RefreshFailure {
    /// Short reason tag reported with `SessionExpired`.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::NoRefreshToken => "no-refresh-token",
            Self::Timeout => "timeout",
            Self::Network { .. } => "network-error",
            Self::Rejected { description } => description,
            Self::MalformedResponse { .. } => "malformed-response",
        }
    }
}

impl From<AuthError> for RefreshFailure {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Rejected { description } => Self::Rejected { description },
            AuthError::Network { message } => Self::Network { message },
            AuthError::Timeout => Self::Timeout,
            AuthError::MalformedResponse { message } => Self::MalformedResponse { message },
        }
    }
}

/// Errors from the identity provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The provider answered with an error status.
    #[error("identity provider rejected the request: {description}")]
    Rejected {
        /// Server-provided `error_description`, or the raw body.
        description: String,
    },
    /// Transport failure.
    #[error("network error: {message}")]
    Network {
        /// Error description.
        message: String,
    },
    /// The provider did not answer in time.
    #[error("identity provider timed out")]
    Timeout,
    /// The success body is not a token grant.
    #[error("malformed token response: {message}")]
    MalformedResponse {
        /// Parse error description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reason_tags() {
        assert_eq!(RefreshFailure::NoRefreshToken.reason(), "no-refresh-token");
        assert_eq!(RefreshFailure::Timeout.reason(), "timeout");
        assert_eq!(
            RefreshFailure::Network {
                message: "connection refused".to_string()
            }
            .reason(),
            "network-error"
        );
        assert_eq!(
            RefreshFailure::Rejected {
                description: "Token is not active".to_string()
            }
            .reason(),
            "Token is not active"
        );
    }

    #[test]
    fn test_auth_error_maps_to_failure() {
        let failure = RefreshFailure::from(AuthError::Timeout);
        assert_eq!(failure, RefreshFailure::Timeout);

        let failure = RefreshFailure::from(AuthError::Rejected {
            description: "Invalid refresh token".to_string(),
        });
        assert_eq!(failure.reason(), "Invalid refresh token");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("director", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("director"));
        assert!(!debug.contains("hunter2"));
    }
}
