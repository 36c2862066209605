//! Access token claims.
//!
//! The payload is decoded without verifying the signature. The claims only
//! seed local session context; every API call is still authorized server-side.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{DomainError, DomainResult};

/// Claims read from a Keycloak-issued access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id).
    #[serde(default)]
    pub sub: Option<String>,
    /// Login name.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Realm-level role grants.
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
    /// Expiry, epoch seconds.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// The `realm_access` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RealmAccess {
    /// Granted realm roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AccessClaims {
    /// Decodes the payload segment of a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidToken` if the token is not three
    /// dot-separated segments or the payload is not base64url JSON.
    pub fn decode(token: &str) -> DomainResult<Self> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(DomainError::InvalidToken(
                "expected three dot-separated segments".to_string(),
            ));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| DomainError::InvalidToken(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::InvalidToken(format!("payload is not JSON: {e}")))
    }

    /// Realm roles in the order the token lists them.
    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.realm_access
            .as_ref()
            .map(|access| access.roles.clone())
            .unwrap_or_default()
    }
}
