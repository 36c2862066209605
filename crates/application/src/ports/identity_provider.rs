//! Identity provider port

use async_trait::async_trait;
use campus_domain::{AuthError, Credentials, TokenGrant};

/// Token endpoints of the identity provider.
///
/// Each call is a single network exchange; retries, timeouts and session
/// bookkeeping belong to the caller.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges a username and password for a token grant.
    async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, AuthError>;

    /// Exchanges a refresh token for a new token grant.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError>;
}
