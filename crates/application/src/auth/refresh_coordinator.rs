//! Refresh coordinator.
//!
//! Exchanges a refresh token for a new token pair. Every call is one network
//! exchange; concurrent `401`s on one session are coalesced by the
//! [`SessionManager`](crate::session::SessionManager), which checks the store
//! for a newer session before asking for another exchange.

use std::sync::Arc;
use std::time::Duration;

use campus_domain::{RefreshFailure, RefreshOutcome};

use crate::ports::IdentityProvider;

/// Upper bound on one refresh exchange.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounded refresh of the session's token pair.
pub struct RefreshCoordinator {
    provider: Arc<dyn IdentityProvider>,
    timeout: Duration,
}

impl RefreshCoordinator {
    /// Creates a coordinator with the default timeout.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }

    /// Sets the exchange timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exchanges `refresh_token` for a new token pair.
    ///
    /// An absent or empty token fails with `NoRefreshToken` without touching
    /// the network. There are no retries: a failure is final for the caller.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> RefreshOutcome {
        let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
            tracing::debug!("no refresh token in session");
            return RefreshOutcome::Failure(RefreshFailure::NoRefreshToken);
        };

        match tokio::time::timeout(self.timeout, self.provider.refresh(refresh_token)).await {
            Ok(Ok(grant)) => RefreshOutcome::Success(grant),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "token refresh failed");
                RefreshOutcome::Failure(e.into())
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis(), "token refresh timed out");
                RefreshOutcome::Failure(RefreshFailure::Timeout)
            }
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
