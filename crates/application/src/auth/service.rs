//! Login, logout and session gating.

use std::sync::Arc;

use campus_domain::{AccessClaims, Credentials, Session, SessionContext};
use tokio::sync::broadcast;

use super::AuthEvent;
use crate::error::{ApiError, ApiResult};
use crate::ports::IdentityProvider;
use crate::session::SessionManager;

/// Session-aware authentication operations used by the UI layer.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, sessions: Arc<SessionManager>) -> Self {
        Self { provider, sessions }
    }

    /// Signs in and stores the new session.
    ///
    /// The user id and roles are read from the access token claims; an opaque
    /// token leaves them unset. Any previous institution selection is dropped.
    ///
    /// # Errors
    /// Returns `ApiError::Auth` if the identity provider refuses the credentials
    /// or cannot be reached, and `ApiError::Store` if the session cannot be saved.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let grant = self.provider.login(credentials).await.map_err(|e| {
            tracing::warn!(username = %credentials.username, error = %e, "login failed");
            ApiError::Auth(e)
        })?;

        self.sessions.persist_grant(None, &grant)?;

        let context = match AccessClaims::decode(&grant.access_token) {
            Ok(claims) => SessionContext {
                roles: Some(claims.roles()),
                user_id: claims.sub,
                institution_id: None,
            },
            Err(e) => {
                tracing::debug!(error = %e, "access token claims unavailable");
                SessionContext::default()
            }
        };
        self.sessions.store().write_context(&context)?;

        tracing::info!(username = %credentials.username, "logged in");
        self.sessions.publish(AuthEvent::LoggedIn {
            user_id: context.user_id,
        });
        Ok(self.sessions.current())
    }

    /// Clears the session.
    ///
    /// # Errors
    /// Returns `ApiError::Store` if the cleared session cannot be saved.
    pub fn logout(&self) -> ApiResult<()> {
        self.sessions.store().clear()?;
        tracing::info!("logged out");
        self.sessions.publish(AuthEvent::LoggedOut);
        Ok(())
    }

    /// Sets the institution scope sent with institution-bound calls.
    ///
    /// # Errors
    /// Returns `ApiError::Store` if the session cannot be saved.
    pub fn select_institution(&self, institution_id: impl Into<String>) -> ApiResult<()> {
        let mut context = self.sessions.current().context();
        context.institution_id = Some(institution_id.into());
        self.sessions.store().write_context(&context)?;
        Ok(())
    }

    /// Local check: an access token is present and not expired.
    #[must_use]
    pub fn is_token_valid(&self) -> bool {
        self.sessions.is_token_valid()
    }

    /// Makes sure the session holds a valid access token before the first call
    /// of a new interaction, refreshing it if it has expired.
    ///
    /// # Errors
    /// Returns `SessionExpired` (and clears the session) if no refresh is possible.
    pub async fn ensure_session(&self) -> ApiResult<Session> {
        self.sessions.ensure_valid().await
    }

    /// The current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.sessions.current()
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sessions.subscribe()
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
