//! Session manager.
//!
//! Owns the session store, the clock and the refresh coordinator, and turns
//! a refresh outcome into either a fresh session to retry with or a torn-down
//! session and a `SessionExpired` error.
//!
//! Recoveries run one at a time. A caller whose rejected token has already
//! been replaced in the store retries with the stored session instead of
//! refreshing again, so concurrent `401`s on one session cost one exchange.

use std::sync::Arc;

use campus_domain::{RefreshOutcome, Session, TokenGrant};
use tokio::sync::{Mutex, broadcast};

use crate::auth::{AuthEvent, RefreshCoordinator};
use crate::error::{ApiError, ApiResult};
use crate::ports::{Clock, SessionStore, SessionStoreError};

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 16;

/// What the executor should do after a `401`.
#[derive(Debug)]
pub enum Recovery {
    /// Tokens were refreshed; replay the request with this session.
    Retry(Session),
    /// The call chain ends with this error.
    Done(ApiError),
}

/// Shared session state and refresh handling.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    coordinator: RefreshCoordinator,
    refresh_gate: Mutex<()>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionManager {
    /// Creates a manager over the given store.
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        coordinator: RefreshCoordinator,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            clock,
            coordinator,
            refresh_gate: Mutex::new(()),
            events,
        }
    }

    /// Reads the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.store.read()
    }

    /// Local check: an access token is present and not expired.
    #[must_use]
    pub fn is_token_valid(&self) -> bool {
        self.store.read().is_token_valid(self.clock.now_millis())
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub(crate) fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("no session event subscribers");
        }
    }

    /// Refreshes the tokens of `stale`, the session a rejected call was sent with.
    pub async fn recover(&self, stale: &Session) -> Recovery {
        let _gate = self.refresh_gate.lock().await;

        let current = self.store.read();
        if current.bearer_token().is_some() && current.bearer_token() != stale.bearer_token() {
            tracing::debug!("access token already replaced, retrying with stored session");
            return Recovery::Retry(current);
        }

        match self.coordinator.refresh(current.refresh_token()).await {
            RefreshOutcome::Success(grant) => {
                match self.persist_grant(current.refresh_token(), &grant) {
                    Ok(expires_at_millis) => {
                        tracing::info!(expires_at_millis, "access token refreshed");
                        self.publish(AuthEvent::TokenRefreshed { expires_at_millis });
                        Recovery::Retry(self.store.read())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "refreshed tokens could not be stored");
                        Recovery::Done(e.into())
                    }
                }
            }
            RefreshOutcome::Failure(failure) => Recovery::Done(self.terminate(failure.reason())),
        }
    }

    /// Returns a session with a valid access token, refreshing it first if needed.
    ///
    /// # Errors
    /// Returns `SessionExpired` when the session cannot be refreshed.
    pub async fn ensure_valid(&self) -> ApiResult<Session> {
        let session = self.store.read();
        if session.is_token_valid(self.clock.now_millis()) {
            return Ok(session);
        }

        tracing::debug!("access token missing or expired, refreshing proactively");
        match self.recover(&session).await {
            Recovery::Retry(fresh) => Ok(fresh),
            Recovery::Done(error) => Err(error),
        }
    }

    /// Writes a grant and returns the absolute expiry that was stored.
    ///
    /// A grant without a refresh token keeps `previous_refresh`.
    pub(crate) fn persist_grant(
        &self,
        previous_refresh: Option<&str>,
        grant: &TokenGrant,
    ) -> Result<i64, SessionStoreError> {
        let refresh = grant
            .refresh_token
            .as_deref()
            .or(previous_refresh)
            .unwrap_or_default();
        let expires_at_millis = grant.expires_at_millis(self.clock.now());
        self.store
            .write_tokens(&grant.access_token, refresh, expires_at_millis)?;
        Ok(expires_at_millis)
    }

    /// Clears the session and reports it as expired.
    pub fn terminate(&self, reason: &str) -> ApiError {
        tracing::warn!(reason, "session terminated");
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear session store");
        }
        self.publish(AuthEvent::SessionExpired {
            reason: reason.to_string(),
        });
        ApiError::SessionExpired {
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("coordinator", &self.coordinator)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
