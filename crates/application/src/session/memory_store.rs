//! In-memory session store.

use campus_domain::{Session, SessionContext};
use parking_lot::RwLock;

use crate::ports::{SessionStore, SessionStoreError};

/// Thread-safe session store that lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Session>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `session`.
    #[must_use]
    pub const fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self) -> Session {
        self.session.read().clone()
    }

    fn write_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at_millis: i64,
    ) -> Result<(), SessionStoreError> {
        self.session
            .write()
            .set_tokens(access_token, refresh_token, expires_at_millis);
        Ok(())
    }

    fn write_context(&self, context: &SessionContext) -> Result<(), SessionStoreError> {
        self.session.write().set_context(context);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.session.write() = Session::default();
        Ok(())
    }
}
