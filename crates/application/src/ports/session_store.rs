//! Session store port
//!
//! The session is owned outside the client. The core reads it before every
//! call, writes new tokens after a successful refresh, and clears it when a
//! refresh fails.

use campus_domain::{Session, SessionContext};

/// Errors that can occur while persisting the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted key/value session state.
pub trait SessionStore: Send + Sync {
    /// Returns the current fields.
    fn read(&self) -> Session;

    /// Replaces the access token, refresh token and expiry together.
    ///
    /// # Errors
    /// Returns an error if the new state cannot be persisted.
    fn write_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_at_millis: i64,
    ) -> Result<(), SessionStoreError>;

    /// Replaces the user id, roles and institution id together.
    ///
    /// # Errors
    /// Returns an error if the new state cannot be persisted.
    fn write_context(&self, context: &SessionContext) -> Result<(), SessionStoreError>;

    /// Removes every field. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the cleared state cannot be persisted.
    fn clear(&self) -> Result<(), SessionStoreError>;
}
