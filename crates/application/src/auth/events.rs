//! Session events.

/// Events emitted when the session changes, for UI updates.
///
/// Navigation to the login screen is driven by these events (or by the
/// `SessionExpired` error a call returns); the client never navigates itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Login succeeded.
    LoggedIn {
        /// Subject of the new access token, if it could be decoded.
        user_id: Option<String>,
    },
    /// The access token was replaced after a refresh.
    TokenRefreshed {
        /// New expiry, epoch milliseconds.
        expires_at_millis: i64,
    },
    /// The refresh failed and the session was cleared.
    SessionExpired {
        /// Refresh failure reason tag.
        reason: String,
    },
    /// The user logged out.
    LoggedOut,
}

impl AuthEvent {
    /// Returns true if the UI should show the login screen.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired { .. } | Self::LoggedOut)
    }
}
