//! Session state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage keys for the persisted session fields.
pub mod keys {
    /// Bearer access token.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Refresh token exchanged for a new access token.
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Access token expiry as epoch milliseconds.
    pub const TOKEN_EXPIRES: &str = "token_expires";
    /// Identifier of the signed-in user.
    pub const USER_ID: &str = "user_id";
    /// Roles of the signed-in user.
    pub const USER_ROLES: &str = "user_roles";
    /// Institution the user is currently acting for.
    pub const INSTITUTION_ID: &str = "institution_id";
}

/// Locally persisted authentication and context fields.
///
/// The access token and its expiry are always written and cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived bearer credential.
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Long-lived credential used to obtain a new access token.
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token expiry, epoch milliseconds.
    #[serde(rename = "token_expires", default, skip_serializing_if = "Option::is_none")]
    pub expires_at_millis: Option<i64>,
    /// Signed-in user.
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Roles in the order the identity provider reported them.
    #[serde(rename = "user_roles", default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Institution scope for institution-bound endpoints.
    #[serde(rename = "institution_id", default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the access token, treating an empty string as absent.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        non_empty(self.access_token.as_deref())
    }

    /// Returns the refresh token, treating an empty string as absent.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        non_empty(self.refresh_token.as_deref())
    }

    /// Returns true once `now_millis` has reached the expiry, or if no expiry is known.
    #[must_use]
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at_millis
            .is_none_or(|expires_at| now_millis >= expires_at)
    }

    /// Returns true only if an access token is present and not yet expired.
    #[must_use]
    pub fn is_token_valid(&self, now_millis: i64) -> bool {
        self.bearer_token().is_some() && !self.is_expired(now_millis)
    }

    /// Replaces the token triple.
    pub fn set_tokens(&mut self, access: &str, refresh: &str, expires_at_millis: i64) {
        self.access_token = Some(access.to_string());
        self.refresh_token = Some(refresh.to_string());
        self.expires_at_millis = Some(expires_at_millis);
    }

    /// Replaces the identity and institution fields.
    pub fn set_context(&mut self, context: &SessionContext) {
        self.user_id.clone_from(&context.user_id);
        self.roles.clone_from(&context.roles);
        self.institution_id.clone_from(&context.institution_id);
    }

    /// Returns the identity and institution fields.
    #[must_use]
    pub fn context(&self) -> SessionContext {
        SessionContext {
            user_id: self.user_id.clone(),
            roles: self.roles.clone(),
            institution_id: self.institution_id.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Identity and institution fields consumed by header assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Signed-in user.
    pub user_id: Option<String>,
    /// Roles of the signed-in user.
    pub roles: Option<Vec<String>>,
    /// Institution the user acts for.
    pub institution_id: Option<String>,
}

/// Token triple returned by the identity provider on login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// New access token.
    pub access_token: String,
    /// New refresh token. Some providers omit it on refresh.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(rename = "expires_in", default)]
    pub expires_in_secs: u64,
}

impl TokenGrant {
    /// Creates a grant.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in_secs: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
            expires_in_secs,
        }
    }

    /// Absolute expiry in epoch milliseconds, counted from `now`.
    #[must_use]
    pub fn expires_at_millis(&self, now: DateTime<Utc>) -> i64 {
        let lifetime_millis = i64::try_from(self.expires_in_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        now.timestamp_millis().saturating_add(lifetime_millis)
    }
}
