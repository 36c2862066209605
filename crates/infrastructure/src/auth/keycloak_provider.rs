//! Keycloak-backed identity provider.
//!
//! Talks to the platform's auth service, which fronts Keycloak:
//! - login: `POST {auth_url}` with `{username, password}`
//! - refresh: `POST {auth_url}/refresh` with `{refreshToken}`
//!
//! Both answer `{access_token, refresh_token, expires_in}` on success and an
//! OAuth2-style `{error, error_description}` body otherwise.

use std::time::Duration;

use async_trait::async_trait;
use campus_application::ports::{HttpClientError, IdentityProvider};
use campus_domain::{AuthError, Credentials, TokenGrant};
use serde::{Deserialize, Serialize};
use url::Url;

/// OAuth2 error response.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Identity provider speaking the auth service's JSON protocol.
#[derive(Debug, Clone)]
pub struct KeycloakIdentityProvider {
    http_client: reqwest::Client,
    login_url: String,
    refresh_url: String,
}

impl KeycloakIdentityProvider {
    /// Creates a provider for the auth service at `auth_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(auth_url: &Url, timeout: Duration) -> Result<Self, HttpClientError> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;
        Ok(Self::with_client(http_client, auth_url))
    }

    /// Creates a provider with a custom reqwest client.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, auth_url: &Url) -> Self {
        let login_url = auth_url.as_str().trim_end_matches('/').to_string();
        let refresh_url = format!("{login_url}/refresh");
        Self {
            http_client,
            login_url,
            refresh_url,
        }
    }

    async fn exchange<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<TokenGrant, AuthError> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| map_error(&e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| map_error(&e))?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                description: rejection_description(status.as_u16(), &bytes),
            });
        }

        let grant: TokenGrant =
            serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedResponse {
                message: format!("failed to parse token response: {e}"),
            })?;
        if grant.access_token.is_empty() {
            return Err(AuthError::MalformedResponse {
                message: "token response has an empty access_token".to_string(),
            });
        }
        Ok(grant)
    }
}

#[async_trait]
impl IdentityProvider for KeycloakIdentityProvider {
    async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, AuthError> {
        tracing::debug!(username = %credentials.username, "requesting token grant");
        self.exchange(&self.login_url, credentials).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        tracing::debug!("exchanging refresh token");
        self.exchange(&self.refresh_url, &RefreshRequest { refresh_token })
            .await
    }
}

fn map_error(error: &reqwest::Error) -> AuthError {
    if error.is_timeout() {
        AuthError::Timeout
    } else {
        AuthError::Network {
            message: error.to_string(),
        }
    }
}

/// `error_description`, then `error`, then the raw body, then the status.
fn rejection_description(status: u16, body: &[u8]) -> String {
    if let Ok(error) = serde_json::from_slice::<TokenErrorResponse>(body)
        && let Some(description) = error.error_description.or(error.error)
    {
        return description;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("token request failed with HTTP {status}")
    } else {
        text.to_string()
    }
}
