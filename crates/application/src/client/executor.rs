//! Request executor with one transparent retry after a token refresh.

use std::sync::Arc;

use campus_domain::{ApiRequest, HttpRequest, ResponseSpec, Session, generate_request_id};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;
use url::Url;

use super::headers::{assemble_headers, require_context};
use super::response::{http_error, interpret};
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpClient;
use crate::session::{Recovery, SessionManager};

/// API client bound to one service base URL.
///
/// Cloning is cheap; clones share the transport and the session manager.
#[derive(Clone)]
pub struct AuthenticatedApiClient {
    http: Arc<dyn HttpClient>,
    sessions: Arc<SessionManager>,
    base_url: Url,
}

impl AuthenticatedApiClient {
    /// Creates a client for the service at `base_url`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, sessions: Arc<SessionManager>, base_url: Url) -> Self {
        Self {
            http,
            sessions,
            base_url,
        }
    }

    /// Returns a client for another service sharing this client's transport and session.
    #[must_use]
    pub fn for_service(&self, base_url: Url) -> Self {
        Self {
            http: Arc::clone(&self.http),
            sessions: Arc::clone(&self.sessions),
            base_url,
        }
    }

    /// The service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared session manager.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Local check: an access token is present and not expired.
    #[must_use]
    pub fn is_token_valid(&self) -> bool {
        self.sessions.is_token_valid()
    }

    /// Performs one logical call and returns the parsed JSON body.
    ///
    /// A `401` triggers one token refresh and one replay of the request. A
    /// second `401` ends the call. When the refresh fails the session is
    /// cleared and `SessionExpired` is returned without a replay.
    ///
    /// # Errors
    /// See [`ApiError`] for the failure taxonomy.
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Value> {
        let span = tracing::debug_span!(
            "api_call",
            request_id = %generate_request_id(),
            method = %request.method,
            path = %request.path,
        );
        self.execute_once_with_retry(request).instrument(span).await
    }

    /// Performs one logical call and deserializes the body into `T`.
    ///
    /// An empty result is presented to `T` as JSON `null`.
    ///
    /// # Errors
    /// Returns `ApiError::Decode` if the body does not match `T`, otherwise
    /// the same errors as [`Self::execute`].
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    async fn execute_once_with_retry(&self, request: &ApiRequest) -> ApiResult<Value> {
        request.validate()?;
        let url = request.url(&self.base_url)?;

        let session = self.sessions.current();
        require_context(&session, request)?;

        let response = self.dispatch(request, &url, &session).await?;
        if !response.is_unauthorized() {
            return interpret(&response);
        }

        tracing::debug!("request unauthorized, refreshing session");
        let fresh = match self.sessions.recover(&session).await {
            Recovery::Retry(fresh) => fresh,
            Recovery::Done(error) => return Err(error),
        };

        let retried = self.dispatch(request, &url, &fresh).await?;
        if retried.is_unauthorized() {
            tracing::warn!("request unauthorized again after refresh");
            return Err(http_error(&retried));
        }
        interpret(&retried)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &Url,
        session: &Session,
    ) -> ApiResult<ResponseSpec> {
        let outgoing = HttpRequest {
            method: request.method,
            url: url.clone(),
            headers: assemble_headers(session, request),
            body: request.body.as_ref().map(|body| body.to_string().into_bytes()),
        };

        let response = self.http.execute(&outgoing).await.map_err(|e| {
            tracing::debug!(error = %e, "transport failure");
            ApiError::Network(e)
        })?;
        tracing::debug!(
            status = response.status.as_u16(),
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );
        Ok(response)
    }
}

impl std::fmt::Debug for AuthenticatedApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
