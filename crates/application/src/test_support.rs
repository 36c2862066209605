//! Scripted port implementations shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use campus_domain::{AuthError, Credentials, HttpRequest, ResponseSpec, Session, TokenGrant};
use parking_lot::Mutex;
use url::Url;

use crate::auth::RefreshCoordinator;
use crate::client::AuthenticatedApiClient;
use crate::ports::{HttpClient, HttpClientError, IdentityProvider, ManualClock};
use crate::session::{InMemorySessionStore, SessionManager};

pub const NOW_MILLIS: i64 = 1_700_000_000_000;

/// Replays queued responses and records every request it sees.
#[derive(Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(responses: Vec<Result<ResponseSpec, HttpClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>> {
        self.requests.lock().push(request.clone());
        let next = self
            .responses
            .lock()
            .pop_front()
            .expect("no scripted response left");
        Box::pin(async move { next })
    }
}

/// Identity provider with scripted refresh answers and a call counter.
///
/// Answers are used in order; the last one repeats.
pub struct FakeIdentityProvider {
    refresh_results: Mutex<VecDeque<Result<TokenGrant, AuthError>>>,
    login_result: Result<TokenGrant, AuthError>,
    delay: Duration,
    refresh_calls: AtomicUsize,
}

impl FakeIdentityProvider {
    pub fn refreshing_to(grant: TokenGrant) -> Self {
        Self {
            refresh_results: Mutex::new(VecDeque::from([Ok(grant.clone())])),
            login_result: Ok(grant),
            delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_with(error: AuthError) -> Self {
        Self {
            refresh_results: Mutex::new(VecDeque::from([Err(error.clone())])),
            login_result: Err(error),
            delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn refreshing_through(grants: Vec<TokenGrant>) -> Self {
        let login = grants.first().cloned().expect("at least one grant");
        Self {
            refresh_results: Mutex::new(grants.into_iter().map(Ok).collect()),
            login_result: Ok(login),
            delay: Duration::ZERO,
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenGrant, AuthError> {
        self.login_result.clone()
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let result = {
            let mut results = self.refresh_results.lock();
            if results.len() > 1 {
                results.pop_front().expect("non-empty")
            } else {
                results.front().cloned().expect("at least one scripted refresh")
            }
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }
}

/// Everything a client test needs to inspect after the call.
pub struct Harness {
    pub http: Arc<ScriptedHttpClient>,
    pub provider: Arc<FakeIdentityProvider>,
    pub store: Arc<InMemorySessionStore>,
    pub sessions: Arc<SessionManager>,
    pub client: AuthenticatedApiClient,
}

impl Harness {
    pub fn new(
        session: Session,
        provider: FakeIdentityProvider,
        responses: Vec<Result<ResponseSpec, HttpClientError>>,
    ) -> Self {
        let http = Arc::new(ScriptedHttpClient::new(responses));
        let provider = Arc::new(provider);
        let store = Arc::new(InMemorySessionStore::with_session(session));
        let clock = Arc::new(ManualClock::at_millis(NOW_MILLIS));
        let coordinator = RefreshCoordinator::new(provider.clone());
        let sessions = Arc::new(SessionManager::new(store.clone(), clock, coordinator));
        let client = AuthenticatedApiClient::new(
            http.clone(),
            sessions.clone(),
            Url::parse("http://localhost:8082/api/v1/enrollments").unwrap(),
        );

        Self {
            http,
            provider,
            store,
            sessions,
            client,
        }
    }
}

/// A session whose access token expired one second ago.
pub fn expired_session(access: &str, refresh: Option<&str>) -> Session {
    Session {
        access_token: Some(access.to_string()),
        refresh_token: refresh.map(str::to_string),
        expires_at_millis: Some(NOW_MILLIS - 1000),
        ..Session::default()
    }
}
