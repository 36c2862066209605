//! Wires the adapters into a ready-to-use client.

use std::sync::Arc;

use campus_application::ports::{
    Clock, HttpClient, HttpClientError, IdentityProvider, SessionStore, SessionStoreError,
};
use campus_application::{
    AuthService, AuthenticatedApiClient, InMemorySessionStore, RefreshCoordinator,
    ResourceClient, Service, SessionManager,
};

use crate::adapters::{ReqwestHttpClient, SystemClock};
use crate::auth::KeycloakIdentityProvider;
use crate::config::ClientConfig;
use crate::persistence::FileSessionStore;

/// Errors raised while assembling a [`CampusClient`].
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// An HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Http(#[from] HttpClientError),

    /// The session file could not be opened.
    #[error("failed to open session store: {0}")]
    Store(#[from] SessionStoreError),
}

/// Auth service plus one resource client per backend service, all sharing a
/// transport and a session.
#[derive(Debug, Clone)]
pub struct CampusClient {
    auth: AuthService,
    sessions: Arc<SessionManager>,
    enrollments: ResourceClient,
    users: ResourceClient,
    user_admin: ResourceClient,
    user_institution: ResourceClient,
    password_reset: ResourceClient,
}

impl CampusClient {
    /// Builds the client from `config`, persisting the session to
    /// `config.session_file` when one is set.
    ///
    /// # Errors
    /// Returns `BootstrapError` if the transport or session store cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, BootstrapError> {
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::open(path)?),
            None => Arc::new(InMemorySessionStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Builds the client over a caller-owned session store.
    ///
    /// # Errors
    /// Returns `BootstrapError::Http` if the transport or the identity
    /// provider's client cannot be created.
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, BootstrapError> {
        let http = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
        let provider = Arc::new(KeycloakIdentityProvider::new(
            &config.auth_url,
            config.request_timeout,
        )?);
        Ok(Self::with_ports(
            config,
            http,
            provider,
            store,
            Arc::new(SystemClock::new()),
        ))
    }

    /// Builds the client from explicit port implementations.
    #[must_use]
    pub fn with_ports(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let coordinator =
            RefreshCoordinator::new(Arc::clone(&provider)).with_timeout(config.refresh_timeout);
        let sessions = Arc::new(SessionManager::new(store, clock, coordinator));
        let api = AuthenticatedApiClient::new(
            http,
            Arc::clone(&sessions),
            config.service_url(Service::Enrollments).clone(),
        );

        let resource = |service: Service| {
            ResourceClient::new(
                api.for_service(config.service_url(service).clone()),
                service.institution_scoped(),
            )
        };

        tracing::debug!(auth_url = %config.auth_url, "campus client assembled");
        Self {
            auth: AuthService::new(provider, Arc::clone(&sessions)),
            enrollments: resource(Service::Enrollments),
            users: resource(Service::Users),
            user_admin: resource(Service::UserAdmin),
            user_institution: resource(Service::UserInstitution),
            password_reset: resource(Service::PasswordReset),
            sessions,
        }
    }

    /// Login, logout and session checks.
    #[must_use]
    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// The shared session manager.
    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// The resource client for `service`.
    #[must_use]
    pub const fn resource(&self, service: Service) -> &ResourceClient {
        match service {
            Service::Enrollments => &self.enrollments,
            Service::Users => &self.users,
            Service::UserAdmin => &self.user_admin,
            Service::UserInstitution => &self.user_institution,
            Service::PasswordReset => &self.password_reset,
        }
    }

    /// Enrollments.
    #[must_use]
    pub const fn enrollments(&self) -> &ResourceClient {
        &self.enrollments
    }

    /// Users of the selected institution.
    #[must_use]
    pub const fn users(&self) -> &ResourceClient {
        &self.users
    }

    /// Cross-institution user administration.
    #[must_use]
    pub const fn user_admin(&self) -> &ResourceClient {
        &self.user_admin
    }

    /// User to institution assignments.
    #[must_use]
    pub const fn user_institution(&self) -> &ResourceClient {
        &self.user_institution
    }

    /// Password reset.
    #[must_use]
    pub const fn password_reset(&self) -> &ResourceClient {
        &self.password_reset
    }
}
