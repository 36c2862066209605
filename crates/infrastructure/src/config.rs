//! Client configuration.
//!
//! One base URL per backend service plus the auth service, the transport and
//! refresh timeouts, and where the session is kept. Defaults point to a local
//! gateway; override via environment variables or explicit construction.

use std::path::PathBuf;
use std::time::Duration;

use campus_application::{DEFAULT_REFRESH_TIMEOUT, Service};
use url::Url;

use crate::adapters::DEFAULT_REQUEST_TIMEOUT;

const DEFAULT_GATEWAY: &str = "http://localhost:8080";
const AUTH_PATH: &str = "/api/v1/auth";

/// Configuration for connecting to the Campus services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Auth service; login posts here, refresh posts to `{auth_url}/refresh`.
    pub auth_url: Url,
    /// Enrollments service.
    pub enrollments_url: Url,
    /// Institution users service.
    pub users_url: Url,
    /// User administration service.
    pub user_admin_url: Url,
    /// User to institution assignments service.
    pub user_institution_url: Url,
    /// Password reset service.
    pub reset_url: Url,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
    /// Upper bound on one token refresh.
    pub refresh_timeout: Duration,
    /// Session file. `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CAMPUS_AUTH_URL` (default: `http://localhost:8080/api/v1/auth`)
    /// - `CAMPUS_ENROLLMENTS_URL` (default: `http://localhost:8080/api/v1/enrollments`)
    /// - `CAMPUS_USERS_URL` (default: `http://localhost:8080/api/v1/users`)
    /// - `CAMPUS_USER_ADMIN_URL` (default: `http://localhost:8080/api/v1/user-admin`)
    /// - `CAMPUS_USER_INSTITUTION_URL` (default: `http://localhost:8080/api/v1/user-institution`)
    /// - `CAMPUS_RESET_URL` (default: `http://localhost:8080/api/v1/reset`)
    /// - `CAMPUS_REQUEST_TIMEOUT_SECS` (default: 30)
    /// - `CAMPUS_REFRESH_TIMEOUT_SECS` (default: 10)
    /// - `CAMPUS_SESSION_FILE` (default: `<data dir>/campus/session.json`)
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparseable URL or when no session file
    /// location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway = |path: &str| format!("{DEFAULT_GATEWAY}{path}");

        let session_file = match std::env::var_os("CAMPUS_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("campus")
                .join("session.json"),
        };

        Ok(Self {
            auth_url: env_url("CAMPUS_AUTH_URL", &gateway(AUTH_PATH))?,
            enrollments_url: env_url(
                "CAMPUS_ENROLLMENTS_URL",
                &gateway(Service::Enrollments.path()),
            )?,
            users_url: env_url("CAMPUS_USERS_URL", &gateway(Service::Users.path()))?,
            user_admin_url: env_url(
                "CAMPUS_USER_ADMIN_URL",
                &gateway(Service::UserAdmin.path()),
            )?,
            user_institution_url: env_url(
                "CAMPUS_USER_INSTITUTION_URL",
                &gateway(Service::UserInstitution.path()),
            )?,
            reset_url: env_url("CAMPUS_RESET_URL", &gateway(Service::PasswordReset.path()))?,
            request_timeout: env_secs("CAMPUS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT),
            refresh_timeout: env_secs("CAMPUS_REFRESH_TIMEOUT_SECS", DEFAULT_REFRESH_TIMEOUT),
            session_file: Some(session_file),
        })
    }

    /// Every service behind one origin (a gateway or a mock server), with an
    /// in-memory session.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if `base` cannot take the service paths.
    pub fn local(base: &str) -> Result<Self, ConfigError> {
        let base = base.trim_end_matches('/');
        let make_url = |path: &str| -> Result<Url, ConfigError> {
            Url::parse(&format!("{base}{path}"))
                .map_err(|e| ConfigError::InvalidUrl(base.to_string(), e.to_string()))
        };

        Ok(Self {
            auth_url: make_url(AUTH_PATH)?,
            enrollments_url: make_url(Service::Enrollments.path())?,
            users_url: make_url(Service::Users.path())?,
            user_admin_url: make_url(Service::UserAdmin.path())?,
            user_institution_url: make_url(Service::UserInstitution.path())?,
            reset_url: make_url(Service::PasswordReset.path())?,
            request_timeout: Duration::from_secs(5),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            session_file: None,
        })
    }

    /// Sets the refresh timeout.
    #[must_use]
    pub const fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Persists the session to `path`.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Base URL of `service`.
    #[must_use]
    pub const fn service_url(&self, service: Service) -> &Url {
        match service {
            Service::Enrollments => &self.enrollments_url,
            Service::Users => &self.users_url,
            Service::UserAdmin => &self.user_admin_url,
            Service::UserInstitution => &self.user_institution_url,
            Service::PasswordReset => &self.reset_url,
        }
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_secs(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .map_or(default, Duration::from_secs)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    /// Neither `CAMPUS_SESSION_FILE` nor a platform data directory is available.
    #[error("no data directory for the session file; set CAMPUS_SESSION_FILE")]
    NoDataDir,
}
