//! Campus Application - Use cases and port definitions
//!
//! This crate contains the session-aware API client. It depends on the domain
//! crate and defines ports (traits) that infrastructure adapters implement:
//! the HTTP transport, the identity provider, the session store and the clock.
//!
//! A call goes through [`AuthenticatedApiClient::execute`]: the bearer token
//! and context headers are attached, a `401` triggers one refresh through the
//! [`SessionManager`] and one replay, and a failed refresh clears the session
//! and surfaces as [`ApiError::SessionExpired`].

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use auth::{AuthEvent, AuthService, DEFAULT_REFRESH_TIMEOUT, RefreshCoordinator};
pub use client::AuthenticatedApiClient;
pub use error::{ApiError, ApiResult};
pub use services::{ResourceClient, Service};
pub use session::{InMemorySessionStore, Recovery, SessionManager};
