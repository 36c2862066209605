//! Campus Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer (reqwest transport, Keycloak identity provider, file
//! session store, system clock), the environment-driven configuration, and
//! [`CampusClient`], which wires them together.

pub mod adapters;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod persistence;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use auth::KeycloakIdentityProvider;
pub use bootstrap::{BootstrapError, CampusClient};
pub use config::{ClientConfig, ConfigError};
pub use persistence::FileSessionStore;
