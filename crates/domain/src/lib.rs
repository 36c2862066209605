//! Campus Domain - Core types
//!
//! This crate defines the domain model for the Campus API client: the
//! persisted session, token grants and refresh outcomes, and the request
//! and response shapes exchanged with the platform's REST services.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod session;

pub use auth::{AccessClaims, AuthError, Credentials, RefreshFailure, RefreshOutcome};
pub use error::{DomainError, DomainResult};
pub use id::generate_request_id;
pub use request::{ApiRequest, HttpMethod, HttpRequest};
pub use response::{ResponseSpec, StatusCode};
pub use session::{Session, SessionContext, TokenGrant};
