//! Authentication for the Campus API client.
//!
//! This module provides:
//! - The refresh coordinator that exchanges refresh tokens, bounded by a timeout
//! - Login, logout and proactive session checks
//! - Session events for the UI layer

mod events;
mod refresh_coordinator;
mod service;

pub use events::AuthEvent;
pub use refresh_coordinator::{DEFAULT_REFRESH_TIMEOUT, RefreshCoordinator};
pub use service::AuthService;
