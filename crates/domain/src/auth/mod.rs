//! Authentication domain types

mod claims;
mod types;

pub use claims::{AccessClaims, RealmAccess};
pub use types::{AuthError, Credentials, RefreshFailure, RefreshOutcome};
