//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod http_client;
mod identity_provider;
mod session_store;

pub use clock::{Clock, ManualClock};
pub use http_client::{HttpClient, HttpClientError};
pub use identity_provider::IdentityProvider;
pub use session_store::{SessionStore, SessionStoreError};
