//! Authenticated request execution.
//!
//! [`AuthenticatedApiClient`] attaches the session's bearer token and context
//! headers, recovers from a `401` with one refresh and one replay, and maps
//! every response to a typed result.

mod executor;
mod headers;
mod response;

pub use executor::AuthenticatedApiClient;
pub use headers::{assemble_headers, require_context};
pub use response::interpret;
