//! Request types

pub mod headers;
mod method;
mod spec;

pub use method::HttpMethod;
pub use spec::{ApiRequest, HttpRequest};
