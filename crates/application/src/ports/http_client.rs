//! HTTP transport port

use std::future::Future;
use std::pin::Pin;

use campus_domain::{HttpRequest, ResponseSpec};

/// Sends one assembled request and returns whatever the server answered.
///
/// Implementations must not interpret status codes: a `401` or `500` is a
/// successful transport result.
pub trait HttpClient: Send + Sync {
    /// Executes the request.
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>>;
}

/// Transport failures before any HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Host name resolution failed.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Anything else reported by the transport.
    #[error("{0}")]
    Other(String),
}
