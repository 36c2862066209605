//! Response types
//!
//! Holds what the transport received: status, headers, raw body and timing.

use std::collections::HashMap;
use std::time::Duration;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// `401 Unauthorized`, the trigger for a token refresh.
    pub const UNAUTHORIZED: Self = Self(401);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is any error status (4xx or 5xx).
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.0 >= 400 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// HTTP response as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Content-Type header value (extracted for convenience).
    pub content_type: Option<String>,
    /// Time from dispatch to the last body byte.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());

        Self {
            status: status.into(),
            headers,
            body,
            content_type,
            duration,
        }
    }

    /// Convenience constructor for a JSON response.
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.to_string().into_bytes(), Duration::ZERO)
    }

    /// Convenience constructor for a plain-text response.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        Self::new(status, headers, body.as_bytes().to_vec(), Duration::ZERO)
    }

    /// Returns true for `401 Unauthorized`.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// Returns true if the content type indicates JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|ct| ct.contains("application/json") || ct.contains("+json"))
    }

    /// Returns true if the body is empty or whitespace only.
    #[must_use]
    pub fn is_body_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode::new(204).is_success());
        assert!(!StatusCode::new(302).is_success());
        assert!(!StatusCode::new(302).is_error());
        assert!(StatusCode::new(404).is_error());
        assert!(StatusCode::new(503).is_error());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::UNAUTHORIZED.to_string(), "401 Unauthorized");
    }

    #[test]
    fn test_content_type_detection() {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/problem+json; charset=utf-8".to_string(),
        );
        let response = ResponseSpec::new(400, headers, Vec::new(), Duration::ZERO);
        assert!(response.is_json());
        assert!(response.is_body_blank());

        let response = ResponseSpec::text(200, "ok");
        assert!(!response.is_json());
        assert_eq!(response.get_header("CONTENT-TYPE").map(String::as_str), Some("text/plain"));
    }
}
