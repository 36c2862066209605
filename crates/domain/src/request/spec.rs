//! Request descriptions
//!
//! [`ApiRequest`] is what callers hand to the client: a method, a path
//! relative to a service base URL, and an optional JSON body. It lives for
//! one logical call and is replayed at most once after a token refresh.
//! [`HttpRequest`] is the fully assembled wire request passed to the
//! transport.

use serde::{Deserialize, Serialize};
use url::Url;

use super::HttpMethod;
use super::headers;
use crate::error::{DomainError, DomainResult};

/// A logical API call, before authentication headers are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the service base URL, optionally with a query string.
    pub path: String,
    /// JSON body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Caller-supplied headers, sent after the managed ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    /// Whether the endpoint requires the caller's institution header.
    #[serde(default)]
    pub institution_scoped: bool,
}

impl ApiRequest {
    /// Creates a request without a body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            institution_scoped: false,
        }
    }

    /// `GET {path}`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST {path}` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Post, path).with_json(body)
    }

    /// `PUT {path}` with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Put, path).with_json(body)
    }

    /// `PATCH {path}` with a JSON body.
    #[must_use]
    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_json(body)
    }

    /// `DELETE {path}`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a caller header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Marks the endpoint as institution-scoped.
    #[must_use]
    pub const fn institution_scoped(mut self) -> Self {
        self.institution_scoped = true;
        self
    }

    /// Checks the caller input before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns an error for absolute or whitespace-containing paths, malformed
    /// header names or values, and attempts to set the `Authorization` header.
    pub fn validate(&self) -> DomainResult<()> {
        if self.path.contains("://") || self.path.starts_with("//") {
            return Err(DomainError::InvalidPath(format!(
                "{} is not relative to the service base URL",
                self.path
            )));
        }
        if self.path.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPath(self.path.clone()));
        }

        for (name, value) in &self.headers {
            if !headers::is_valid_name(name) {
                return Err(DomainError::InvalidHeaderName(name.clone()));
            }
            if name.eq_ignore_ascii_case(headers::AUTHORIZATION) {
                return Err(DomainError::InvalidHeaderName(format!(
                    "{name} is managed by the client"
                )));
            }
            if !headers::is_valid_value(value) {
                return Err(DomainError::InvalidHeaderValue(name.clone()));
            }
        }

        Ok(())
    }

    /// Resolves the path against a service base URL.
    ///
    /// The base path is kept: `http://host/api/v1/users` + `/42` gives
    /// `http://host/api/v1/users/42`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the result does not parse.
    pub fn url(&self, base: &Url) -> DomainResult<Url> {
        let base = base.as_str().trim_end_matches('/');
        let path = self.path.as_str();
        let joined = if path.is_empty() || path.starts_with('?') || path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))
    }
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: Url,
    /// Headers in sending order.
    pub headers: Vec<(String, String)>,
    /// Serialized body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
