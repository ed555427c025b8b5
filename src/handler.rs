//! Handler surface: what a route runs and what it hands back.
//!
//! A handler is anything implementing [`Handler`]; plain closures of the shape
//! `Fn(&HandlerRequest) -> Result<HandlerResponse>` qualify automatically:
//!
//! ```
//! use segtrie::{HandlerRequest, HandlerResponse, Router};
//! use serde_json::json;
//!
//! let mut router = Router::new();
//! router.get("/users/:id", |req: &HandlerRequest| {
//!     let id = req.params.get("id")?.as_integer()?;
//!     Ok(HandlerResponse::json(200, json!({ "id": id })))
//! })?;
//! # Ok::<(), segtrie::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::params::Params;
use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses.
///
/// Header names are `Arc<str>` so that repeated names share one allocation.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Code run for a matched `(method, path)` pair.
pub trait Handler: Send + Sync + 'static {
    /// Handle a request whose path variables have already been injected into
    /// `req.params`.
    fn handle(&self, req: &HandlerRequest) -> Result<HandlerResponse>;
}

impl<F> Handler for F
where
    F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
{
    fn handle(&self, req: &HandlerRequest) -> Result<HandlerResponse> {
        self(req)
    }
}

/// One in-flight request as seen by the router and the handler.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers, names lowercased by the transport
    pub headers: HeaderVec,
    /// Decoded payload plus injected path variables
    pub params: Params,
}

impl HandlerRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, params: Params) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderVec::new(),
            params,
        }
    }

    /// Attach headers collected by the transport.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderVec) -> Self {
        self.headers = headers;
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of the `content-type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }
}

/// Response produced by a handler.
///
/// A string body is written as `text/plain`, anything else as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// Extra response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with the given status.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// 200 response carrying any serializable value as JSON.
    pub fn ok<T: Serialize>(data: &T) -> Result<Self> {
        let body = serde_json::to_value(data).map_err(|e| Error::internal(e.to_string()))?;
        Ok(Self::json(200, body))
    }

    /// Plain-text response.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain".to_string()));
        Self {
            status,
            headers,
            body: Value::String(body.into()),
        }
    }

    /// JSON error body `{"error": message}`.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Successful result of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A handler ran and produced a response.
    Handled(HandlerResponse),
    /// HEAD or OPTIONS on a matched path; no handler ran.
    Preflight,
}
