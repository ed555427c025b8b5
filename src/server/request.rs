use http::{Method, StatusCode};
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::handler::HeaderVec;

/// Transport-level view of an incoming request, before body decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub method: Method,
    /// Request path with the query string removed
    pub path: String,
    /// Raw query string without the leading `?`, if any
    pub query: Option<String>,
    /// Headers with lowercase names, in arrival order
    pub headers: HeaderVec,
    pub body: Vec<u8>,
}

impl ParsedRequest {
    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Split a request target into path and query string.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Read everything the router needs out of a `may_minihttp::Request`.
///
/// # Errors
///
/// - `400` for a method token `http` cannot parse or an unreadable body
/// - `413` when the body, announced or actual, exceeds `max_body_bytes`
pub fn parse_request(req: Request, max_body_bytes: usize) -> Result<ParsedRequest> {
    let method = Method::from_bytes(req.method().as_bytes())
        .map_err(|_| Error::bad_request(format!("invalid method: {}", req.method())))?;
    let (path, query) = split_target(req.path());
    let path = path.to_string();
    let query = query.map(str::to_string);

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::<str>::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let announced = headers
        .iter()
        .find(|(k, _)| k.as_ref() == "content-length")
        .and_then(|(_, v)| v.trim().parse::<usize>().ok());
    if let Some(len) = announced {
        if len > max_body_bytes {
            warn!(
                method = %method,
                path = %path,
                content_length = len,
                max_body_bytes = max_body_bytes,
                "Request body too large"
            );
            return Err(payload_too_large(max_body_bytes));
        }
    }

    let mut body = Vec::new();
    let limit = u64::try_from(max_body_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    req.body()
        .take(limit)
        .read_to_end(&mut body)
        .map_err(|err| Error::bad_request(format!("failed to read request body: {err}")))?;
    if body.len() > max_body_bytes {
        warn!(
            method = %method,
            path = %path,
            max_body_bytes = max_body_bytes,
            "Request body too large"
        );
        return Err(payload_too_large(max_body_bytes));
    }

    debug!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    Ok(ParsedRequest {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn payload_too_large(limit: usize) -> Error {
    Error::http(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("request body exceeds {limit} bytes"),
    )
}
