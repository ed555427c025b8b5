use http::StatusCode;
use may_minihttp::Response;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::warn;

use crate::error::Error;
use crate::handler::HandlerResponse;

/// Distinct handler-provided header lines kept for the life of the process.
const MAX_INTERNED_HEADERS: usize = 1024;

static HEADER_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

/// HTTP status for an error that escaped dispatch.
#[must_use]
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::RouteNotFound => StatusCode::NOT_FOUND,
        Error::MethodNotAllowed | Error::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
        Error::InvalidType { .. }
        | Error::IndexOutOfRange { .. }
        | Error::InvalidNumericString { .. } => StatusCode::BAD_REQUEST,
        Error::DuplicateRoute { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Http { status, .. } => *status,
    }
}

/// Message placed in the `{"error": ...}` body for `err`.
#[must_use]
pub fn error_message(err: &Error) -> String {
    match err {
        Error::Http { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// Default content type line and bytes for a handler body.
///
/// Strings go out verbatim as text unless the handler declared a JSON content
/// type; everything else is serialized as JSON.
pub(crate) fn encode_body(body: &Value, content_type: Option<&str>) -> (&'static str, Vec<u8>) {
    let declared_json = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .eq_ignore_ascii_case("application/json")
    });
    match body {
        Value::String(s) if !declared_json => ("Content-Type: text/plain", s.as_bytes().to_vec()),
        other => ("Content-Type: application/json", other.to_string().into_bytes()),
    }
}

pub fn write_handler_response(res: &mut Response, resp: HandlerResponse) {
    res.status_code(usize::from(resp.status), status_reason(resp.status));

    let (default_content_type, bytes) =
        encode_body(&resp.body, resp.get_header("content-type"));
    let mut has_content_type = false;
    for (name, value) in &resp.headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        let line = format!("{name}: {value}");
        match intern_header(line) {
            Some(line) => {
                has_content_type |= name.eq_ignore_ascii_case("content-type");
                res.header(line);
            }
            None => warn!(header = %name, "Dropping response header, intern table full"),
        }
    }
    if !has_content_type {
        res.header(default_content_type);
    }
    res.body_vec(bytes);
}

pub fn write_json_error(res: &mut Response, status: StatusCode, message: &str) {
    res.status_code(usize::from(status.as_u16()), status_reason(status.as_u16()));
    res.header("Content-Type: application/json");
    res.body_vec(serde_json::json!({ "error": message }).to_string().into_bytes());
}

/// Map `err` to its status and write the JSON error body.
pub fn write_error(res: &mut Response, err: &Error) {
    write_json_error(res, status_for(err), &error_message(err));
}

/// Empty `200` answer for HEAD and OPTIONS.
pub fn write_preflight(res: &mut Response) {
    res.status_code(200, "OK");
}

/// `may_minihttp` only takes `&'static str` header lines.
///
/// Each distinct line is leaked once and reused afterwards; once
/// `MAX_INTERNED_HEADERS` lines are stored, unseen lines are refused.
fn intern_header(line: String) -> Option<&'static str> {
    let table = HEADER_LINES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = table.get(line.as_str()) {
        return Some(*existing);
    }
    if table.len() >= MAX_INTERNED_HEADERS {
        return None;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    table.insert(leaked);
    Some(leaked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    #[test]
    fn test_status_for_every_kind() {
        let cases = [
            (Error::RouteNotFound, 404),
            (Error::MethodNotAllowed, 405),
            (Error::UnsupportedMethod(Method::HEAD), 405),
            (
                Error::DuplicateRoute {
                    method: Method::GET,
                    path: "/x".to_string(),
                },
                500,
            ),
            (
                Error::InvalidType {
                    expected: "string",
                    found: "long",
                },
                400,
            ),
            (Error::IndexOutOfRange { index: 3, len: 1 }, 400),
            (
                Error::InvalidNumericString {
                    value: "abc".to_string(),
                    target: "long",
                },
                400,
            ),
            (Error::bad_request("b"), 400),
            (Error::unauthorized("u"), 401),
            (Error::payment_required("p"), 402),
            (Error::forbidden("f"), 403),
            (Error::not_found("n"), 404),
            (Error::method_not_allowed("m"), 405),
            (Error::timed_out("t"), 408),
            (Error::unprocessable_entity("e"), 422),
            (Error::internal("i"), 500),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err).as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn test_error_message_uses_handler_text() {
        assert_eq!(error_message(&Error::forbidden("no access")), "no access");
        assert_eq!(
            error_message(&Error::RouteNotFound),
            "no route matches the request path"
        );
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(413), "Payload Too Large");
        assert_eq!(status_reason(599), "Unknown");
    }

    #[test]
    fn test_encode_body() {
        assert_eq!(
            encode_body(&json!("hello"), None),
            ("Content-Type: text/plain", b"hello".to_vec())
        );
        assert_eq!(
            encode_body(&json!({"a": 1}), Some("text/plain")),
            ("Content-Type: application/json", br#"{"a":1}"#.to_vec())
        );
        // A string declared as JSON is quoted
        assert_eq!(
            encode_body(&json!("1.2.0"), Some("application/json; charset=utf-8")),
            ("Content-Type: application/json", br#""1.2.0""#.to_vec())
        );
    }

    #[test]
    fn test_intern_header_reuses_lines() {
        let first = intern_header("X-Build: 42".to_string()).unwrap();
        let second = intern_header("X-Build: 42".to_string()).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
