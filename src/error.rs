//! Error kinds reported by the router, the params accessor and handlers.
//!
//! Every kind is a deterministic function of the request shape or the route
//! table; none of them is worth retrying. The router never decides a status
//! code itself: [`crate::server::response::status_for`] maps each kind to one
//! at the transport boundary.

use http::{Method, StatusCode};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while routing a request or reading its params.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No registered path matches the request path.
    #[error("no route matches the request path")]
    RouteNotFound,

    /// The path matched a route, but not for the requested method.
    #[error("method not allowed for this route")]
    MethodNotAllowed,

    /// The same `(method, path)` pair was registered twice.
    #[error("path {path} is duplicated for method {method}")]
    DuplicateRoute {
        /// Method of the rejected registration
        method: Method,
        /// Full path as passed to registration
        path: String,
    },

    /// Only GET, POST, PUT, DELETE and PATCH can carry handlers.
    #[error("method {0} cannot be registered")]
    UnsupportedMethod(Method),

    /// The accessor wraps a value of a different kind than the operation needs.
    #[error("expected {expected}, found {found}")]
    InvalidType {
        /// Kind the operation accepts
        expected: &'static str,
        /// Kind actually held by the accessor
        found: &'static str,
    },

    /// Array index outside `0..len`.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the array
        len: usize,
    },

    /// A string could not be parsed by a coercing numeric getter.
    #[error("string {value:?} cannot be converted to {target}")]
    InvalidNumericString {
        /// The offending string
        value: String,
        /// Numeric target type name
        target: &'static str,
    },

    /// An HTTP error raised by a handler.
    #[error("{status}: {message}")]
    Http {
        /// Status the transport should answer with
        status: StatusCode,
        /// Message placed in the response body
        message: String,
    },
}

impl Error {
    /// Build a handler-raised error with an arbitrary status.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::http(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::http(StatusCode::UNAUTHORIZED, message)
    }

    /// 402 Payment Required
    pub fn payment_required(message: impl Into<String>) -> Self {
        Self::http(StatusCode::PAYMENT_REQUIRED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::http(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found raised by a handler (for example a missing entity).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(StatusCode::NOT_FOUND, message)
    }

    /// 405 Method Not Allowed raised by a handler.
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::http(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// 408 Request Timeout
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::http(StatusCode::REQUEST_TIMEOUT, message)
    }

    /// 422 Unprocessable Entity
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::http(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::http(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// True for the kinds produced by the params accessor.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidType { .. }
                | Error::IndexOutOfRange { .. }
                | Error::InvalidNumericString { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_route_names_the_path() {
        let err = Error::DuplicateRoute {
            method: Method::GET,
            path: "/users/:id".to_string(),
        };
        assert_eq!(err.to_string(), "path /users/:id is duplicated for method GET");
    }

    #[test]
    fn test_http_constructors_carry_status() {
        match Error::forbidden("nope") {
            Error::Http { status, message } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            Error::timed_out("slow"),
            Error::Http { status: StatusCode::REQUEST_TIMEOUT, .. }
        ));
    }

    #[test]
    fn test_is_type_error() {
        assert!(Error::IndexOutOfRange { index: 3, len: 1 }.is_type_error());
        assert!(!Error::RouteNotFound.is_type_error());
    }
}
