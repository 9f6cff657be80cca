//! SWIS client errors
//!
//! Every failure is a [`SwisError`]: a category ([`ErrorKind`]), the operation
//! that failed, and where available the endpoint, HTTP status and the
//! lower-level cause.

use std::fmt;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a [`SwisError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport or connectivity failure (retried), or a cancelled call
    Network,
    /// Credentials rejected (HTTP 401)
    Authentication,
    /// Authenticated but not allowed (HTTP 403)
    Permission,
    /// Malformed SWQL query
    Swql,
    /// Entity or endpoint does not exist (HTTP 404)
    NotFound,
    /// Bad input or configuration (HTTP 400 or local checks)
    Validation,
    /// Server-side failure (HTTP 5xx) or a local decode failure
    Internal,
}

impl ErrorKind {
    /// Classify an HTTP error status.
    ///
    /// Only the status code is consulted. Codes below 500 without a dedicated
    /// category fall back to [`ErrorKind::Network`].
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Permission,
            404 => Self::NotFound,
            400 => Self::Validation,
            s if s >= 500 => Self::Internal,
            _ => Self::Network,
        }
    }

    /// Stable lowercase label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::Permission => "permission",
            Self::Swql => "swql",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every SWIS client operation
#[derive(Debug, Error)]
#[error("swis {kind} error in {operation}{}: {message}", http_suffix(.status_code))]
pub struct SwisError {
    kind: ErrorKind,
    operation: String,
    endpoint: Option<String>,
    status_code: Option<u16>,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

fn http_suffix(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl SwisError {
    /// Create an error without an underlying cause
    pub fn new(kind: ErrorKind, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation: operation.into(),
            endpoint: None,
            status_code: None,
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap a lower-level error, keeping it reachable through `source()`
    pub fn wrap<E>(
        cause: E,
        kind: ErrorKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            cause: Some(cause.into()),
            ..Self::new(kind, operation, message)
        }
    }

    /// Build an error from an HTTP error response.
    ///
    /// The response body becomes the message.
    pub fn from_status(
        operation: impl Into<String>,
        endpoint: impl Into<String>,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Self {
        let code = status.as_u16();
        Self {
            endpoint: Some(endpoint.into()),
            status_code: Some(code),
            ..Self::new(ErrorKind::from_status(code), operation, body)
        }
    }

    /// Attach the endpoint the failing call targeted
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Error category
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether this error belongs to `kind`
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Label of the operation that failed (e.g. `"request"`, `"query"`)
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Endpoint of the failing call, if the failure happened on the wire
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// HTTP status, only set when the error came from an HTTP response
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Human readable message (the response body for HTTP errors)
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl PartialEq<ErrorKind> for SwisError {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authentication);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Permission);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Internal);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Internal);
        // Anything else at or above 400 is an uncategorised failure
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Network);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::Network);
    }

    #[test]
    fn test_from_status_carries_context() {
        let err = SwisError::from_status("request", "Query", StatusCode::FORBIDDEN, "denied");

        assert_eq!(err.kind(), ErrorKind::Permission);
        assert_eq!(err.operation(), "request");
        assert_eq!(err.endpoint(), Some("Query"));
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.message(), "denied");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_display_format() {
        let plain = SwisError::new(ErrorKind::Validation, "config", "host is required");
        assert_eq!(
            plain.to_string(),
            "swis validation error in config: host is required"
        );

        let http = SwisError::from_status("request", "Query", StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(
            http.to_string(),
            "swis authentication error in request (HTTP 401): nope"
        );
    }

    #[test]
    fn test_wrap_preserves_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SwisError::wrap(io, ErrorKind::Network, "request", "request failed after retries");

        assert!(err.is(ErrorKind::Network));
        assert!(err.status_code().is_none());
        let source = err.source().expect("cause should be kept");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn test_kind_comparison_ignores_message() {
        let a = SwisError::new(ErrorKind::NotFound, "read", "first");
        let b = SwisError::new(ErrorKind::NotFound, "delete", "second");

        assert_eq!(a.kind(), b.kind());
        assert!(a == ErrorKind::NotFound);
        assert!(b != ErrorKind::Internal);
    }
}
