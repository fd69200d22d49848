use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `ocikit-api` crate.
///
/// Covers every failure mode of a single operation call: client-side
/// validation (raised before any network I/O), transport, and structured
/// service errors. `ocikit-core` wraps these with partial results when a
/// composite operation fails after its mutation succeeded.
#[derive(Debug, Error)]
pub enum Error {
    // ── Client-side validation ──────────────────────────────────────
    /// A required path or query parameter was empty.
    #[error("{operation}: required parameter '{parameter}' must not be blank")]
    MissingParameter {
        operation: &'static str,
        parameter: &'static str,
    },

    /// A caller-supplied enum value is not one the service accepts.
    #[error("invalid value '{value}' for {parameter}, expected one of: {allowed}")]
    InvalidEnumValue {
        parameter: &'static str,
        value: String,
        allowed: String,
    },

    // ── Authentication ──────────────────────────────────────────────
    /// The request signer could not sign the outgoing request.
    #[error("Request signing failed: {message}")]
    Signing { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value could not be encoded.
    #[error("Invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Structured error returned by the service (non-2xx response).
    #[error("Service error (HTTP {status}, {}): {message}", .code.as_deref().unwrap_or("unknown"))]
    Service {
        status: u16,
        code: Option<String>,
        message: String,
        opc_request_id: Option<String>,
        /// Server-requested delay before retrying, from `retry-after`.
        retry_after: Option<Duration>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A response lacked a header the operation depends on.
    #[error("{operation}: response is missing the '{header}' header")]
    MissingResponseHeader {
        operation: &'static str,
        header: &'static str,
    },
}

impl Error {
    /// HTTP status of a service error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the error was raised before any request was sent.
    pub fn is_client_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::InvalidEnumValue { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Connection and timeout failures, throttling (429), server errors
    /// other than 501, and 409 `IncorrectState` conflicts are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Service { status, code, .. } => match *status {
                409 => code.as_deref() == Some("IncorrectState"),
                429 => true,
                501 => false,
                s => s >= 500,
            },
            _ => false,
        }
    }

    /// Extract the service error code, if available.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The `opc-request-id` of the failed call, for support tickets.
    pub fn opc_request_id(&self) -> Option<&str> {
        match self {
            Self::Service { opc_request_id, .. } => opc_request_id.as_deref(),
            _ => None,
        }
    }

    /// Delay the service asked for through `retry-after`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Service { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(status: u16, code: Option<&str>) -> Error {
        Error::Service {
            status,
            code: code.map(str::to_owned),
            message: "boom".into(),
            opc_request_id: Some("req-1".into()),
            retry_after: None,
        }
    }

    #[test]
    fn transient_classification() {
        assert!(service(429, Some("TooManyRequests")).is_transient());
        assert!(service(500, None).is_transient());
        assert!(service(503, None).is_transient());
        assert!(service(409, Some("IncorrectState")).is_transient());
        assert!(!service(409, Some("Conflict")).is_transient());
        assert!(!service(501, None).is_transient());
        assert!(!service(404, Some("NotAuthorizedOrNotFound")).is_transient());
    }

    #[test]
    fn not_found_and_request_id() {
        let err = service(404, Some("NotAuthorizedOrNotFound"));
        assert!(err.is_not_found());
        assert_eq!(err.opc_request_id(), Some("req-1"));
        assert_eq!(err.service_code(), Some("NotAuthorizedOrNotFound"));
    }

    #[test]
    fn validation_errors_are_flagged() {
        let err = Error::MissingParameter {
            operation: "get_stack",
            parameter: "stack_id",
        };
        assert!(err.is_client_validation());
        assert_eq!(
            err.to_string(),
            "get_stack: required parameter 'stack_id' must not be blank"
        );
    }
}
