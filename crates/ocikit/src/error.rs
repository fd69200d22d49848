//! CLI error types with miette diagnostics.
//!
//! Maps SDK, waiter, and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ocikit_config::ConfigError;
use ocikit_core::{CompositeError, WaitError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const WAIT_FAILED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the service")]
    #[diagnostic(
        code(ocikit::connection_failed),
        help(
            "Check the region, endpoint, and proxy settings of your profile.\n\
             Run with -vv to see each request."
        )
    )]
    ConnectionFailed {
        #[source]
        source: ocikit_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Request was not authorized (HTTP {status})")]
    #[diagnostic(
        code(ocikit::auth_failed),
        help(
            "Verify the auth token of profile '{profile}'.\n\
             Run: ocikit config set-token --profile {profile}"
        )
    )]
    AuthFailed {
        status: u16,
        profile: String,
        request_id: Option<String>,
    },

    #[error("No auth token configured for profile '{profile}'")]
    #[diagnostic(
        code(ocikit::no_credentials),
        help(
            "Configure credentials with: ocikit config init\n\
             Or set the OCIKIT_AUTH_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(
        code(ocikit::not_found),
        help("The resource does not exist, or the token may not see it.")
    )]
    NotFound {
        message: String,
        request_id: Option<String>,
    },

    #[error("Conflict ({code}): {message}")]
    #[diagnostic(
        code(ocikit::conflict),
        help("The resource changed or is busy. Retry once its work request completes.")
    )]
    Conflict {
        code: String,
        message: String,
        request_id: Option<String>,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(ocikit::api_error))]
    ApiError {
        code: String,
        message: String,
        request_id: Option<String>,
    },

    // ── Waiting ──────────────────────────────────────────────────────
    #[error("Timed out waiting: {source}")]
    #[diagnostic(
        code(ocikit::wait_timeout),
        help(
            "The operation was accepted and may still complete.\n\
             Raise --max-wait-seconds or check its work request later."
        )
    )]
    WaitTimedOut {
        #[source]
        source: WaitError,
    },

    #[error("Operation accepted but not confirmed: {source}")]
    #[diagnostic(code(ocikit::wait_failed))]
    WaitFailed {
        #[source]
        source: WaitError,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ocikit::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ocikit::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ocikit config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No region or endpoint configured")]
    #[diagnostic(
        code(ocikit::no_config),
        help(
            "Create a profile with: ocikit config init\n\
             Or pass --region / --endpoint. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ocikit::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ocikit::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ocikit::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::WaitTimedOut { .. } => exit_code::TIMEOUT,
            Self::WaitFailed { .. } => exit_code::WAIT_FAILED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// The service's `opc-request-id` for the failed call, if one is known.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::AuthFailed { request_id, .. }
            | Self::NotFound { request_id, .. }
            | Self::Conflict { request_id, .. }
            | Self::ApiError { request_id, .. } => request_id.as_deref(),
            Self::ConnectionFailed { source } => source.opc_request_id(),
            _ => None,
        }
    }
}

// ── SDK error mapping ────────────────────────────────────────────────

impl From<ocikit_api::Error> for CliError {
    fn from(err: ocikit_api::Error) -> Self {
        use ocikit_api::Error as ApiErr;

        match err {
            ApiErr::MissingParameter { .. } | ApiErr::InvalidEnumValue { .. } => {
                CliError::Validation {
                    field: "input".into(),
                    reason: err.to_string(),
                }
            }

            ApiErr::Service {
                status: status @ (401 | 403),
                opc_request_id,
                ..
            } => CliError::AuthFailed {
                status,
                profile: "current".into(),
                request_id: opc_request_id,
            },

            ApiErr::Service {
                status: 404,
                message,
                opc_request_id,
                ..
            } => CliError::NotFound {
                message,
                request_id: opc_request_id,
            },

            ApiErr::Service {
                status: 409 | 412,
                code,
                message,
                opc_request_id,
                ..
            } => CliError::Conflict {
                code: code.unwrap_or_default(),
                message,
                request_id: opc_request_id,
            },

            ApiErr::Service {
                code,
                message,
                opc_request_id,
                ..
            } => CliError::ApiError {
                code: code.unwrap_or_else(|| "unknown".into()),
                message,
                request_id: opc_request_id,
            },

            ApiErr::Transport(_) | ApiErr::Tls(_) => CliError::ConnectionFailed { source: err },

            other => CliError::ApiError {
                code: "client".into(),
                message: other.to_string(),
                request_id: None,
            },
        }
    }
}

impl From<WaitError> for CliError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::TimedOut { .. } => CliError::WaitTimedOut { source: err },
            WaitError::Poll { source, .. } => source.into(),
            other => CliError::WaitFailed { source: other },
        }
    }
}

impl<T> From<CompositeError<T>> for CliError {
    fn from(err: CompositeError<T>) -> Self {
        match err {
            CompositeError::Operation(e) => e.into(),
            CompositeError::Wait { source, .. } => source.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn service(status: u16, code: &str) -> ocikit_api::Error {
        ocikit_api::Error::Service {
            status,
            code: Some(code.into()),
            message: "boom".into(),
            opc_request_id: Some("req-1".into()),
            retry_after: None,
        }
    }

    #[test]
    fn service_errors_map_to_exit_codes() {
        assert_eq!(
            CliError::from(service(404, "NotAuthorizedOrNotFound")).exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(service(401, "NotAuthenticated")).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(service(409, "Conflict")).exit_code(),
            exit_code::CONFLICT
        );
        assert_eq!(
            CliError::from(service(500, "InternalError")).exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn client_validation_is_a_usage_error() {
        let err = ocikit_api::Error::MissingParameter {
            operation: "get_stack",
            parameter: "stack_id",
        };
        assert_eq!(CliError::from(err).exit_code(), exit_code::USAGE);
    }

    #[test]
    fn wait_errors_keep_their_kind() {
        let timed_out = WaitError::TimedOut {
            resource: "work request wr-1".into(),
            elapsed: Duration::from_secs(60),
            last_state: Some("IN_PROGRESS".into()),
        };
        assert_eq!(CliError::from(timed_out).exit_code(), exit_code::TIMEOUT);

        let terminal = CompositeError::Wait {
            partial: (),
            source: WaitError::TerminalState {
                resource: "job j-1".into(),
                state: "FAILED".into(),
            },
        };
        assert_eq!(CliError::from(terminal).exit_code(), exit_code::WAIT_FAILED);

        let poll = WaitError::Poll {
            resource: "stack s-1".into(),
            source: service(404, "NotAuthorizedOrNotFound"),
        };
        assert_eq!(CliError::from(poll).exit_code(), exit_code::NOT_FOUND);
    }
}
