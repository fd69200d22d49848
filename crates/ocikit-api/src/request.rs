// Per-call options, query assembly, and the response envelope shared by
// every operation.

use std::time::Duration;

use reqwest::header::{ETAG, HeaderMap, RETRY_AFTER};
use strum::VariantNames;

use crate::enums::validate_enum;
use crate::error::Error;
use crate::retry::SharedRetryPolicy;

pub(crate) const OPC_REQUEST_ID: &str = "opc-request-id";
pub(crate) const OPC_RETRY_TOKEN: &str = "opc-retry-token";
pub(crate) const OPC_NEXT_PAGE: &str = "opc-next-page";
pub(crate) const OPC_WORK_REQUEST_ID: &str = "opc-work-request-id";
pub(crate) const IF_MATCH: &str = "if-match";
pub(crate) const IF_NONE_MATCH: &str = "if-none-match";

// ── Options bag ──────────────────────────────────────────────────────

/// Optional headers and overrides accepted by every operation.
///
/// Operations ignore the fields their API does not define (e.g. `if_match`
/// on a create).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Correlation id echoed back by the service; generated when absent.
    pub opc_request_id: Option<String>,
    /// Idempotency token for mutations that are unsafe to repeat.
    pub opc_retry_token: Option<String>,
    /// Only act if the resource's current etag matches.
    pub if_match: Option<String>,
    /// Only return the resource if its etag differs (GET only).
    pub if_none_match: Option<String>,
    /// Overrides the client's retry policy for this call.
    pub retry_policy: Option<SharedRetryPolicy>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.opc_request_id = Some(id.into());
        self
    }

    pub fn with_retry_token(mut self, token: impl Into<String>) -> Self {
        self.opc_retry_token = Some(token.into());
        self
    }

    pub fn with_if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }

    pub fn with_if_none_match(mut self, etag: impl Into<String>) -> Self {
        self.if_none_match = Some(etag.into());
        self
    }

    pub fn with_retry_policy(mut self, policy: SharedRetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }
}

// ── Response envelope ────────────────────────────────────────────────

/// Headers the SDK surfaces from every response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub opc_request_id: Option<String>,
    /// Cursor for the next page of a list operation; `None` on the last page.
    pub opc_next_page: Option<String>,
    /// Work request tracking an asynchronous mutation.
    pub opc_work_request_id: Option<String>,
    pub etag: Option<String>,
    pub retry_after: Option<Duration>,
}

impl ResponseHeaders {
    pub(crate) fn from_header_map(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        Self {
            opc_request_id: get(OPC_REQUEST_ID),
            opc_next_page: get(OPC_NEXT_PAGE),
            opc_work_request_id: get(OPC_WORK_REQUEST_ID),
            etag: headers
                .get(ETAG)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
            retry_after: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }
}

/// A typed response body together with its headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub headers: ResponseHeaders,
}

impl<T> ApiResponse<T> {
    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            headers: self.headers,
        }
    }

    /// The work request id, or an error naming the operation that should
    /// have returned one.
    pub fn work_request_id(&self, operation: &'static str) -> Result<&str, Error> {
        self.headers
            .opc_work_request_id
            .as_deref()
            .ok_or(Error::MissingResponseHeader {
                operation,
                header: OPC_WORK_REQUEST_ID,
            })
    }

    pub fn next_page(&self) -> Option<&str> {
        self.headers.opc_next_page.as_deref()
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Fail fast on a blank required parameter, before any I/O.
pub(crate) fn require<'a>(
    operation: &'static str,
    parameter: &'static str,
    value: &'a str,
) -> Result<&'a str, Error> {
    if value.trim().is_empty() {
        return Err(Error::MissingParameter {
            operation,
            parameter,
        });
    }
    Ok(value)
}

// ── Query assembly ───────────────────────────────────────────────────

/// Ordered query parameters; `None` values are skipped.
#[derive(Debug, Default)]
pub(crate) struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    pub(crate) fn push_opt<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(name, v),
            None => self,
        }
    }

    /// Validate and push an optional enum parameter.
    pub(crate) fn push_enum<E>(mut self, name: &'static str, value: Option<&E>) -> Result<Self, Error>
    where
        E: AsRef<str> + VariantNames,
    {
        if let Some(v) = value {
            let wire = validate_enum(name, v)?;
            self.params.push((name, wire));
        }
        Ok(self)
    }

    pub(crate) fn as_slice(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

/// Cursor + page size shared by every list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum items per page.
    pub limit: Option<u32>,
    /// Opaque cursor from a previous response's `opc-next-page`.
    pub page: Option<String>,
}

impl Query {
    pub(crate) fn paginate(self, pagination: &Pagination) -> Self {
        self.push_opt("limit", pagination.limit)
            .push_opt("page", pagination.page.as_deref())
    }
}
