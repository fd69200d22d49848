// Shared HTTP core for the per-service clients.
//
// Builds one request per attempt (path segments, query, headers, JSON body),
// signs it, sends it, and applies the retry policy. The service clients only
// describe *what* to call; everything on the wire happens here.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{NoopSigner, SharedSigner};
use crate::error::Error;
use crate::region::{Region, Service};
use crate::request::{
    ApiResponse, IF_MATCH, IF_NONE_MATCH, OPC_REQUEST_ID, OPC_RETRY_TOKEN, Query,
    RequestOptions, ResponseHeaders,
};
use crate::retry::{NoRetry, SharedRetryPolicy};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client configuration ─────────────────────────────────────────────

/// Everything a service client needs to talk to one endpoint.
///
/// Passed explicitly to each client constructor; there is no process-wide
/// default configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service endpoint without the API version (e.g. `https://iaas.us-ashburn-1.oraclecloud.com`).
    pub endpoint: Url,
    pub signer: SharedSigner,
    pub retry_policy: SharedRetryPolicy,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            signer: Arc::new(NoopSigner),
            retry_policy: Arc::new(NoRetry),
            transport: TransportConfig::default(),
        }
    }

    /// Resolve the endpoint of `service` in `region`.
    pub fn for_region(region: &Region, service: Service) -> Result<Self, Error> {
        Ok(Self::new(region.endpoint(service)?))
    }

    pub fn with_signer(mut self, signer: SharedSigner) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_retry_policy(mut self, policy: SharedRetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

// ── Call description ─────────────────────────────────────────────────

/// One operation invocation, independent of the attempt number.
pub(crate) struct Call<'a> {
    operation: &'static str,
    method: Method,
    segments: Vec<&'a str>,
    query: Query,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
    retry_token: bool,
}

impl<'a> Call<'a> {
    fn new(operation: &'static str, method: Method, segments: Vec<&'a str>) -> Self {
        Self {
            operation,
            method,
            segments,
            query: Query::new(),
            body: None,
            headers: HeaderMap::new(),
            retry_token: false,
        }
    }

    pub(crate) fn get(operation: &'static str, segments: Vec<&'a str>) -> Self {
        Self::new(operation, Method::GET, segments)
    }

    pub(crate) fn post(operation: &'static str, segments: Vec<&'a str>) -> Self {
        Self::new(operation, Method::POST, segments)
    }

    pub(crate) fn put(operation: &'static str, segments: Vec<&'a str>) -> Self {
        Self::new(operation, Method::PUT, segments)
    }

    pub(crate) fn delete(operation: &'static str, segments: Vec<&'a str>) -> Self {
        Self::new(operation, Method::DELETE, segments)
    }

    pub(crate) fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(body).map_err(|e| Error::Deserialization {
            message: format!("{}: failed to encode request body: {e}", self.operation),
            body: String::new(),
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Send `if-match` from the options, if set.
    pub(crate) fn if_match(self, options: &RequestOptions) -> Result<Self, Error> {
        self.header_opt(IF_MATCH, options.if_match.as_deref())
    }

    /// Send `if-none-match` from the options, if set.
    pub(crate) fn if_none_match(self, options: &RequestOptions) -> Result<Self, Error> {
        self.header_opt(IF_NONE_MATCH, options.if_none_match.as_deref())
    }

    /// Mark the operation as accepting an `opc-retry-token`.
    pub(crate) fn retry_token(mut self, options: &RequestOptions) -> Result<Self, Error> {
        self.retry_token = true;
        self.header_opt(OPC_RETRY_TOKEN, options.opc_retry_token.as_deref())
    }

    fn header_opt(mut self, name: &'static str, value: Option<&str>) -> Result<Self, Error> {
        if let Some(value) = value {
            let value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
                name,
                reason: e.to_string(),
            })?;
            self.headers.insert(HeaderName::from_static(name), value);
        }
        Ok(self)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// HTTP core shared by `LoadBalancerClient` and `ResourceManagerClient`.
#[derive(Debug, Clone)]
pub(crate) struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
    signer: SharedSigner,
    retry_policy: SharedRetryPolicy,
}

impl ServiceClient {
    pub(crate) fn new(config: &ClientConfig, api_version: &str) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Self::with_http(config, api_version, http)
    }

    pub(crate) fn with_http(
        config: &ClientConfig,
        api_version: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::versioned_base(&config.endpoint, api_version)?,
            signer: Arc::clone(&config.signer),
            retry_policy: Arc::clone(&config.retry_policy),
        })
    }

    /// `https://host[/prefix]` + `/<api_version>`.
    fn versioned_base(endpoint: &Url, api_version: &str) -> Result<Url, Error> {
        let mut url = endpoint.clone();
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/{api_version}"));
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(url)
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments onto the versioned base.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build(
        &self,
        call: &Call<'_>,
        request_id: &str,
        retry_token: Option<&str>,
    ) -> Result<reqwest::Request, Error> {
        let url = self.url(&call.segments)?;
        let mut builder = self
            .http
            .request(call.method.clone(), url)
            .query(call.query.as_slice())
            .headers(call.headers.clone())
            .header(ACCEPT, "application/json")
            .header(OPC_REQUEST_ID, request_id);

        if let Some(token) = retry_token {
            builder = builder.header(OPC_RETRY_TOKEN, token);
        }
        if let Some(ref body) = call.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        Ok(builder.build()?)
    }

    /// Send a call, retrying per policy; returns the first successful response.
    pub(crate) async fn execute(
        &self,
        call: Call<'_>,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, Error> {
        let policy = options
            .retry_policy
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.retry_policy));

        let request_id = options
            .opc_request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string().to_uppercase());

        // A caller-supplied token is already in `call.headers`; otherwise
        // generate one so retried mutations are not applied twice.
        let generated_token = (call.retry_token
            && options.opc_retry_token.is_none()
            && policy.is_enabled())
        .then(|| Uuid::new_v4().simple().to_string());

        let started = tokio::time::Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let mut request = self.build(&call, &request_id, generated_token.as_deref())?;
            self.signer.sign(&mut request)?;
            debug!(
                operation = call.operation,
                attempt,
                "{} {}",
                request.method(),
                request.url()
            );

            let err = match self.http.execute(request).await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => parse_error(resp).await,
                Err(e) => Error::Transport(e),
            };

            match policy.retry_delay(attempt, started.elapsed(), &err) {
                Some(delay) => {
                    warn!(
                        operation = call.operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(err),
            }
        }
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        call: Call<'_>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<T>, Error> {
        let resp = self.execute(call, options).await?;
        let headers = ResponseHeaders::from_header_map(resp.headers());
        let body = resp.text().await?;
        let data = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })?;
        Ok(ApiResponse { data, headers })
    }

    pub(crate) async fn empty(
        &self,
        call: Call<'_>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        let resp = self.execute(call, options).await?;
        Ok(ApiResponse {
            data: (),
            headers: ResponseHeaders::from_header_map(resp.headers()),
        })
    }

    pub(crate) async fn bytes(
        &self,
        call: Call<'_>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Bytes>, Error> {
        let resp = self.execute(call, options).await?;
        let headers = ResponseHeaders::from_header_map(resp.headers());
        let data = resp.bytes().await?;
        Ok(ApiResponse { data, headers })
    }

    pub(crate) async fn text(
        &self,
        call: Call<'_>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<String>, Error> {
        let resp = self.execute(call, options).await?;
        let headers = ResponseHeaders::from_header_map(resp.headers());
        let data = resp.text().await?;
        Ok(ApiResponse { data, headers })
    }
}

async fn parse_error(resp: reqwest::Response) -> Error {
    let status = resp.status();
    let ResponseHeaders {
        opc_request_id,
        retry_after,
        ..
    } = ResponseHeaders::from_header_map(resp.headers());

    let raw = resp.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
        Error::Service {
            status: status.as_u16(),
            code: err.code,
            message: err.message.unwrap_or_else(|| status.to_string()),
            opc_request_id,
            retry_after,
        }
    } else {
        Error::Service {
            status: status.as_u16(),
            code: None,
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            opc_request_id,
            retry_after,
        }
    }
}
