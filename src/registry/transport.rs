//! HTTP transport behind every API call
//!
//! The client only talks to the [`Transport`] trait. [`HttpTransport`] is the
//! default, built on `reqwest` with an optional retry layer from
//! `reqwest-retry`; tests and embedders can substitute their own.

use crate::error::{RegistryError, Result};
use crate::registry::request::ServiceRequest;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use tracing::trace;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const MIN_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Sends one fully built request and returns whatever the service answered.
///
/// Implementations return non-2xx responses as ordinary [`RawResponse`]s;
/// mapping them to errors is the client's job. `Err` is reserved for
/// failures to get a response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ServiceRequest) -> Result<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response.headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        response
    }

    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Vec::new())
    }
}

/// Exponential backoff on transient failures (connection errors, 429, 5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Upper bound for the wait between two attempts.
    pub max_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            max_interval: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    fn policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .retry_bounds(MIN_RETRY_INTERVAL.min(self.max_interval), self.max_interval)
            .build_with_max_retries(self.max_retries)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    disable_ssl: bool,
}

impl HttpTransportBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retry: Option<RetryConfig>) -> Self {
        self.retry = retry;
        self
    }

    /// Skip certificate and hostname verification.
    pub fn with_disable_ssl(mut self, disable_ssl: bool) -> Self {
        self.disable_ssl = disable_ssl;
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if self.disable_ssl {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let client = match self.retry {
            Some(retry) => ClientBuilder::new(client)
                .with(RetryTransientMiddleware::new_with_policy(retry.policy()))
                .build(),
            None => ClientBuilder::new(client).build(),
        };

        Ok(HttpTransport {
            client,
            retry: self.retry,
        })
    }
}

/// Default [`Transport`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
    retry: Option<RetryConfig>,
}

impl HttpTransport {
    /// Transport with the default timeout and retries disabled.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn retry(&self) -> Option<RetryConfig> {
        self.retry
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ServiceRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        trace!(
            operation = request.operation_id,
            %status,
            bytes = body.len(),
            "received response body"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_disabled_by_default() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.retry(), None);
    }

    #[test]
    fn test_retry_settings_are_kept() {
        let retry = RetryConfig {
            max_retries: 2,
            max_interval: Duration::from_millis(10),
        };
        let transport = HttpTransport::builder()
            .with_retries(Some(retry))
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(transport.retry(), Some(retry));
    }

    #[test]
    fn test_raw_json_response() {
        let response = RawResponse::json(StatusCode::OK, &serde_json::json!({"plan": "Standard"}));
        assert_eq!(response.body, br#"{"plan":"Standard"}"#.to_vec());
        assert_eq!(response.headers["content-type"], "application/json");
    }
}
