// The ContainerRegistryClient holds the account context, base URL and
// collaborators shared by every API operation. The operations themselves
// live in the `operations` modules, grouped by API area.

use crate::config::ServiceConfig;
use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::region;
use crate::registry::auth::{Authenticator, NoAuthAuthenticator};
use crate::registry::request::{RequestBuilder, SERVICE_NAME};
use crate::registry::response::DetailedResponse;
use crate::registry::transport::{HttpTransport, RawResponse, RetryConfig, Transport};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

pub const DEFAULT_SERVICE_URL: &str = "https://us.icr.io";
pub const DEFAULT_SERVICE_NAME: &str = SERVICE_NAME;

pub struct ContainerRegistryClientBuilder {
    account: String,
    service_url: Option<String>,
    region: Option<String>,
    authenticator: Option<Arc<dyn Authenticator>>,
    transport: Option<Arc<dyn Transport>>,
    default_headers: Vec<(String, String)>,
    retry: Option<RetryConfig>,
    disable_ssl: bool,
}

impl ContainerRegistryClientBuilder {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            service_url: None,
            region: None,
            authenticator: None,
            transport: None,
            default_headers: Vec::new(),
            retry: None,
            disable_ssl: false,
        }
    }

    /// Base URL of the API. Takes precedence over [`with_region`](Self::with_region).
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_authenticator<A: Authenticator + 'static>(self, authenticator: A) -> Self {
        self.with_shared_authenticator(Arc::new(authenticator))
    }

    pub fn with_shared_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Replace the default HTTP transport. Retry and SSL settings only apply
    /// to the default transport.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Header sent with every request, overriding the SDK headers of the
    /// same name.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_retries(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_disable_ssl(mut self, disable_ssl: bool) -> Self {
        self.disable_ssl = disable_ssl;
        self
    }

    pub fn build(self) -> Result<ContainerRegistryClient> {
        if self.account.is_empty() {
            return Err(RegistryError::missing("account"));
        }

        let service_url = match (self.service_url, self.region) {
            (Some(url), _) => parse_service_url(&url)?,
            (None, Some(region)) => parse_service_url(region::service_url_for_region(&region)?)?,
            (None, None) => parse_service_url(DEFAULT_SERVICE_URL)?,
        };

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RegistryError::Configuration(format!("Invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                RegistryError::Configuration(format!("Invalid value for header {}", name))
            })?;
            default_headers.insert(header_name, header_value);
        }

        let transport = match self.transport {
            Some(transport) => {
                if self.retry.is_some() {
                    warn!("Retry settings are ignored when a custom transport is supplied");
                }
                transport
            }
            None => Arc::new(
                HttpTransport::builder()
                    .with_retries(self.retry)
                    .with_disable_ssl(self.disable_ssl)
                    .build()?,
            ),
        };

        let authenticator = self
            .authenticator
            .unwrap_or_else(|| Arc::new(NoAuthAuthenticator));

        debug!(
            "Created container registry client for {} using {} authentication",
            service_url,
            authenticator.authentication_type()
        );

        Ok(ContainerRegistryClient {
            account: self.account,
            service_url,
            default_headers,
            call_headers: HeaderMap::new(),
            authenticator,
            transport,
        })
    }
}

/// Client for the container registry management API.
///
/// Cheap to clone; clones share the transport and authenticator. The account
/// is fixed at construction and the base URL only changes through
/// [`with_service_url`](Self::with_service_url), which returns a new client.
#[derive(Clone)]
pub struct ContainerRegistryClient {
    account: String,
    service_url: Url,
    default_headers: HeaderMap,
    /// Headers set through [`with_headers`](Self::with_headers).
    call_headers: HeaderMap,
    authenticator: Arc<dyn Authenticator>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ContainerRegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRegistryClient")
            .field("account", &self.account)
            .field("service_url", &self.service_url.as_str())
            .field("authentication", &self.authenticator.authentication_type())
            .finish_non_exhaustive()
    }
}

impl ContainerRegistryClient {
    pub fn builder(account: impl Into<String>) -> ContainerRegistryClientBuilder {
        ContainerRegistryClientBuilder::new(account)
    }

    /// Client configured from the `CONTAINER_REGISTRY_*` external properties.
    pub fn new_instance(account: impl Into<String>) -> Result<Self> {
        Self::new_instance_with_service_name(account, DEFAULT_SERVICE_NAME)
    }

    pub fn new_instance_with_service_name(
        account: impl Into<String>,
        service_name: &str,
    ) -> Result<Self> {
        let config = ServiceConfig::load(service_name)?;
        Self::from_config(account, &config)
    }

    pub fn from_config(account: impl Into<String>, config: &ServiceConfig) -> Result<Self> {
        let mut builder = Self::builder(account)
            .with_shared_authenticator(config.authenticator()?)
            .with_disable_ssl(config.disable_ssl);
        if let Some(url) = &config.url {
            builder = builder.with_service_url(url.as_str());
        } else if let Some(region) = &config.region {
            builder = builder.with_region(region.as_str());
        }
        if let Some(retry) = config.retry_config() {
            builder = builder.with_retries(retry);
        }
        builder.build()
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    /// A client that targets `url`, sharing everything else with `self`.
    pub fn with_service_url(&self, url: &str) -> Result<Self> {
        let mut client = self.clone();
        client.service_url = parse_service_url(url)?;
        Ok(client)
    }

    pub fn with_region(&self, region: &str) -> Result<Self> {
        self.with_service_url(region::service_url_for_region(region)?)
    }

    /// A client whose calls also send `headers`, for one call or a few:
    ///
    /// ```no_run
    /// # use ibm_container_registry::ContainerRegistryClient;
    /// # use reqwest::header::{HeaderMap, HeaderValue};
    /// # async fn run(client: &ContainerRegistryClient) -> ibm_container_registry::Result<()> {
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-correlation-id", HeaderValue::from_static("deploy-42"));
    /// client.with_headers(headers).list_namespaces().await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// They replace client default headers and operation headers such as
    /// `X-Auth-Resource-Group`, but never `Accept`, `Content-Type` or the
    /// credentials. Headers already set this way are kept unless replaced.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        let mut client = self.clone();
        client.call_headers.extend(headers);
        client
    }

    /// Build, authenticate and send a request; non-2xx answers become
    /// [`RegistryError::Api`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<RawResponse> {
        let operation_id = request.operation_id();
        let mut request = request.call_headers(&self.call_headers).build(
            &self.service_url,
            &self.account,
            &self.default_headers,
        )?;
        self.authenticator.authenticate(&mut request.headers).await?;

        debug!(
            operation = operation_id,
            method = %request.method,
            url = %request.url,
            "sending request"
        );
        if let Some(body) = &request.body {
            trace!(operation = operation_id, body = %String::from_utf8_lossy(body), "request body");
        }

        let response = self.transport.send(request).await?;
        debug!(operation = operation_id, status = %response.status, "received response");

        if !response.status.is_success() {
            if response.status == StatusCode::UNAUTHORIZED {
                self.authenticator.invalidate().await;
            }
            let err = HttpErrorHandler::handle_api_error(response.status, &response.body);
            warn!(operation = operation_id, "{}", err);
            return Err(err);
        }
        Ok(response)
    }

    /// Send and decode the JSON body with `decode`. An empty body yields no
    /// result.
    pub(crate) async fn execute<T>(
        &self,
        request: RequestBuilder,
        decode: impl FnOnce(Value) -> Result<T>,
    ) -> Result<DetailedResponse<T>> {
        let response = self.send(request).await?;
        let result = if response.body.is_empty() {
            None
        } else {
            Some(decode(serde_json::from_slice(&response.body)?)?)
        };
        Ok(DetailedResponse {
            status: response.status,
            headers: response.headers,
            result,
        })
    }

    /// Send a request whose response carries nothing of interest.
    pub(crate) async fn execute_empty(&self, request: RequestBuilder) -> Result<DetailedResponse<()>> {
        let response = self.send(request).await?;
        Ok(DetailedResponse {
            status: response.status,
            headers: response.headers,
            result: None,
        })
    }
}

fn parse_service_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| RegistryError::Configuration(format!("Invalid service URL '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        _ => Err(RegistryError::Configuration(format!(
            "Service URL must be an http(s) URL with a host, got '{}'",
            url
        ))),
    }
}
