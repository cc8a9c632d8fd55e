//! Authenticators that decorate outgoing requests with credentials

use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::registry::token_manager::{TokenInfo, TokenManager, TokenSource};
use crate::registry::transport::DEFAULT_TIMEOUT;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Adds credentials to the headers of a request before it is sent.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()>;

    /// Called when the service rejected the credentials with `401`.
    /// Authenticators holding cached credentials drop them here.
    async fn invalidate(&self) {}

    /// Short name used in logs and configuration (`iam`, `basic`, ...).
    fn authentication_type(&self) -> &'static str;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    async fn authenticate(&self, _headers: &mut HeaderMap) -> Result<()> {
        Ok(())
    }

    fn authentication_type(&self) -> &'static str {
        "noAuth"
    }
}

/// Sends a caller-supplied bearer token as is.
#[derive(Debug, Clone)]
pub struct BearerTokenAuthenticator {
    header: HeaderValue,
}

impl BearerTokenAuthenticator {
    pub fn new(token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(RegistryError::Auth("bearer token must be provided".to_string()));
        }
        Ok(Self {
            header: sensitive_header(&format!("Bearer {}", token))?,
        })
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }

    fn authentication_type(&self) -> &'static str {
        "bearerToken"
    }
}

/// HTTP basic authentication.
#[derive(Debug, Clone)]
pub struct BasicAuthenticator {
    header: HeaderValue,
}

impl BasicAuthenticator {
    pub fn new(username: &str, password: &str) -> Result<Self> {
        if username.is_empty() || password.is_empty() {
            return Err(RegistryError::Auth(
                "username and password must be provided".to_string(),
            ));
        }
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        Ok(Self {
            header: sensitive_header(&format!("Basic {}", encoded))?,
        })
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }

    fn authentication_type(&self) -> &'static str {
        "basic"
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

/// Exchanges an API key for access tokens at the IAM token endpoint.
#[derive(Clone)]
pub struct IamTokenSource {
    client: Client,
    url: String,
    apikey: String,
    client_credentials: Option<(String, String)>,
}

impl std::fmt::Debug for IamTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamTokenSource")
            .field("url", &self.url)
            .field("apikey", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for IamTokenSource {
    async fn request_token(&self) -> Result<TokenInfo> {
        let url = format!("{}/identity/token", self.url.trim_end_matches('/'));
        debug!("Requesting IAM token from {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", IAM_GRANT_TYPE),
                ("apikey", self.apikey.as_str()),
                ("response_type", "cloud_iam"),
            ]);
        if let Some((client_id, client_secret)) = &self.client_credentials {
            request = request.basic_auth(client_id, Some(client_secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::Auth(format!("IAM token request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Auth(format!("Failed to read IAM token response: {}", e)))?;

        if !status.is_success() {
            let err = HttpErrorHandler::handle_api_error(status, &body);
            return Err(RegistryError::Auth(format!("IAM token request failed: {}", err)));
        }

        let token: IamTokenResponse = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::Auth(format!("Invalid IAM token response: {}", e)))?;
        Ok(TokenInfo::new(token.access_token, Duration::from_secs(token.expires_in)))
    }
}

#[derive(Clone)]
pub struct IamAuthenticatorBuilder {
    apikey: String,
    url: Option<String>,
    client_credentials: Option<(String, String)>,
    disable_ssl: bool,
    timeout: Duration,
}

impl IamAuthenticatorBuilder {
    /// Token service base URL; `/identity/token` is appended.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_credentials = Some((client_id.into(), client_secret.into()));
        self
    }

    pub fn with_disable_ssl(mut self, disable_ssl: bool) -> Self {
        self.disable_ssl = disable_ssl;
        self
    }

    /// Upper bound for one token request. Callers waiting on the token
    /// wait at most this long.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<IamAuthenticator> {
        if self.apikey.is_empty() {
            return Err(RegistryError::Auth("apikey must be provided".to_string()));
        }

        let mut builder = Client::builder().timeout(self.timeout);
        if self.disable_ssl {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Auth(format!("Failed to create IAM client: {}", e)))?;

        let source = IamTokenSource {
            client,
            url: self.url.unwrap_or_else(|| DEFAULT_IAM_URL.to_string()),
            apikey: self.apikey,
            client_credentials: self.client_credentials,
        };
        Ok(IamAuthenticator {
            tokens: TokenManager::new(source),
        })
    }
}

/// Bearer tokens obtained from IAM with an API key, cached until they are
/// due for refresh.
#[derive(Debug)]
pub struct IamAuthenticator {
    tokens: TokenManager<IamTokenSource>,
}

impl IamAuthenticator {
    pub fn builder(apikey: impl Into<String>) -> IamAuthenticatorBuilder {
        IamAuthenticatorBuilder {
            apikey: apikey.into(),
            url: None,
            client_credentials: None,
            disable_ssl: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new(apikey: impl Into<String>) -> Result<Self> {
        Self::builder(apikey).build()
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        let token = self.tokens.get_token().await?;
        headers.insert(AUTHORIZATION, sensitive_header(&format!("Bearer {}", token))?);
        Ok(())
    }

    async fn invalidate(&self) {
        debug!("Discarding the cached IAM token");
        self.tokens.invalidate().await;
    }

    fn authentication_type(&self) -> &'static str {
        "iam"
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| RegistryError::Auth("credentials contain invalid header characters".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}
