//! External service configuration
//!
//! Properties are named `<SERVICE_NAME>_<KEY>`, e.g.
//! `CONTAINER_REGISTRY_APIKEY`. They are read from the credentials file
//! (`IBM_CREDENTIALS_FILE`, else `ibm-credentials.env` in the working
//! directory, else the same file in the home directory) and, if that file
//! says nothing about the service, from the process environment. Sources
//! are never merged.

use crate::error::{RegistryError, Result};
use crate::registry::auth::{
    Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator,
};
use crate::registry::transport::RetryConfig;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";
pub const DEFAULT_CREDENTIALS_FILE: &str = "ibm-credentials.env";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    Iam,
    BearerToken,
    Basic,
    NoAuth,
}

impl FromStr for AuthType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "iam" => Ok(AuthType::Iam),
            "bearertoken" => Ok(AuthType::BearerToken),
            "basic" => Ok(AuthType::Basic),
            "noauth" => Ok(AuthType::NoAuth),
            _ => Err(RegistryError::Configuration(format!(
                "Unsupported authentication type '{}'",
                s
            ))),
        }
    }
}

/// Settings for one service, resolved from external configuration.
#[derive(Clone, Default, PartialEq)]
pub struct ServiceConfig {
    pub url: Option<String>,
    pub region: Option<String>,
    pub auth_type: AuthType,
    pub apikey: Option<String>,
    pub auth_url: Option<String>,
    pub bearer_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub enable_retries: bool,
    pub max_retries: Option<u32>,
    /// Longest wait between retries.
    pub retry_interval: Option<Duration>,
    pub disable_ssl: bool,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("ServiceConfig")
            .field("url", &self.url)
            .field("region", &self.region)
            .field("auth_type", &self.auth_type)
            .field("apikey", &redact(&self.apikey))
            .field("auth_url", &self.auth_url)
            .field("bearer_token", &redact(&self.bearer_token))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("enable_retries", &self.enable_retries)
            .field("max_retries", &self.max_retries)
            .field("retry_interval", &self.retry_interval)
            .field("disable_ssl", &self.disable_ssl)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolve the configuration of `service_name` from the credentials file
    /// or the environment.
    pub fn load(service_name: &str) -> Result<Self> {
        let prefix = property_prefix(service_name);

        if let Some(path) = credentials_file()? {
            let properties = read_credentials_file(&path)?;
            if properties.iter().any(|(key, _)| key.starts_with(&prefix)) {
                debug!("Using {} configuration from {}", service_name, path.display());
                return Self::from_properties(service_name, properties);
            }
        }

        debug!("Using {} configuration from the environment", service_name);
        Self::from_properties(service_name, std::env::vars())
    }

    /// Build a configuration from `(name, value)` pairs. Pairs not prefixed
    /// with the service name are ignored.
    pub fn from_properties<I, K, V>(service_name: &str, properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = property_prefix(service_name);
        let mut values: HashMap<String, String> = properties
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(&prefix)
                    .map(|suffix| (suffix.to_string(), value.into()))
            })
            .collect();
        let mut take = |key: &str| values.remove(key).filter(|value| !value.is_empty());

        Ok(Self {
            url: take("URL"),
            region: take("REGION"),
            auth_type: take("AUTH_TYPE")
                .map(|value| value.parse::<AuthType>())
                .transpose()?
                .unwrap_or_default(),
            apikey: take("APIKEY"),
            auth_url: take("AUTH_URL"),
            bearer_token: take("BEARER_TOKEN"),
            username: take("USERNAME"),
            password: take("PASSWORD"),
            enable_retries: take("ENABLE_RETRIES").is_some_and(|value| parse_bool(&value)),
            max_retries: take("MAX_RETRIES")
                .map(|value| parse_number(&prefix, "MAX_RETRIES", &value))
                .transpose()?,
            retry_interval: take("RETRY_INTERVAL")
                .map(|value| parse_number(&prefix, "RETRY_INTERVAL", &value).map(Duration::from_secs))
                .transpose()?,
            disable_ssl: take("DISABLE_SSL").is_some_and(|value| parse_bool(&value)),
        })
    }

    /// Retry settings for the HTTP transport, when retries are enabled.
    pub fn retry_config(&self) -> Option<RetryConfig> {
        if !self.enable_retries {
            return None;
        }
        let defaults = RetryConfig::default();
        Some(RetryConfig {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            max_interval: self.retry_interval.unwrap_or(defaults.max_interval),
        })
    }

    /// Build the authenticator the configuration asks for.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        let missing = |property: &str| {
            RegistryError::Auth(format!(
                "{} is required for {:?} authentication",
                property, self.auth_type
            ))
        };

        let authenticator: Arc<dyn Authenticator> = match self.auth_type {
            AuthType::Iam => {
                let apikey = self.apikey.as_deref().ok_or_else(|| missing("APIKEY"))?;
                let mut builder = IamAuthenticator::builder(apikey).with_disable_ssl(self.disable_ssl);
                if let Some(url) = &self.auth_url {
                    builder = builder.with_url(url.as_str());
                }
                Arc::new(builder.build()?)
            }
            AuthType::BearerToken => Arc::new(BearerTokenAuthenticator::new(
                self.bearer_token.as_deref().ok_or_else(|| missing("BEARER_TOKEN"))?,
            )?),
            AuthType::Basic => Arc::new(BasicAuthenticator::new(
                self.username.as_deref().ok_or_else(|| missing("USERNAME"))?,
                self.password.as_deref().ok_or_else(|| missing("PASSWORD"))?,
            )?),
            AuthType::NoAuth => Arc::new(NoAuthAuthenticator),
        };
        Ok(authenticator)
    }
}

/// `container-registry` becomes `CONTAINER_REGISTRY_`.
pub fn property_prefix(service_name: &str) -> String {
    format!("{}_", service_name.to_ascii_uppercase().replace('-', "_"))
}

fn credentials_file() -> Result<Option<PathBuf>> {
    let explicit = std::env::var(CREDENTIALS_FILE_ENV).ok();
    locate_credentials_file(explicit.as_deref(), dirs::home_dir().as_deref())
}

/// The first of: the file named by `explicit`, `ibm-credentials.env` in the
/// working directory, `ibm-credentials.env` in `home`.
fn locate_credentials_file(explicit: Option<&str>, home: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit.filter(|path| !path.is_empty()) {
        let path = PathBuf::from(path);
        return if path.is_file() {
            Ok(Some(path))
        } else {
            Err(RegistryError::Configuration(format!(
                "{} points to {}, which is not a file",
                CREDENTIALS_FILE_ENV,
                path.display()
            )))
        };
    }

    let working_dir = PathBuf::from(DEFAULT_CREDENTIALS_FILE);
    if working_dir.is_file() {
        return Ok(Some(working_dir));
    }
    Ok(home
        .map(|home| home.join(DEFAULT_CREDENTIALS_FILE))
        .filter(|path| path.is_file()))
}

fn read_credentials_file(path: &Path) -> Result<Vec<(String, String)>> {
    let unreadable = |e: dotenvy::Error| {
        RegistryError::Configuration(format!(
            "Failed to read credentials file {}: {}",
            path.display(),
            e
        ))
    };
    dotenvy::from_path_iter(path)
        .map_err(unreadable)?
        .map(|entry| entry.map_err(unreadable))
        .collect()
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn parse_number<T: FromStr>(prefix: &str, key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        RegistryError::Configuration(format!("{}{} must be a number, got '{}'", prefix, key, value))
    })
}
