//! Error types for container registry operations

pub mod handlers;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required operation parameter was not supplied
    #[error("{parameter} must be provided")]
    MissingParameter { parameter: &'static str },

    /// A required property was absent from a model's JSON
    #[error("Required property '{field}' not present in {model} JSON")]
    MissingRequiredField {
        field: &'static str,
        model: &'static str,
    },

    /// A response or model payload did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The service answered with a non-2xx status
    #[error("Error: {message}, Status code: {status}")]
    Api {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// Connection-level failures reported by the HTTP stack
    #[error("Network error: {0}")]
    Network(String),

    /// Credential or token acquisition failures
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid client or external configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RegistryError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn missing(parameter: &'static str) -> Self {
        RegistryError::MissingParameter { parameter }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for RegistryError {
    fn from(err: reqwest_middleware::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Configuration(format!("invalid service URL: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for RegistryError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        RegistryError::Decode(format!("UTF-8 conversion error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_names_the_parameter() {
        let err = RegistryError::missing("bulk_delete");
        assert_eq!(err.to_string(), "bulk_delete must be provided");
        assert!(err.status().is_none());
    }

    #[test]
    fn test_missing_required_field_names_field_and_model() {
        let err = RegistryError::MissingRequiredField {
            field: "namespace",
            model: "RetentionPolicy",
        };
        assert_eq!(
            err.to_string(),
            "Required property 'namespace' not present in RetentionPolicy JSON"
        );
    }

    #[test]
    fn test_api_error_exposes_status() {
        let err = RegistryError::Api {
            status: StatusCode::NOT_FOUND,
            message: "namespace not found".to_string(),
            body: None,
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            err.to_string(),
            "Error: namespace not found, Status code: 404 Not Found"
        );
    }
}
