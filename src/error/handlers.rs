//! Mapping of non-success HTTP responses onto [`RegistryError::Api`]

use crate::error::RegistryError;
use reqwest::StatusCode;
use serde_json::Value;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Build the API error for a non-2xx response.
    ///
    /// The body is parsed as JSON when possible and the message is taken from
    /// the first field the service family is known to use. Bodies that are
    /// not JSON are kept as their text when short, otherwise the canonical
    /// reason phrase is used.
    pub fn handle_api_error(status: StatusCode, body: &[u8]) -> RegistryError {
        let parsed: Option<Value> = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };

        let message = parsed
            .as_ref()
            .and_then(Self::extract_message)
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (parsed.is_none() && !text.is_empty() && text.len() <= 512).then_some(text)
            })
            .unwrap_or_else(|| Self::reason(status));

        RegistryError::Api {
            status,
            message,
            body: parsed,
        }
    }

    fn extract_message(body: &Value) -> Option<String> {
        if let Some(first) = body
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
        {
            if let Some(message) = first.get("message").and_then(Value::as_str) {
                return Some(message.to_string());
            }
        }

        match body.get("error") {
            Some(Value::String(message)) => return Some(message.clone()),
            Some(nested @ Value::Object(_)) => {
                if let Some(message) = nested.get("message").and_then(Value::as_str) {
                    return Some(message.to_string());
                }
            }
            _ => {}
        }

        ["message", "errorMessage"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    }

    fn reason(status: StatusCode) -> String {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    }
}
