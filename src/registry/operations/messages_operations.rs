use crate::error::{RegistryError, Result};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::RequestBuilder;
use crate::registry::response::DetailedResponse;
use reqwest::{Method, StatusCode};
use serde_json::Value;

impl ContainerRegistryClient {
    /// The registry banner message. `200` carries the message; `204` means
    /// there is none and leaves the result empty.
    pub async fn get_messages(&self) -> Result<DetailedResponse<String>> {
        let request =
            RequestBuilder::new(Method::GET, "get_messages", "/api/v1/messages").accept_json();
        let response = self.send(request).await?;

        let result = if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
            None
        } else {
            Some(decode_message(&response.body)?)
        };
        Ok(DetailedResponse {
            status: response.status,
            headers: response.headers,
            result,
        })
    }
}

/// The message is a JSON string; plain text bodies are taken as they are.
fn decode_message(body: &[u8]) -> Result<String> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::String(message)) => Ok(message),
        Ok(_) => Err(RegistryError::Decode(
            "expected the message to be a JSON string".to_string(),
        )),
        Err(_) => Ok(String::from_utf8(body.to_vec())?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message() {
        assert_eq!(decode_message(br#""Maintenance on Sunday""#).unwrap(), "Maintenance on Sunday");
        assert_eq!(decode_message(b"plain text").unwrap(), "plain text");
        assert!(matches!(decode_message(b"[1]"), Err(RegistryError::Decode(_))));
    }
}
