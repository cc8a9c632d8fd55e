//! Construction of a single API request: route, query, headers and body.

use crate::error::{RegistryError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const SERVICE_NAME: &str = "container_registry";
pub const SERVICE_VERSION: &str = "V1";

const ACCOUNT_HEADER: HeaderName = HeaderName::from_static("account");
const ANALYTICS_HEADER: HeaderName = HeaderName::from_static("x-ibmcloud-sdk-analytics");
const USER_AGENT_VALUE: &str = concat!("ibm-container-registry-rust/", env!("CARGO_PKG_VERSION"));
const JSON: &str = "application/json";

/// Everything outside the unreserved set is escaped, so `/`, `:` and `@`
/// stay inside the segment they were given for.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value for use as exactly one path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// A fully built request as handed to a [`Transport`](super::transport::Transport).
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Serialized JSON body, absent for requests without one.
    pub body: Option<Vec<u8>>,
    /// Name of the API operation, also carried in the analytics header.
    pub operation_id: &'static str,
}

impl ServiceRequest {
    /// Decoded value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The body parsed as JSON, if there is one and it parses.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// Per-operation request description, completed into a [`ServiceRequest`]
/// by the client that owns the base URL and account.
#[derive(Debug)]
pub(crate) struct RequestBuilder {
    method: Method,
    operation_id: &'static str,
    path: String,
    query: Vec<(&'static str, String)>,
    headers: Vec<(HeaderName, String)>,
    accept_json: bool,
    body: Option<Vec<u8>>,
    call_headers: HeaderMap,
}

impl RequestBuilder {
    /// `path` must already have its parameter segments encoded with
    /// [`encode_path_segment`].
    pub fn new(method: Method, operation_id: &'static str, path: impl Into<String>) -> Self {
        Self {
            method,
            operation_id,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            accept_json: false,
            body: None,
            call_headers: HeaderMap::new(),
        }
    }

    /// Add a query parameter when a value is present. Booleans render as
    /// `true`/`false`.
    pub fn query<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((name, value.to_string()));
        }
        self
    }

    pub fn header(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.headers
                .push((HeaderName::from_static(name), value.to_string()));
        }
        self
    }

    /// Mark the operation as returning a JSON body.
    pub fn accept_json(mut self) -> Self {
        self.accept_json = true;
        self
    }

    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Headers supplied for this call. They replace operation headers of
    /// the same name but not `Accept`/`Content-Type`.
    pub fn call_headers(mut self, headers: &HeaderMap) -> Self {
        self.call_headers.extend(headers.clone());
        self
    }

    pub fn operation_id(&self) -> &'static str {
        self.operation_id
    }

    /// Resolve the route against `base_url` and assemble the headers.
    ///
    /// Header precedence, lowest first: account and SDK headers, client
    /// default headers, operation headers, call headers, then
    /// `Accept`/`Content-Type`.
    pub fn build(
        self,
        base_url: &Url,
        account: &str,
        default_headers: &HeaderMap,
    ) -> Result<ServiceRequest> {
        let mut url = Url::parse(&format!(
            "{}{}",
            base_url.as_str().trim_end_matches('/'),
            self.path
        ))
        .map_err(|e| RegistryError::Configuration(format!("Invalid request URL: {}", e)))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCOUNT_HEADER, header_value("Account", account)?);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            ANALYTICS_HEADER,
            header_value(
                "X-IBMCloud-SDK-Analytics",
                &format!(
                    "service_name={};service_version={};operation_id={}",
                    SERVICE_NAME, SERVICE_VERSION, self.operation_id
                ),
            )?,
        );
        headers.extend(default_headers.clone());

        for (name, value) in self.headers {
            let value = header_value(name.as_str(), &value)?;
            headers.insert(name, value);
        }
        headers.extend(self.call_headers);
        if self.accept_json {
            headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        }
        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }

        Ok(ServiceRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
            operation_id: self.operation_id,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| RegistryError::Configuration(format!("Invalid value for header {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://us.icr.io").unwrap()
    }

    #[test]
    fn test_encode_path_segment_keeps_references_in_one_segment() {
        assert_eq!(
            encode_path_segment("icr.io/ns/repo@sha256:abc"),
            "icr.io%2Fns%2Frepo%40sha256%3Aabc"
        );
        assert_eq!(encode_path_segment("birds-1_a.b~c"), "birds-1_a.b~c");
        assert_eq!(encode_path_segment("a b"), "a%20b");
    }

    #[test]
    fn test_encoded_segment_survives_url_parsing() {
        let path = format!("/api/v1/images/{}", encode_path_segment("icr.io/ns/repo:tag"));
        let request = RequestBuilder::new(Method::DELETE, "delete_image", path)
            .build(&base(), "acct", &HeaderMap::new())
            .unwrap();
        assert_eq!(request.url.path(), "/api/v1/images/icr.io%2Fns%2Frepo%3Atag");
        assert_eq!(request.url.path_segments().unwrap().count(), 4);
    }

    #[test]
    fn test_query_booleans_and_omitted_values() {
        let request = RequestBuilder::new(Method::GET, "list_images", "/api/v1/images")
            .query("namespace", Some("birds"))
            .query("includeIBM", Some(true))
            .query("includePrivate", Some(false))
            .query::<bool>("vulnerabilities", None)
            .build(&base(), "acct", &HeaderMap::new())
            .unwrap();

        assert_eq!(request.query_param("includeIBM").as_deref(), Some("true"));
        assert_eq!(request.query_param("includePrivate").as_deref(), Some("false"));
        assert_eq!(request.query_param("namespace").as_deref(), Some("birds"));
        assert!(request.query_param("vulnerabilities").is_none());
        assert!(!request.url.as_str().contains("vulnerabilities"));
    }

    #[test]
    fn test_standard_headers() {
        let request = RequestBuilder::new(Method::GET, "get_quota", "/api/v1/quotas")
            .accept_json()
            .build(&base(), "acct-1", &HeaderMap::new())
            .unwrap();

        assert_eq!(request.header("account"), Some("acct-1"));
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.header("content-type").is_none());
        assert_eq!(
            request.header("x-ibmcloud-sdk-analytics"),
            Some("service_name=container_registry;service_version=V1;operation_id=get_quota")
        );
        assert!(request.header("user-agent").unwrap().starts_with("ibm-container-registry-rust/"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestBuilder::new(Method::POST, "bulk_delete_images", "/api/v1/images/bulkdelete")
            .json_body(&Vec::<String>::new())
            .unwrap()
            .build(&base(), "acct", &HeaderMap::new())
            .unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"[]"[..]));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json_body(), Some(json!([])));
    }

    #[test]
    fn test_default_headers_override_sdk_headers() {
        let mut defaults = HeaderMap::new();
        defaults.insert(USER_AGENT, HeaderValue::from_static("custom/1.0"));
        defaults.insert("x-trace", HeaderValue::from_static("abc"));

        let request = RequestBuilder::new(Method::GET, "get_plans", "/api/v1/plans")
            .build(&base(), "acct", &defaults)
            .unwrap();
        assert_eq!(request.header("user-agent"), Some("custom/1.0"));
        assert_eq!(request.header("x-trace"), Some("abc"));
    }

    #[test]
    fn test_call_headers_override_operation_headers_but_not_accept() {
        let mut defaults = HeaderMap::new();
        defaults.insert("x-trace", HeaderValue::from_static("default"));
        let mut call = HeaderMap::new();
        call.insert("x-trace", HeaderValue::from_static("call"));
        call.insert("x-auth-resource-group", HeaderValue::from_static("rg-call"));
        call.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let request = RequestBuilder::new(Method::PUT, "create_namespace", "/api/v1/namespaces/birds")
            .header("x-auth-resource-group", Some("rg-op"))
            .accept_json()
            .call_headers(&call)
            .build(&base(), "acct", &defaults)
            .unwrap();
        assert_eq!(request.header("x-trace"), Some("call"));
        assert_eq!(request.header("x-auth-resource-group"), Some("rg-call"));
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let base = Url::parse("https://proxy.example.com/registry/").unwrap();
        let request = RequestBuilder::new(Method::GET, "get_plans", "/api/v1/plans")
            .build(&base, "acct", &HeaderMap::new())
            .unwrap();
        assert_eq!(request.url.as_str(), "https://proxy.example.com/registry/api/v1/plans");
    }

    #[test]
    fn test_invalid_account_header_is_rejected() {
        let err = RequestBuilder::new(Method::GET, "get_plans", "/api/v1/plans")
            .build(&base(), "bad\naccount", &HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)));
    }
}
