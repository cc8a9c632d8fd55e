use async_trait::async_trait;
use ibm_container_registry::{
    ContainerRegistryClient, RawResponse, Result, ServiceRequest, Transport,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "0123456789abcdef";

/// Transport that records every request and answers from a script.
/// With the script exhausted it answers `200` with an empty body.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<ServiceRequest>>>,
    responses: Arc<Mutex<VecDeque<RawResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: RawResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_json(&self, value: Value) -> &Self {
        self.respond(RawResponse::json(StatusCode::OK, &value))
    }

    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ServiceRequest {
        self.requests()
            .pop()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ServiceRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| RawResponse::empty(StatusCode::OK)))
    }
}

pub fn client_with(transport: &RecordingTransport) -> ContainerRegistryClient {
    ContainerRegistryClient::builder(ACCOUNT)
        .with_service_url("https://registry.test")
        .with_transport(transport.clone())
        .build()
        .unwrap()
}
