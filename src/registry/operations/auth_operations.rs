//! Account authorization settings: `/api/v1/auth`

use crate::error::Result;
use crate::models::{AuthOptions, Model};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::RequestBuilder;
use crate::registry::response::DetailedResponse;
use reqwest::Method;
use serde::Serialize;

/// Fields to change; unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateAuthOptions {
    /// Enable role-based authorization with IAM.
    #[serde(rename = "iam_authz", skip_serializing_if = "Option::is_none")]
    pub iam_authz: Option<bool>,

    /// Restrict the account to private connections only.
    #[serde(rename = "private_only", skip_serializing_if = "Option::is_none")]
    pub private_only: Option<bool>,
}

impl UpdateAuthOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iam_authz(mut self, iam_authz: bool) -> Self {
        self.iam_authz = Some(iam_authz);
        self
    }

    pub fn with_private_only(mut self, private_only: bool) -> Self {
        self.private_only = Some(private_only);
        self
    }
}

impl ContainerRegistryClient {
    /// Get the authorization options of the targeted account.
    pub async fn get_auth(&self) -> Result<DetailedResponse<AuthOptions>> {
        let request = RequestBuilder::new(Method::GET, "get_auth", "/api/v1/auth").accept_json();
        self.execute(request, AuthOptions::from_value).await
    }

    /// Update the authorization options of the targeted account.
    pub async fn update_auth(&self, options: &UpdateAuthOptions) -> Result<DetailedResponse<()>> {
        let request =
            RequestBuilder::new(Method::PATCH, "update_auth", "/api/v1/auth").json_body(options)?;
        self.execute_empty(request).await
    }
}
