//! Namespace operations: `/api/v1/namespaces`

use super::{require, require_segment};
use crate::error::{RegistryError, Result};
use crate::models::{Model, Namespace, NamespaceDetails, decode_list};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::{RequestBuilder, encode_path_segment};
use crate::registry::response::DetailedResponse;
use reqwest::Method;

const RESOURCE_GROUP_HEADER: &str = "x-auth-resource-group";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateNamespaceOptions {
    pub name: Option<String>,
    /// Resource group ID for the namespace; the account default when unset.
    pub x_auth_resource_group: Option<String>,
}

impl CreateNamespaceOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            x_auth_resource_group: None,
        }
    }

    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.x_auth_resource_group = Some(resource_group.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<&str> {
        require_segment(&self.name, "name")
    }
}

/// Move an unassigned namespace into a resource group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignNamespaceOptions {
    pub x_auth_resource_group: Option<String>,
    pub name: Option<String>,
}

impl AssignNamespaceOptions {
    pub fn new(resource_group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            x_auth_resource_group: Some(resource_group.into()),
            name: Some(name.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(&str, &str)> {
        Ok((
            require(&self.x_auth_resource_group, "x_auth_resource_group")?,
            require_segment(&self.name, "name")?,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteNamespaceOptions {
    pub name: Option<String>,
}

impl DeleteNamespaceOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<&str> {
        require_segment(&self.name, "name")
    }
}

impl ContainerRegistryClient {
    /// Names of the namespaces in the account.
    pub async fn list_namespaces(&self) -> Result<DetailedResponse<Vec<String>>> {
        let request =
            RequestBuilder::new(Method::GET, "list_namespaces", "/api/v1/namespaces").accept_json();
        self.execute(request, |value| {
            serde_json::from_value::<Vec<String>>(value)
                .map_err(|e| RegistryError::Decode(format!("namespace list: {}", e)))
        })
        .await
    }

    pub async fn list_namespace_details(&self) -> Result<DetailedResponse<Vec<NamespaceDetails>>> {
        let request = RequestBuilder::new(
            Method::GET,
            "list_namespace_details",
            "/api/v1/namespaces/details",
        )
        .accept_json();
        self.execute(request, decode_list::<NamespaceDetails>).await
    }

    /// Create a namespace. Succeeds with `200` if the account already owns it.
    pub async fn create_namespace(
        &self,
        options: &CreateNamespaceOptions,
    ) -> Result<DetailedResponse<Namespace>> {
        let name = options.validate()?;
        let path = format!("/api/v1/namespaces/{}", encode_path_segment(name));
        let request = RequestBuilder::new(Method::PUT, "create_namespace", path)
            .header(RESOURCE_GROUP_HEADER, options.x_auth_resource_group.as_deref())
            .accept_json();
        self.execute(request, Namespace::from_value).await
    }

    pub async fn assign_namespace(
        &self,
        options: &AssignNamespaceOptions,
    ) -> Result<DetailedResponse<Namespace>> {
        let (resource_group, name) = options.validate()?;
        let path = format!("/api/v1/namespaces/{}", encode_path_segment(name));
        let request = RequestBuilder::new(Method::PATCH, "assign_namespace", path)
            .header(RESOURCE_GROUP_HEADER, Some(resource_group))
            .accept_json();
        self.execute(request, Namespace::from_value).await
    }

    /// Delete a namespace and every image in it.
    pub async fn delete_namespace(
        &self,
        options: &DeleteNamespaceOptions,
    ) -> Result<DetailedResponse<()>> {
        let name = options.validate()?;
        let path = format!("/api/v1/namespaces/{}", encode_path_segment(name));
        self.execute_empty(RequestBuilder::new(Method::DELETE, "delete_namespace", path))
            .await
    }
}
