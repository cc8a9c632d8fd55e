//! Trash operations: listing deleted images and restoring them

use super::require_segment;
use crate::error::Result;
use crate::models::{Model, RestoreResult, Trash, decode_map};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::{RequestBuilder, encode_path_segment};
use crate::registry::response::DetailedResponse;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListDeletedImagesOptions {
    /// Only images deleted from this namespace.
    pub namespace: Option<String>,
}

impl ListDeletedImagesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreTagsOptions {
    /// Digest reference of a deleted image, `<REGISTRY>/<NAMESPACE>/<REPOSITORY>@<DIGEST>`.
    pub digest: Option<String>,
}

impl RestoreTagsOptions {
    pub fn new(digest: impl Into<String>) -> Self {
        Self {
            digest: Some(digest.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<&str> {
        require_segment(&self.digest, "digest")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreImageOptions {
    /// Tagged reference of a deleted image.
    pub image: Option<String>,
}

impl RestoreImageOptions {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<&str> {
        require_segment(&self.image, "image")
    }
}

impl ContainerRegistryClient {
    /// Images in the trash, keyed by digest reference.
    pub async fn list_deleted_images(
        &self,
        options: &ListDeletedImagesOptions,
    ) -> Result<DetailedResponse<BTreeMap<String, Trash>>> {
        let request = RequestBuilder::new(Method::GET, "list_deleted_images", "/api/v1/trash")
            .query("namespace", options.namespace.as_deref())
            .accept_json();
        self.execute(request, decode_map::<Trash>).await
    }

    /// Restore a digest from the trash together with every tag that still
    /// points at it.
    pub async fn restore_tags(
        &self,
        options: &RestoreTagsOptions,
    ) -> Result<DetailedResponse<RestoreResult>> {
        let digest = options.validate()?;
        let path = format!("/api/v1/trash/{}/restoretags", encode_path_segment(digest));
        let request = RequestBuilder::new(Method::POST, "restore_tags", path).accept_json();
        self.execute(request, RestoreResult::from_value).await
    }

    /// Restore a single tagged image from the trash.
    pub async fn restore_image(
        &self,
        options: &RestoreImageOptions,
    ) -> Result<DetailedResponse<()>> {
        let image = options.validate()?;
        let path = format!("/api/v1/trash/{}/restore", encode_path_segment(image));
        self.execute_empty(RequestBuilder::new(Method::POST, "restore_image", path))
            .await
    }
}
