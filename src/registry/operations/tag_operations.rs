use super::require_segment;
use crate::error::Result;
use crate::models::{ImageDeleteResult, Model};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::{RequestBuilder, encode_path_segment};
use crate::registry::response::DetailedResponse;
use reqwest::Method;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteImageTagOptions {
    /// Tagged image reference, `<REGISTRY>/<NAMESPACE>/<REPOSITORY>:<TAG>`.
    pub image: Option<String>,
}

impl DeleteImageTagOptions {
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
    /// Remove a tag. The image itself stays while other tags reference it.
    pub async fn delete_image_tag(
        &self,
        options: &DeleteImageTagOptions,
    ) -> Result<DetailedResponse<ImageDeleteResult>> {
        let image = options.validate()?;
        let path = format!("/api/v1/tags/{}", encode_path_segment(image));
        let request = RequestBuilder::new(Method::DELETE, "delete_image_tag", path).accept_json();
        self.execute(request, ImageDeleteResult::from_value).await
    }
}
