//! Image operations: listing, digests, tagging, deletion and inspection

use super::{require, require_segment};
use crate::error::{RegistryError, Result};
use crate::models::{
    ImageBulkDeleteResult, ImageDeleteResult, ImageDigest, ImageInspection, Model, RemoteApiImage,
    decode_list,
};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::{RequestBuilder, encode_path_segment};
use crate::registry::response::DetailedResponse;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

/// Filters for the image listing. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListImagesOptions {
    /// Only images in this namespace.
    pub namespace: Option<String>,
    /// Include IBM-provided public images.
    pub include_ibm: Option<bool>,
    /// Include private images. Defaults to true on the service.
    pub include_private: Option<bool>,
    /// Include manifest list images.
    pub include_manifest_lists: Option<bool>,
    /// Include Vulnerability Advisor status.
    pub vulnerabilities: Option<bool>,
    /// Only images in this repository.
    pub repository: Option<String>,
}

impl ListImagesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_include_ibm(mut self, include_ibm: bool) -> Self {
        self.include_ibm = Some(include_ibm);
        self
    }

    pub fn with_include_private(mut self, include_private: bool) -> Self {
        self.include_private = Some(include_private);
        self
    }

    pub fn with_include_manifest_lists(mut self, include_manifest_lists: bool) -> Self {
        self.include_manifest_lists = Some(include_manifest_lists);
        self
    }

    pub fn with_vulnerabilities(mut self, vulnerabilities: bool) -> Self {
        self.vulnerabilities = Some(vulnerabilities);
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteImagesOptions {
    /// Full image references with digests, e.g.
    /// `us.icr.io/birds/bird@sha256:...`. An empty list is sent as is.
    pub bulk_delete: Option<Vec<String>>,
}

impl BulkDeleteImagesOptions {
    pub fn new<I, S>(images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bulk_delete: Some(images.into_iter().map(Into::into).collect()),
        }
    }

    pub(crate) fn validate(&self) -> Result<&[String]> {
        self.bulk_delete
            .as_deref()
            .ok_or(RegistryError::missing("bulk_delete"))
    }
}

/// Body of the digest listing; unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListImageDigestsOptions {
    /// Leave out digests that have tags.
    #[serde(rename = "exclude_tagged", skip_serializing_if = "Option::is_none")]
    pub exclude_tagged: Option<bool>,

    /// Skip the Vulnerability Advisor lookup.
    #[serde(rename = "exclude_va", skip_serializing_if = "Option::is_none")]
    pub exclude_va: Option<bool>,

    #[serde(rename = "include_ibm", skip_serializing_if = "Option::is_none")]
    pub include_ibm: Option<bool>,

    /// Only these repositories (`<region>.icr.io/<namespace>/<repository>`).
    #[serde(rename = "repositories", skip_serializing_if = "Option::is_none")]
    pub repositories: Option<Vec<String>>,
}

impl ListImageDigestsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude_tagged(mut self, exclude_tagged: bool) -> Self {
        self.exclude_tagged = Some(exclude_tagged);
        self
    }

    pub fn with_exclude_va(mut self, exclude_va: bool) -> Self {
        self.exclude_va = Some(exclude_va);
        self
    }

    pub fn with_include_ibm(mut self, include_ibm: bool) -> Self {
        self.include_ibm = Some(include_ibm);
        self
    }

    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories = Some(repositories.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagImageOptions {
    /// Existing image reference, `<REGISTRY>/<NAMESPACE>/<REPOSITORY>:<TAG>`.
    pub fromimage: Option<String>,
    /// New reference in the same registry.
    pub toimage: Option<String>,
}

impl TagImageOptions {
    pub fn new(fromimage: impl Into<String>, toimage: impl Into<String>) -> Self {
        Self {
            fromimage: Some(fromimage.into()),
            toimage: Some(toimage.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(&str, &str)> {
        Ok((
            require(&self.fromimage, "fromimage")?,
            require(&self.toimage, "toimage")?,
        ))
    }
}

macro_rules! image_options {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            /// Image reference by tag or digest.
            pub image: Option<String>,
        }

        impl $name {
            pub fn new(image: impl Into<String>) -> Self {
                Self {
                    image: Some(image.into()),
                }
            }

            pub(crate) fn validate(&self) -> Result<&str> {
                require_segment(&self.image, "image")
            }
        }
    };
}

image_options!(DeleteImageOptions);
image_options!(InspectImageOptions);
image_options!(GetImageManifestOptions);

impl ContainerRegistryClient {
    /// List the images in the account, optionally filtered.
    pub async fn list_images(
        &self,
        options: &ListImagesOptions,
    ) -> Result<DetailedResponse<Vec<RemoteApiImage>>> {
        let request = RequestBuilder::new(Method::GET, "list_images", "/api/v1/images")
            .query("namespace", options.namespace.as_deref())
            .query("includeIBM", options.include_ibm)
            .query("includePrivate", options.include_private)
            .query("includeManifestLists", options.include_manifest_lists)
            .query("vulnerabilities", options.vulnerabilities)
            .query("repository", options.repository.as_deref())
            .accept_json();
        self.execute(request, decode_list::<RemoteApiImage>).await
    }

    /// Delete several images by digest in one call. Failures for
    /// individual images are reported in the result, not as an error.
    pub async fn bulk_delete_images(
        &self,
        options: &BulkDeleteImagesOptions,
    ) -> Result<DetailedResponse<ImageBulkDeleteResult>> {
        let images = options.validate()?;
        let request =
            RequestBuilder::new(Method::POST, "bulk_delete_images", "/api/v1/images/bulkdelete")
                .json_body(images)?
                .accept_json();
        self.execute(request, ImageBulkDeleteResult::from_value).await
    }

    /// List images by digest, with their tags per repository.
    pub async fn list_image_digests(
        &self,
        options: &ListImageDigestsOptions,
    ) -> Result<DetailedResponse<Vec<ImageDigest>>> {
        let request =
            RequestBuilder::new(Method::POST, "list_image_digests", "/api/v1/images/digests")
                .json_body(options)?
                .accept_json();
        self.execute(request, decode_list::<ImageDigest>).await
    }

    /// Add a tag to an existing image.
    pub async fn tag_image(&self, options: &TagImageOptions) -> Result<DetailedResponse<()>> {
        let (fromimage, toimage) = options.validate()?;
        let request = RequestBuilder::new(Method::POST, "tag_image", "/api/v1/images/tags")
            .query("fromimage", Some(fromimage))
            .query("toimage", Some(toimage));
        self.execute_empty(request).await
    }

    /// Delete an image and every tag that points at it.
    pub async fn delete_image(
        &self,
        options: &DeleteImageOptions,
    ) -> Result<DetailedResponse<ImageDeleteResult>> {
        let image = options.validate()?;
        let path = format!("/api/v1/images/{}", encode_path_segment(image));
        let request = RequestBuilder::new(Method::DELETE, "delete_image", path).accept_json();
        self.execute(request, ImageDeleteResult::from_value).await
    }

    /// Docker-compatible inspection of an image.
    pub async fn inspect_image(
        &self,
        options: &InspectImageOptions,
    ) -> Result<DetailedResponse<ImageInspection>> {
        let image = options.validate()?;
        let path = format!("/api/v1/images/{}/json", encode_path_segment(image));
        let request = RequestBuilder::new(Method::GET, "inspect_image", path).accept_json();
        self.execute(request, ImageInspection::from_value).await
    }

    /// The raw manifest of an image. Its shape depends on the manifest type,
    /// so it is returned as an untyped JSON object.
    pub async fn get_image_manifest(
        &self,
        options: &GetImageManifestOptions,
    ) -> Result<DetailedResponse<Map<String, Value>>> {
        let image = options.validate()?;
        let path = format!("/api/v1/images/{}/manifest", encode_path_segment(image));
        let request = RequestBuilder::new(Method::GET, "get_image_manifest", path).accept_json();
        self.execute(request, |value| match value {
            Value::Object(manifest) => Ok(manifest),
            _ => Err(RegistryError::Decode(
                "expected a JSON object for the image manifest".to_string(),
            )),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_body_only_has_set_filters() {
        let options = ListImageDigestsOptions::new()
            .with_exclude_tagged(true)
            .with_repositories(["us.icr.io/birds/bird"]);
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"exclude_tagged": true, "repositories": ["us.icr.io/birds/bird"]})
        );
        assert_eq!(
            serde_json::to_string(&ListImageDigestsOptions::new()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_image_options_validation() {
        assert_eq!(DeleteImageOptions::new("icr.io/a/b:1").validate().unwrap(), "icr.io/a/b:1");
        assert!(DeleteImageOptions::default().validate().is_err());
        assert!(InspectImageOptions::new("").validate().is_err());
    }

    #[test]
    fn test_bulk_delete_allows_empty_list() {
        let options = BulkDeleteImagesOptions::new(Vec::<String>::new());
        assert!(options.validate().unwrap().is_empty());
        assert!(matches!(
            BulkDeleteImagesOptions::default().validate(),
            Err(RegistryError::MissingParameter { parameter: "bulk_delete" })
        ));
    }

    #[test]
    fn test_tag_options_need_both_images() {
        let options = TagImageOptions {
            fromimage: Some("us.icr.io/birds/bird:1".to_string()),
            toimage: None,
        };
        assert!(matches!(
            options.validate(),
            Err(RegistryError::MissingParameter { parameter: "toimage" })
        ));
    }
}
