//! Retention policies: `/api/v1/retentions`

use super::require_segment;
use crate::error::{RegistryError, Result};
use crate::models::{Model, RetentionPolicy, decode_map};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::{RequestBuilder, encode_path_segment};
use crate::registry::response::DetailedResponse;
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

/// Policy fields sent to the set and analyze endpoints. Only `namespace`
/// is required; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionPolicyOptions {
    #[serde(rename = "namespace")]
    pub namespace: Option<String>,

    /// Images kept per repository; `-1` keeps all of them.
    #[serde(rename = "images_per_repo", skip_serializing_if = "Option::is_none")]
    pub images_per_repo: Option<i32>,

    #[serde(rename = "retain_untagged", skip_serializing_if = "Option::is_none")]
    pub retain_untagged: Option<bool>,
}

impl RetentionPolicyOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            images_per_repo: None,
            retain_untagged: None,
        }
    }

    pub fn with_images_per_repo(mut self, images_per_repo: i32) -> Self {
        self.images_per_repo = Some(images_per_repo);
        self
    }

    pub fn with_retain_untagged(mut self, retain_untagged: bool) -> Self {
        self.retain_untagged = Some(retain_untagged);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match &self.namespace {
            Some(_) => Ok(()),
            None => Err(RegistryError::missing("namespace")),
        }
    }
}

impl From<RetentionPolicy> for RetentionPolicyOptions {
    fn from(policy: RetentionPolicy) -> Self {
        Self {
            namespace: Some(policy.namespace),
            images_per_repo: policy.images_per_repo,
            retain_untagged: policy.retain_untagged,
        }
    }
}

pub type SetRetentionPolicyOptions = RetentionPolicyOptions;
pub type AnalyzeRetentionPolicyOptions = RetentionPolicyOptions;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRetentionPolicyOptions {
    pub namespace: Option<String>,
}

impl GetRetentionPolicyOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
        }
    }

    pub(crate) fn validate(&self) -> Result<&str> {
        require_segment(&self.namespace, "namespace")
    }
}

impl ContainerRegistryClient {
    /// Retention policies of the account, keyed by namespace.
    pub async fn list_retention_policies(
        &self,
    ) -> Result<DetailedResponse<BTreeMap<String, RetentionPolicy>>> {
        let request =
            RequestBuilder::new(Method::GET, "list_retention_policies", "/api/v1/retentions")
                .accept_json();
        self.execute(request, decode_map::<RetentionPolicy>).await
    }

    /// Set the retention policy of a namespace, replacing any previous one.
    pub async fn set_retention_policy(
        &self,
        options: &SetRetentionPolicyOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let request =
            RequestBuilder::new(Method::POST, "set_retention_policy", "/api/v1/retentions")
                .json_body(options)?;
        self.execute_empty(request).await
    }

    /// Images a policy would delete if it were applied now, keyed by
    /// repository.
    pub async fn analyze_retention_policy(
        &self,
        options: &AnalyzeRetentionPolicyOptions,
    ) -> Result<DetailedResponse<BTreeMap<String, Vec<String>>>> {
        options.validate()?;
        let request = RequestBuilder::new(
            Method::POST,
            "analyze_retention_policy",
            "/api/v1/retentions/analyze",
        )
        .json_body(options)?
        .accept_json();
        self.execute(request, |value| {
            serde_json::from_value(value)
                .map_err(|e| RegistryError::Decode(format!("retention analysis: {}", e)))
        })
        .await
    }

    pub async fn get_retention_policy(
        &self,
        options: &GetRetentionPolicyOptions,
    ) -> Result<DetailedResponse<RetentionPolicy>> {
        let namespace = options.validate()?;
        let path = format!("/api/v1/retentions/{}", encode_path_segment(namespace));
        let request = RequestBuilder::new(Method::GET, "get_retention_policy", path).accept_json();
        self.execute(request, RetentionPolicy::from_value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_body_matches_model_encoding() {
        let policy = RetentionPolicy::new("birds")
            .with_images_per_repo(10)
            .with_retain_untagged(false);
        let options = RetentionPolicyOptions::from(policy.clone());
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            policy.to_json_string().unwrap()
        );
    }

    #[test]
    fn test_missing_namespace() {
        let options = RetentionPolicyOptions {
            images_per_repo: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(RegistryError::MissingParameter { parameter: "namespace" })
        ));
        assert_eq!(
            serde_json::to_value(RetentionPolicyOptions::new("n")).unwrap(),
            json!({"namespace": "n"})
        );
    }
}
