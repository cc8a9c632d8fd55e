use super::Model;
use serde::{Deserialize, Serialize};

/// A retention policy attached to a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// The namespace to which the retention policy is attached.
    #[serde(rename = "namespace")]
    pub namespace: String,

    /// How many images are kept per repository; `-1` keeps all of them.
    #[serde(rename = "images_per_repo", skip_serializing_if = "Option::is_none")]
    pub images_per_repo: Option<i32>,

    /// Whether untagged images survive the policy. The service treats an
    /// unset value as `false`.
    #[serde(rename = "retain_untagged", skip_serializing_if = "Option::is_none")]
    pub retain_untagged: Option<bool>,
}

impl RetentionPolicy {
    pub const UNLIMITED: i32 = -1;

    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
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
}

impl Model for RetentionPolicy {
    const NAME: &'static str = "RetentionPolicy";
    const REQUIRED: &'static [&'static str] = &["namespace"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use serde_json::json;

    #[test]
    fn test_encodes_exact_wire_object() {
        let policy = RetentionPolicy::new("birds")
            .with_images_per_repo(10)
            .with_retain_untagged(false);
        assert_eq!(
            policy.to_json_string().unwrap(),
            r#"{"namespace":"birds","images_per_repo":10,"retain_untagged":false}"#
        );
    }

    #[test]
    fn test_only_namespace_when_nothing_else_set() {
        let policy = RetentionPolicy::new("birds");
        assert_eq!(policy.to_value().unwrap(), json!({"namespace": "birds"}));
    }

    #[test]
    fn test_missing_namespace_is_a_required_field_error() {
        let err = RetentionPolicy::from_value(json!({"images_per_repo": 15})).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingRequiredField { field: "namespace", model: "RetentionPolicy" }
        ));
    }

    #[test]
    fn test_null_namespace_is_a_required_field_error() {
        let err = RetentionPolicy::from_value(json!({"namespace": null, "images_per_repo": 15}))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingRequiredField { field: "namespace", model: "RetentionPolicy" }
        ));
    }

    #[test]
    fn test_round_trip() {
        let value = json!({"images_per_repo": 15, "namespace": "namespace", "retain_untagged": false});
        let policy = RetentionPolicy::from_value(value.clone()).unwrap();
        assert_eq!(policy.images_per_repo, Some(15));
        assert_eq!(policy.to_value().unwrap(), value);
        assert_eq!(RetentionPolicy::from_value(policy.to_value().unwrap()).unwrap(), policy);
    }

    #[test]
    fn test_unlimited_images() {
        let policy = RetentionPolicy::from_value(json!({"namespace": "n", "images_per_repo": -1})).unwrap();
        assert_eq!(policy.images_per_repo, Some(RetentionPolicy::UNLIMITED));
    }
}
