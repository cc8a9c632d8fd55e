//! Image listing, digest and deletion records.

use super::Model;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the image listing. Field names follow the Docker-compatible
/// PascalCase the listing endpoint uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteApiImage {
    #[serde(rename = "ConfigurationIssueCount", skip_serializing_if = "Option::is_none")]
    pub configuration_issue_count: Option<i64>,

    #[serde(rename = "Created", skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// Digest to the tags that reference it.
    #[serde(rename = "DigestTags", skip_serializing_if = "Option::is_none")]
    pub digest_tags: Option<BTreeMap<String, Vec<String>>>,

    #[serde(rename = "ExemptIssueCount", skip_serializing_if = "Option::is_none")]
    pub exempt_issue_count: Option<i64>,

    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "IssueCount", skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<i64>,

    #[serde(rename = "Labels", skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(rename = "ManifestType", skip_serializing_if = "Option::is_none")]
    pub manifest_type: Option<String>,

    #[serde(rename = "ParentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(rename = "RepoDigests", skip_serializing_if = "Option::is_none")]
    pub repo_digests: Option<Vec<String>>,

    #[serde(rename = "RepoTags", skip_serializing_if = "Option::is_none")]
    pub repo_tags: Option<Vec<String>>,

    #[serde(rename = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    #[serde(rename = "VirtualSize", skip_serializing_if = "Option::is_none")]
    pub virtual_size: Option<i64>,

    #[serde(rename = "VulnerabilityCount", skip_serializing_if = "Option::is_none")]
    pub vulnerability_count: Option<i64>,

    #[serde(rename = "Vulnerable", skip_serializing_if = "Option::is_none")]
    pub vulnerable: Option<String>,
}

/// An image identified by digest, with its tags grouped per repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDigest {
    /// Build date of the image.
    #[serde(rename = "created", skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,

    /// The image digest.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Manifest media type, e.g. a Docker v2 manifest or an OCI index.
    #[serde(rename = "manifestType", skip_serializing_if = "Option::is_none")]
    pub manifest_type: Option<String>,

    /// Repository to tag to the scan summary for that tag.
    #[serde(rename = "repoTags", skip_serializing_if = "Option::is_none")]
    pub repo_tags: Option<BTreeMap<String, BTreeMap<String, VaReport>>>,

    /// Size of the image in bytes.
    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl ImageDigest {
    /// Scan summary for `repository:tag`, if both are present.
    pub fn va_report(&self, repository: &str, tag: &str) -> Option<&VaReport> {
        self.repo_tags.as_ref()?.get(repository)?.get(tag)
    }

    /// True when no repository lists a tag for this digest.
    pub fn is_untagged(&self) -> bool {
        self.repo_tags
            .as_ref()
            .is_none_or(|repos| repos.values().all(BTreeMap::is_empty))
    }
}

/// Vulnerability Advisor summary for one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaReport {
    #[serde(rename = "configurationIssueCount", skip_serializing_if = "Option::is_none")]
    pub configuration_issue_count: Option<i32>,

    /// Issues present but exempted by policy.
    #[serde(rename = "exemptIssueCount", skip_serializing_if = "Option::is_none")]
    pub exempt_issue_count: Option<i32>,

    #[serde(rename = "issueCount", skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<i32>,

    #[serde(rename = "vulnerabilityCount", skip_serializing_if = "Option::is_none")]
    pub vulnerability_count: Option<i32>,

    /// Summary status such as `yes`, `no` or `unknown`.
    #[serde(rename = "vulnerable", skip_serializing_if = "Option::is_none")]
    pub vulnerable: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDeleteResult {
    #[serde(rename = "Untagged", skip_serializing_if = "Option::is_none")]
    pub untagged: Option<String>,
}

/// Partial-failure report of a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBulkDeleteResult {
    /// Digest to the reason it could not be deleted.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error: Option<BTreeMap<String, ImageBulkDeleteError>>,

    /// Digests which were deleted.
    #[serde(rename = "success", skip_serializing_if = "Option::is_none")]
    pub success: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageBulkDeleteError {
    #[serde(rename = "code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Model for RemoteApiImage {
    const NAME: &'static str = "RemoteAPIImage";
}

impl Model for ImageDigest {
    const NAME: &'static str = "ImageDigest";
}

impl Model for VaReport {
    const NAME: &'static str = "VAReport";
}

impl Model for ImageDeleteResult {
    const NAME: &'static str = "ImageDeleteResult";
}

impl Model for ImageBulkDeleteResult {
    const NAME: &'static str = "ImageBulkDeleteResult";
}

impl Model for ImageBulkDeleteError {
    const NAME: &'static str = "ImageBulkDeleteError";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decode_list;
    use serde_json::json;

    #[test]
    fn test_image_digest_nested_repo_tags() {
        let value = json!({"repoTags": {"ns/repo": {"1": {"vulnerable": "yes", "issueCount": 2}}}});
        let digest = ImageDigest::from_value(value.clone()).unwrap();

        let repo_tags = digest.repo_tags.as_ref().unwrap();
        assert_eq!(repo_tags["ns/repo"]["1"].issue_count, Some(2));
        assert_eq!(
            digest.va_report("ns/repo", "1").and_then(|r| r.vulnerable.as_deref()),
            Some("yes")
        );
        assert!(digest.va_report("ns/repo", "2").is_none());
        assert!(!digest.is_untagged());
        assert_eq!(digest.to_value().unwrap(), value);
    }

    #[test]
    fn test_image_digest_listing_round_trip() {
        let value = json!([{
            "created": 7,
            "id": "sha256:a9be",
            "manifestType": "application/vnd.docker.distribution.manifest.v2+json",
            "repoTags": {"birds/bird": {"latest": {
                "configurationIssueCount": 25,
                "exemptIssueCount": 18,
                "issueCount": 11,
                "vulnerabilityCount": 19,
                "vulnerable": "vulnerable"
            }}},
            "size": 4
        }, {
            "id": "sha256:ffff",
            "repoTags": {"birds/bird": {}}
        }]);
        let digests = decode_list::<ImageDigest>(value.clone()).unwrap();
        assert_eq!(digests.len(), 2);
        assert!(digests[1].is_untagged());
        let encoded: Vec<_> = digests.iter().map(|d| d.to_value().unwrap()).collect();
        assert_eq!(serde_json::Value::Array(encoded), value);
    }

    #[test]
    fn test_delete_result_uses_pascal_case() {
        let result = ImageDeleteResult::from_value(json!({"Untagged": "icr.io/ns/repo:tag"})).unwrap();
        assert_eq!(result.untagged.as_deref(), Some("icr.io/ns/repo:tag"));
        assert_eq!(result.to_value().unwrap(), json!({"Untagged": "icr.io/ns/repo:tag"}));

        // the lower-case spelling is not the wire name
        let result = ImageDeleteResult::from_value(json!({"untagged": "x"})).unwrap();
        assert!(result.untagged.is_none());
    }

    #[test]
    fn test_bulk_delete_result_error_map() {
        let value = json!({
            "error": {"us.icr.io/birds/bird@sha256:a9be": {"code": "CRG0009", "message": "not found"}},
            "success": ["us.icr.io/birds/bird@sha256:ffff"]
        });
        let result = ImageBulkDeleteResult::from_value(value.clone()).unwrap();
        let errors = result.error.as_ref().unwrap();
        assert_eq!(
            errors["us.icr.io/birds/bird@sha256:a9be"].code.as_deref(),
            Some("CRG0009")
        );
        assert_eq!(result.to_value().unwrap(), value);
    }

    #[test]
    fn test_remote_api_image_round_trip() {
        let value = json!({
            "ConfigurationIssueCount": 25,
            "Created": 7,
            "DigestTags": {"sha256:a9be": ["inner"]},
            "ExemptIssueCount": 18,
            "Id": "id",
            "IssueCount": 11,
            "Labels": {"maintainer": "birds"},
            "ManifestType": "manifest_type",
            "ParentId": "parent_id",
            "RepoDigests": ["repo_digests"],
            "RepoTags": ["repo_tags"],
            "Size": 4,
            "VirtualSize": 12,
            "VulnerabilityCount": 19,
            "Vulnerable": "vulnerable"
        });
        let image = RemoteApiImage::from_value(value.clone()).unwrap();
        assert_eq!(image.virtual_size, Some(12));
        assert_eq!(image.labels.as_ref().unwrap()["maintainer"], "birds");
        assert_eq!(image.to_value().unwrap(), value);
        assert_eq!(RemoteApiImage::from_value(image.to_value().unwrap()).unwrap(), image);
    }

    #[test]
    fn test_va_report_rejects_wrongly_typed_counts() {
        let err = VaReport::from_value(json!({"issueCount": "two"})).unwrap_err();
        assert!(matches!(err, crate::error::RegistryError::Decode(_)));
    }
}
