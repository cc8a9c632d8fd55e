//! API operations of [`ContainerRegistryClient`](super::ContainerRegistryClient),
//! one module per API area.
//!
//! Every operation with parameters takes an `...Options` struct. Required
//! parameters are `Option`s filled in by `new`, so a caller can still build
//! the struct without them; `validate` rejects that before any request is
//! built.

pub mod account_operations;
pub mod auth_operations;
pub mod image_operations;
pub mod messages_operations;
pub mod namespace_operations;
pub mod retention_operations;
pub mod tag_operations;
pub mod trash_operations;

pub use account_operations::{UpdatePlansOptions, UpdateQuotaOptions, UpdateSettingsOptions};
pub use auth_operations::UpdateAuthOptions;
pub use image_operations::{
    BulkDeleteImagesOptions, DeleteImageOptions, GetImageManifestOptions, InspectImageOptions,
    ListImageDigestsOptions, ListImagesOptions, TagImageOptions,
};
pub use namespace_operations::{
    AssignNamespaceOptions, CreateNamespaceOptions, DeleteNamespaceOptions,
};
pub use retention_operations::{
    AnalyzeRetentionPolicyOptions, GetRetentionPolicyOptions, RetentionPolicyOptions,
    SetRetentionPolicyOptions,
};
pub use tag_operations::DeleteImageTagOptions;
pub use trash_operations::{ListDeletedImagesOptions, RestoreImageOptions, RestoreTagsOptions};

use crate::error::{RegistryError, Result};

/// A required parameter that only has to be present.
pub(crate) fn require<'a>(value: &'a Option<String>, parameter: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(RegistryError::missing(parameter))
}

/// A required path parameter. An empty value would address a different
/// route, so it counts as missing.
pub(crate) fn require_segment<'a>(
    value: &'a Option<String>,
    parameter: &'static str,
) -> Result<&'a str> {
    match value.as_deref() {
        Some(segment) if !segment.is_empty() => Ok(segment),
        _ => Err(RegistryError::missing(parameter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require(&Some(String::new()), "toimage").unwrap(), "");
        assert!(matches!(
            require(&None, "toimage"),
            Err(RegistryError::MissingParameter { parameter: "toimage" })
        ));
    }

    #[test]
    fn test_require_segment_rejects_empty() {
        assert_eq!(require_segment(&Some("birds".to_string()), "name").unwrap(), "birds");
        assert!(matches!(
            require_segment(&Some(String::new()), "name"),
            Err(RegistryError::MissingParameter { parameter: "name" })
        ));
    }
}
