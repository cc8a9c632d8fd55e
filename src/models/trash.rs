use super::Model;
use serde::{Deserialize, Serialize};

/// An image in the trash can, keyed by its digest reference in listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trash {
    #[serde(rename = "daysUntilExpiry", skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i32>,

    #[serde(rename = "tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Outcome of restoring a digest and its tags from the trash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreResult {
    /// Tags that were restored.
    #[serde(rename = "successful", skip_serializing_if = "Option::is_none")]
    pub successful: Option<Vec<String>>,

    /// Tags that could not be restored, typically because they now point at
    /// another image.
    #[serde(rename = "unsuccessful", skip_serializing_if = "Option::is_none")]
    pub unsuccessful: Option<Vec<String>>,
}

impl Model for Trash {
    const NAME: &'static str = "Trash";
}

impl Model for RestoreResult {
    const NAME: &'static str = "RestoreResult";
}
