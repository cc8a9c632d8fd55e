use super::Model;
use serde::{Deserialize, Serialize};

/// Current usage and limits for the targeted account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    #[serde(rename = "limit", skip_serializing_if = "Option::is_none")]
    pub limit: Option<QuotaDetails>,

    #[serde(rename = "usage", skip_serializing_if = "Option::is_none")]
    pub usage: Option<QuotaDetails>,
}

/// Storage and traffic figures in bytes; `-1` means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaDetails {
    #[serde(rename = "storage_bytes", skip_serializing_if = "Option::is_none")]
    pub storage_bytes: Option<i64>,

    #[serde(rename = "traffic_bytes", skip_serializing_if = "Option::is_none")]
    pub traffic_bytes: Option<i64>,
}

impl QuotaDetails {
    pub const UNLIMITED: i64 = -1;

    pub fn storage_unlimited(&self) -> bool {
        self.storage_bytes == Some(Self::UNLIMITED)
    }

    pub fn traffic_unlimited(&self) -> bool {
        self.traffic_bytes == Some(Self::UNLIMITED)
    }
}

impl Model for Quota {
    const NAME: &'static str = "Quota";
}

impl Model for QuotaDetails {
    const NAME: &'static str = "QuotaDetails";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quota_nested_round_trip() {
        let value = json!({
            "limit": {"storage_bytes": 536870912, "traffic_bytes": -1},
            "usage": {"storage_bytes": 13, "traffic_bytes": 13}
        });
        let quota = Quota::from_value(value.clone()).unwrap();
        let limit = quota.limit.as_ref().unwrap();
        assert_eq!(limit.storage_bytes, Some(536870912));
        assert!(limit.traffic_unlimited());
        assert!(!limit.storage_unlimited());
        assert_eq!(quota.to_value().unwrap(), value);
    }

    #[test]
    fn test_partial_quota_keeps_absent_sides_unset() {
        let quota = Quota::from_value(json!({"usage": {"storage_bytes": 0}})).unwrap();
        assert!(quota.limit.is_none());
        let usage = quota.usage.unwrap();
        assert_eq!(usage.storage_bytes, Some(0));
        assert_eq!(usage.traffic_bytes, None);
    }
}
