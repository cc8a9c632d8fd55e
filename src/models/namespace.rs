use super::Model;
use serde::{Deserialize, Serialize};

/// A namespace as returned by create and assign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(rename = "namespace", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Details of a namespace, including its resource group assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDetails {
    /// The IBM Cloud account that owns the namespace.
    #[serde(rename = "account", skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(rename = "created_date", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,

    /// Set once the namespace has been assigned to a resource group.
    #[serde(rename = "crn", skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,

    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "resource_created_date", skip_serializing_if = "Option::is_none")]
    pub resource_created_date: Option<String>,

    #[serde(rename = "resource_group", skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,

    #[serde(rename = "updated_date", skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}

impl Model for Namespace {
    const NAME: &'static str = "Namespace";
}

impl Model for NamespaceDetails {
    const NAME: &'static str = "NamespaceDetails";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_details_round_trip() {
        let value = json!({
            "account": "account",
            "created_date": "2021-03-01T00:00:00Z",
            "crn": "crn:v1:bluemix:public:container-registry:us-south:a/acct::namespace:birds",
            "name": "birds",
            "resource_created_date": "2021-03-02T00:00:00Z",
            "resource_group": "default",
            "updated_date": "2021-03-03T00:00:00Z"
        });
        let details = NamespaceDetails::from_value(value.clone()).unwrap();
        assert_eq!(details.name.as_deref(), Some("birds"));
        assert_eq!(details.resource_group.as_deref(), Some("default"));
        assert_eq!(details.to_value().unwrap(), value);
    }

    #[test]
    fn test_unassigned_namespace_has_no_crn() {
        let details = NamespaceDetails::from_value(json!({"name": "fish"})).unwrap();
        assert!(details.crn.is_none());
        assert_eq!(details.to_value().unwrap(), json!({"name": "fish"}));
    }
}
