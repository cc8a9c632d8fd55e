use super::Model;
use serde::{Deserialize, Serialize};

/// Account settings for the targeted account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSettings {
    /// Opt in to publishing platform metrics.
    #[serde(rename = "platform_metrics", skip_serializing_if = "Option::is_none")]
    pub platform_metrics: Option<bool>,
}

/// The authorization options for the targeted account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// Role based authorization when authenticating with IAM.
    #[serde(rename = "iam_authz", skip_serializing_if = "Option::is_none")]
    pub iam_authz: Option<bool>,

    /// Restrict the account to private connections for push and pull.
    #[serde(rename = "private_only", skip_serializing_if = "Option::is_none")]
    pub private_only: Option<bool>,
}

/// The plan of the targeted account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "plan", skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl Model for AccountSettings {
    const NAME: &'static str = "AccountSettings";
}

impl Model for AuthOptions {
    const NAME: &'static str = "AuthOptions";
}

impl Model for Plan {
    const NAME: &'static str = "Plan";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_options_round_trip() {
        let value = json!({"iam_authz": false, "private_only": true});
        let options = AuthOptions::from_value(value.clone()).unwrap();
        assert_eq!(options.iam_authz, Some(false));
        assert_eq!(options.private_only, Some(true));
        assert_eq!(options.to_value().unwrap(), value);
        assert_eq!(AuthOptions::from_value(options.to_value().unwrap()).unwrap(), options);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let options = AuthOptions {
            private_only: Some(false),
            ..Default::default()
        };
        assert_eq!(options.to_value().unwrap(), json!({"private_only": false}));
        assert_eq!(AccountSettings::default().to_value().unwrap(), json!({}));
    }

    #[test]
    fn test_plan_and_settings_decode() {
        let plan = Plan::from_json_str(r#"{"plan": "Standard", "extra": 1}"#).unwrap();
        assert_eq!(plan.plan.as_deref(), Some("Standard"));
        assert_eq!(plan.to_json_string().unwrap(), r#"{"plan":"Standard"}"#);

        let settings = AccountSettings::from_value(json!({"platform_metrics": true})).unwrap();
        assert_eq!(settings.platform_metrics, Some(true));
    }
}
