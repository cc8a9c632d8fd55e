//! Account-level plans, quotas and settings

use crate::error::Result;
use crate::models::{AccountSettings, Model, Plan, Quota};
use crate::registry::client::ContainerRegistryClient;
use crate::registry::request::RequestBuilder;
use crate::registry::response::DetailedResponse;
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePlansOptions {
    /// Plan name, e.g. `Standard`.
    #[serde(rename = "plan", skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl UpdatePlansOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }
}

/// New quota limits. `-1` removes a limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateQuotaOptions {
    #[serde(rename = "storage_megabytes", skip_serializing_if = "Option::is_none")]
    pub storage_megabytes: Option<i64>,

    #[serde(rename = "traffic_megabytes", skip_serializing_if = "Option::is_none")]
    pub traffic_megabytes: Option<i64>,
}

impl UpdateQuotaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_megabytes(mut self, storage_megabytes: i64) -> Self {
        self.storage_megabytes = Some(storage_megabytes);
        self
    }

    pub fn with_traffic_megabytes(mut self, traffic_megabytes: i64) -> Self {
        self.traffic_megabytes = Some(traffic_megabytes);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSettingsOptions {
    /// Send registry metrics to the platform monitoring service.
    #[serde(rename = "platform_metrics", skip_serializing_if = "Option::is_none")]
    pub platform_metrics: Option<bool>,
}

impl UpdateSettingsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform_metrics(mut self, platform_metrics: bool) -> Self {
        self.platform_metrics = Some(platform_metrics);
        self
    }
}

impl ContainerRegistryClient {
    pub async fn get_plans(&self) -> Result<DetailedResponse<Plan>> {
        let request = RequestBuilder::new(Method::GET, "get_plans", "/api/v1/plans").accept_json();
        self.execute(request, Plan::from_value).await
    }

    pub async fn update_plans(&self, options: &UpdatePlansOptions) -> Result<DetailedResponse<()>> {
        let request =
            RequestBuilder::new(Method::PATCH, "update_plans", "/api/v1/plans").json_body(options)?;
        self.execute_empty(request).await
    }

    /// Current quota limits and usage of the account.
    pub async fn get_quota(&self) -> Result<DetailedResponse<Quota>> {
        let request = RequestBuilder::new(Method::GET, "get_quota", "/api/v1/quotas").accept_json();
        self.execute(request, Quota::from_value).await
    }

    pub async fn update_quota(&self, options: &UpdateQuotaOptions) -> Result<DetailedResponse<()>> {
        let request =
            RequestBuilder::new(Method::PATCH, "update_quota", "/api/v1/quotas").json_body(options)?;
        self.execute_empty(request).await
    }

    pub async fn get_settings(&self) -> Result<DetailedResponse<AccountSettings>> {
        let request =
            RequestBuilder::new(Method::GET, "get_settings", "/api/v1/settings").accept_json();
        self.execute(request, AccountSettings::from_value).await
    }

    pub async fn update_settings(
        &self,
        options: &UpdateSettingsOptions,
    ) -> Result<DetailedResponse<()>> {
        let request = RequestBuilder::new(Method::PATCH, "update_settings", "/api/v1/settings")
            .json_body(options)?;
        self.execute_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quota_body_omits_unset_limits() {
        let options = UpdateQuotaOptions::new().with_traffic_megabytes(480);
        assert_eq!(serde_json::to_value(&options).unwrap(), json!({"traffic_megabytes": 480}));
    }

    #[test]
    fn test_update_bodies() {
        assert_eq!(
            serde_json::to_value(UpdatePlansOptions::new().with_plan("Standard")).unwrap(),
            json!({"plan": "Standard"})
        );
        assert_eq!(
            serde_json::to_value(UpdateSettingsOptions::new().with_platform_metrics(false)).unwrap(),
            json!({"platform_metrics": false})
        );
    }
}
