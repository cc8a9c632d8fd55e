//! Docker-compatible image inspection records.

use super::Model;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The result of inspecting an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInspection {
    #[serde(rename = "Architecture", skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,

    #[serde(rename = "Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(rename = "Config", skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,

    /// ID of the container that created the image.
    #[serde(rename = "Container", skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,

    #[serde(rename = "ContainerConfig", skip_serializing_if = "Option::is_none")]
    pub container_config: Option<Config>,

    /// Creation timestamp, as the string the service returns.
    #[serde(rename = "Created", skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(rename = "DockerVersion", skip_serializing_if = "Option::is_none")]
    pub docker_version: Option<String>,

    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "ManifestType", skip_serializing_if = "Option::is_none")]
    pub manifest_type: Option<String>,

    #[serde(rename = "Os", skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    #[serde(rename = "OsVersion", skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,

    #[serde(rename = "Parent", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(rename = "RootFS", skip_serializing_if = "Option::is_none")]
    pub root_fs: Option<RootFs>,

    #[serde(rename = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// Sum of the sizes of every layer in the image.
    #[serde(rename = "VirtualSize", skip_serializing_if = "Option::is_none")]
    pub virtual_size: Option<i64>,
}

/// Container configuration snapshot stored with an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "ArgsEscaped", skip_serializing_if = "Option::is_none")]
    pub args_escaped: Option<bool>,

    #[serde(rename = "AttachStderr", skip_serializing_if = "Option::is_none")]
    pub attach_stderr: Option<bool>,

    #[serde(rename = "AttachStdin", skip_serializing_if = "Option::is_none")]
    pub attach_stdin: Option<bool>,

    #[serde(rename = "AttachStdout", skip_serializing_if = "Option::is_none")]
    pub attach_stdout: Option<bool>,

    #[serde(rename = "Cmd", skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,

    #[serde(rename = "Domainname", skip_serializing_if = "Option::is_none")]
    pub domainname: Option<String>,

    #[serde(rename = "Entrypoint", skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,

    #[serde(rename = "Env", skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,

    /// `"<port>/<proto>"` to an (empty) object.
    #[serde(rename = "ExposedPorts", skip_serializing_if = "Option::is_none")]
    pub exposed_ports: Option<BTreeMap<String, Map<String, Value>>>,

    #[serde(rename = "Healthcheck", skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthConfig>,

    #[serde(rename = "Hostname", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(rename = "Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "Labels", skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(rename = "MacAddress", skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(rename = "NetworkDisabled", skip_serializing_if = "Option::is_none")]
    pub network_disabled: Option<bool>,

    #[serde(rename = "OnBuild", skip_serializing_if = "Option::is_none")]
    pub on_build: Option<Vec<String>>,

    #[serde(rename = "OpenStdin", skip_serializing_if = "Option::is_none")]
    pub open_stdin: Option<bool>,

    #[serde(rename = "Shell", skip_serializing_if = "Option::is_none")]
    pub shell: Option<Vec<String>>,

    #[serde(rename = "StdinOnce", skip_serializing_if = "Option::is_none")]
    pub stdin_once: Option<bool>,

    #[serde(rename = "StopSignal", skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<String>,

    /// Seconds to wait before stopping the container.
    #[serde(rename = "StopTimeout", skip_serializing_if = "Option::is_none")]
    pub stop_timeout: Option<i32>,

    #[serde(rename = "Tty", skip_serializing_if = "Option::is_none")]
    pub tty: Option<bool>,

    #[serde(rename = "User", skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Mount point to an (empty) object.
    #[serde(rename = "Volumes", skip_serializing_if = "Option::is_none")]
    pub volumes: Option<BTreeMap<String, Map<String, Value>>>,

    #[serde(rename = "WorkingDir", skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// Healthcheck configuration. Durations are nanoseconds; zero means inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(rename = "Interval", skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,

    /// Consecutive failures before the container is unhealthy.
    #[serde(rename = "Retries", skip_serializing_if = "Option::is_none")]
    pub retries: Option<i32>,

    /// `[]` inherits, `["NONE"]` disables, `["CMD", ...]` or
    /// `["CMD-SHELL", cmd]` runs a check.
    #[serde(rename = "Test", skip_serializing_if = "Option::is_none")]
    pub test: Option<Vec<String>>,

    #[serde(rename = "Timeout", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}

impl HealthConfig {
    pub fn interval_duration(&self) -> Option<std::time::Duration> {
        self.interval
            .and_then(|ns| u64::try_from(ns).ok())
            .map(std::time::Duration::from_nanos)
    }

    pub fn timeout_duration(&self) -> Option<std::time::Duration> {
        self.timeout
            .and_then(|ns| u64::try_from(ns).ok())
            .map(std::time::Duration::from_nanos)
    }
}

/// Layer layout of the image filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootFs {
    #[serde(rename = "BaseLayer", skip_serializing_if = "Option::is_none")]
    pub base_layer: Option<String>,

    #[serde(rename = "Layers", skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,

    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
}

impl Model for ImageInspection {
    const NAME: &'static str = "ImageInspection";
}

impl Model for Config {
    const NAME: &'static str = "Config";
}

impl Model for HealthConfig {
    const NAME: &'static str = "HealthConfig";
}

impl Model for RootFs {
    const NAME: &'static str = "RootFS";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn config_json() -> Value {
        json!({
            "ArgsEscaped": true,
            "AttachStderr": false,
            "AttachStdin": true,
            "AttachStdout": false,
            "Cmd": ["cmd"],
            "Domainname": "domainname",
            "Entrypoint": ["entrypoint"],
            "Env": ["PATH=/usr/bin"],
            "ExposedPorts": {"8080/tcp": {}},
            "Healthcheck": {"Interval": 30000000000u64, "Retries": 3, "Test": ["CMD-SHELL", "true"], "Timeout": 5000000000u64},
            "Hostname": "hostname",
            "Image": "image",
            "Labels": {"maintainer": "birds"},
            "MacAddress": "mac_address",
            "NetworkDisabled": true,
            "OnBuild": [],
            "OpenStdin": true,
            "Shell": ["/bin/sh", "-c"],
            "StdinOnce": true,
            "StopSignal": "SIGTERM",
            "StopTimeout": 12,
            "Tty": false,
            "User": "user",
            "Volumes": {"/data": {}},
            "WorkingDir": "/app"
        })
    }

    #[test]
    fn test_inspection_round_trip() {
        let value = json!({
            "Architecture": "amd64",
            "Author": "author",
            "Comment": "comment",
            "Config": config_json(),
            "Container": "container",
            "ContainerConfig": config_json(),
            "Created": "2021-03-01T00:00:00Z",
            "DockerVersion": "20.10.5",
            "Id": "sha256:a9be",
            "ManifestType": "application/vnd.docker.distribution.manifest.v2+json",
            "Os": "linux",
            "OsVersion": "os_version",
            "Parent": "parent",
            "RootFS": {"BaseLayer": "base_layer", "Layers": ["sha256:1"], "Type": "layers"},
            "Size": 4,
            "VirtualSize": 12
        });
        let inspection = ImageInspection::from_value(value.clone()).unwrap();

        let config = inspection.config.as_ref().unwrap();
        assert_eq!(config.shell.as_deref(), Some(&["/bin/sh".to_string(), "-c".to_string()][..]));
        assert_eq!(config.on_build, Some(vec![]));
        assert!(config.exposed_ports.as_ref().unwrap().contains_key("8080/tcp"));
        assert_eq!(inspection.root_fs.as_ref().unwrap().fs_type.as_deref(), Some("layers"));
        assert_eq!(inspection.to_value().unwrap(), value);
        assert_eq!(ImageInspection::from_value(inspection.to_value().unwrap()).unwrap(), inspection);
    }

    #[test]
    fn test_healthcheck_durations() {
        let health = HealthConfig::from_value(json!({"Interval": 30000000000u64, "Timeout": -1})).unwrap();
        assert_eq!(health.interval_duration(), Some(Duration::from_secs(30)));
        assert_eq!(health.timeout_duration(), None);
        assert_eq!(health.retries, None);
    }

    #[test]
    fn test_sparse_config_encodes_only_present_fields() {
        let config = Config {
            cmd: Some(vec!["/bin/app".to_string()]),
            tty: Some(false),
            ..Default::default()
        };
        assert_eq!(config.to_value().unwrap(), json!({"Cmd": ["/bin/app"], "Tty": false}));
    }
}
