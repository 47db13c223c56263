//! Cloud application model produced by the builder, and the deployed-state
//! snapshot it consumes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::{self, Parameters};
use crate::error::Result;
use crate::resource::ResourceType;

/// Protocol of an application port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
  #[default]
  Http,
  Tcp,
  Tcps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationPort {
  pub port: u16,
  pub port_type: PortType,
}

/// Staging settings of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Staging {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub buildpacks: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stack: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub health_check_timeout: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub health_check_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub health_check_http_endpoint: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ssh_enabled: Option<bool>,
}

/// A one-off task scheduled against an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Task {
  pub name: String,
  pub command: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub memory: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disk_quota: Option<u64>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
}

/// Environment changes that trigger a restart of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RestartParameters {
  pub restart_on_vcap_app_change: bool,
  pub restart_on_vcap_services_change: bool,
  pub restart_on_user_provided_change: bool,
}

impl Default for RestartParameters {
  fn default() -> Self {
    Self {
      restart_on_vcap_app_change: true,
      restart_on_vcap_services_change: true,
      restart_on_user_provided_change: true,
    }
  }
}

/// Registry credentials for a docker image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerCredentials {
  pub username: String,
  pub password: String,
}

/// Docker image an application is pushed from instead of a bits upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerInfo {
  pub image: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub credentials: Option<DockerCredentials>,
}

/// An existing service key exposed to an application as an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceKeyToInject {
  pub env_var_name: String,
  pub service_name: String,
  pub service_key_name: String,
}

/// Deployable representation of one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CloudApplication {
  pub name: String,
  pub module_name: String,
  pub staging: Staging,
  /// Memory in megabytes.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub memory: Option<u64>,
  /// Disk quota in megabytes.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub disk_quota: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instances: Option<u64>,
  pub routes: Vec<String>,
  pub idle_routes: Vec<String>,
  pub temp_routes: Vec<String>,
  /// Names of the services bound to the application.
  pub services: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub service_keys_to_inject: Vec<ServiceKeyToInject>,
  /// Binding parameters keyed by service name.
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub binding_parameters: BTreeMap<String, Parameters>,
  pub env: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tasks: Vec<Task>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ports: Vec<ApplicationPort>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub domains: Vec<String>,
  pub restart_parameters: RestartParameters,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub docker: Option<DockerInfo>,
}

/// A service instance to create or update for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CloudService {
  pub name: String,
  pub resource_name: String,
  pub resource_type: ResourceType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plan: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub provider: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub credentials: Parameters,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub alternative_labels: Vec<String>,
  pub shared: bool,
  pub ignore_update_errors: bool,
}

/// A module already running in the target environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DeployedModule {
  pub module_name: String,
  pub app_name: String,
  pub services: Vec<String>,
  pub provided_dependency_names: Vec<String>,
}

/// Snapshot of what is already deployed for an MTA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DeployedMta {
  pub modules: Vec<DeployedModule>,
  pub services: Vec<String>,
}

impl DeployedMta {
  pub fn from_yaml_str(content: &str) -> Result<Self> {
    descriptor::from_yaml_str("deployed state", content)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    descriptor::from_file("deployed state", path)
  }

  pub fn module(&self, name: &str) -> Option<&DeployedModule> {
    self.modules.iter().find(|m| m.module_name == name)
  }

  pub fn module_names(&self) -> impl Iterator<Item = &str> {
    self.modules.iter().map(|m| m.module_name.as_str())
  }
}
