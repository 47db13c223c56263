//! Target environment configuration.
//!
//! The configuration describes where an MTA is being deployed: default
//! domains and ports, namespacing, platform endpoints used by placeholders,
//! and platform type layers. It is loaded from YAML or JSON and can be
//! adjusted through `MTAC_*` environment variables.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
  ENV_DEFAULT_DOMAIN, ENV_NAMESPACE, ENV_PRETTY_PRINTING, PARAM_DEFAULT_DOMAIN, PARAM_DEFAULT_HOST,
  PARAM_DEFAULT_IDLE_DOMAIN, PARAM_DEFAULT_PORT, PARAM_DEFAULT_TEMP_DOMAIN, PARAM_DEFAULT_TEMP_HOST,
  TEMP_HOST_SUFFIX,
};
use crate::descriptor::{self, Parameters};
use crate::error::{CompileError, Result};
use crate::naming;
use crate::placeholder::{Placeholder, PlaceholderError, Resolver};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TargetConfig {
  /// Domain used for routes that name no domain.
  pub default_domain: Option<String>,

  /// Domain that idle routes are moved to during blue-green deployment.
  pub default_idle_domain: Option<String>,

  /// Domain for temporary routes while both variants are live.
  pub default_temp_domain: Option<String>,

  /// Port used when a module names no port.
  pub default_port: Option<u16>,

  /// Build `domain:port` temporary routes instead of host-based ones.
  pub port_based_routing: bool,

  pub namespace: Option<String>,

  /// Prefix application names with the namespace.
  pub use_namespaces: bool,

  /// Prefix service names with the namespace.
  pub use_namespaces_for_services: bool,

  /// Pretty-print JSON values in generated environments.
  pub pretty_printing: bool,

  /// Exported as `DEPLOY_ID` to modules with `check-deploy-id`.
  pub deploy_id: Option<String>,

  pub endpoints: PlatformEndpoints,

  /// Parameter defaults per module type.
  pub module_types: BTreeMap<String, Parameters>,

  /// Parameter defaults per platform resource type.
  pub resource_types: BTreeMap<String, Parameters>,
}

/// Platform endpoint values substituted into placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlatformEndpoints {
  pub controller_url: Option<String>,
  pub authorization_url: Option<String>,
  pub deploy_service_url: Option<String>,
  pub protocol: Option<String>,
  pub router_port: Option<String>,
}

impl TargetConfig {
  pub fn from_yaml_str(content: &str) -> Result<Self> {
    descriptor::from_yaml_str("target configuration", content)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    descriptor::from_file("target configuration", path)
  }

  /// Apply `MTAC_DEFAULT_DOMAIN`, `MTAC_NAMESPACE` and `MTAC_PRETTY_PRINTING`.
  ///
  /// # Errors
  ///
  /// Returns `InvalidValue` if `MTAC_PRETTY_PRINTING` is not a boolean.
  pub fn apply_env_overrides(&mut self) -> Result<()> {
    if let Ok(domain) = std::env::var(ENV_DEFAULT_DOMAIN)
      && !domain.is_empty()
    {
      debug!(domain = %domain, "default domain overridden from environment");
      self.default_domain = Some(domain);
    }

    if let Ok(namespace) = std::env::var(ENV_NAMESPACE)
      && !namespace.is_empty()
    {
      debug!(namespace = %namespace, "namespace overridden from environment");
      self.namespace = Some(namespace);
      self.use_namespaces = true;
    }

    if let Ok(value) = std::env::var(ENV_PRETTY_PRINTING) {
      self.pretty_printing = match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => {
          return Err(CompileError::InvalidValue {
            key: ENV_PRETTY_PRINTING.to_string(),
            value,
            reason: "expected a boolean".to_string(),
          });
        }
      };
    }

    Ok(())
  }

  /// The namespace to apply to application names, if namespacing is on.
  pub fn app_namespace(&self) -> Option<&str> {
    self.namespace.as_deref().filter(|_| self.use_namespaces)
  }

  /// The namespace to apply to service names, if namespacing is on.
  pub fn service_namespace(&self) -> Option<&str> {
    self
      .namespace
      .as_deref()
      .filter(|_| self.use_namespaces && self.use_namespaces_for_services)
  }

  /// System parameters appended as the last layer of a module's chain.
  ///
  /// `default-host` is only generated when a default domain exists: a
  /// module without any domain keeps an empty host set. `default-temp-host`
  /// is `<module>-temp`, namespaced like the application name.
  pub fn system_parameters(&self, module_name: &str) -> Parameters {
    let mut params = Parameters::new();

    if let Some(domain) = &self.default_domain {
      params.insert(PARAM_DEFAULT_DOMAIN.to_string(), domain.clone().into());
      let host = naming::namespaced(module_name, self.app_namespace());
      params.insert(PARAM_DEFAULT_HOST.to_string(), host.into());
    }
    if let Some(domain) = &self.default_idle_domain {
      params.insert(PARAM_DEFAULT_IDLE_DOMAIN.to_string(), domain.clone().into());
    }
    // Temporary routes fall back to the default domain.
    if let Some(domain) = self.default_temp_domain.as_ref().or(self.default_domain.as_ref()) {
      params.insert(PARAM_DEFAULT_TEMP_DOMAIN.to_string(), domain.clone().into());
      let host = naming::namespaced(&format!("{module_name}{TEMP_HOST_SUFFIX}"), self.app_namespace());
      params.insert(PARAM_DEFAULT_TEMP_HOST.to_string(), host.into());
    }
    if let Some(port) = self.default_port
      && port != 0
    {
      params.insert(PARAM_DEFAULT_PORT.to_string(), port.into());
    }

    params
  }
}

impl Resolver for TargetConfig {
  fn resolve(&self, placeholder: Placeholder) -> std::result::Result<&str, PlaceholderError> {
    let value = match placeholder {
      Placeholder::ControllerEndpoint => &self.endpoints.controller_url,
      Placeholder::AuthorizationEndpoint => &self.endpoints.authorization_url,
      Placeholder::DeployServiceUrl => &self.endpoints.deploy_service_url,
      Placeholder::DefaultDomain => &self.default_domain,
      Placeholder::Protocol => &self.endpoints.protocol,
      Placeholder::RouterPort => &self.endpoints.router_port,
    };
    value
      .as_deref()
      .ok_or_else(|| PlaceholderError::Unresolved(placeholder.name().to_string()))
  }
}
