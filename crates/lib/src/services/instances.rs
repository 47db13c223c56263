//! Service instances to create for the descriptor's resources.

use tracing::{debug, warn};

use crate::consts::{
  PARAM_IGNORE_UPDATE_ERRORS, PARAM_SERVICE, PARAM_SERVICE_ALTERNATIVES, PARAM_SERVICE_CONFIG, PARAM_SERVICE_PLAN,
  PARAM_SERVICE_PROVIDER, PARAM_SERVICE_TAGS, PARAM_SERVICE_VERSION, PARAM_SHARED,
};
use crate::descriptor::{DeploymentDescriptor, Parameters};
use crate::error::{CompileError, Result};
use crate::lookup::scalar_to_string;
use crate::model::CloudService;
use crate::resource::ResourceType;

use super::ServiceResolver;

/// Builds the service instances of every service resource in the descriptor.
pub struct ServicesBuilder<'a> {
  descriptor: &'a DeploymentDescriptor,
  resolver: ServiceResolver<'a>,
}

impl<'a> ServicesBuilder<'a> {
  pub fn new(descriptor: &'a DeploymentDescriptor, resolver: ServiceResolver<'a>) -> Self {
    Self { descriptor, resolver }
  }

  /// One service per classified, active resource in declaration order.
  ///
  /// Existing service keys are not services and produce nothing.
  pub fn build(&self) -> Result<Vec<CloudService>> {
    let mut services = Vec::new();
    for resource in &self.descriptor.resources {
      let Some(service) = self.resolver.resolve(&resource.name)? else {
        continue;
      };
      if service.resource_type == ResourceType::ExistingServiceKey {
        continue;
      }

      let chain = self.resolver.resource_chain(&resource.name);
      let mut label = chain.get_string(PARAM_SERVICE)?;
      if service.resource_type == ResourceType::UserProvidedService && label.take().is_some() {
        warn!(resource = %resource.name, "ignoring service label of user-provided service");
      }

      let credentials = match chain.lookup(PARAM_SERVICE_CONFIG).value() {
        None => Parameters::new(),
        Some(serde_json::Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(other) => {
          return Err(CompileError::type_mismatch(
            format!("{}#{}", resource.name, PARAM_SERVICE_CONFIG),
            "map",
            other,
          ));
        }
      };

      services.push(CloudService {
        name: service.service_name,
        resource_name: resource.name.clone(),
        resource_type: service.resource_type,
        label,
        plan: chain.get_string(PARAM_SERVICE_PLAN)?,
        provider: chain.get_string(PARAM_SERVICE_PROVIDER)?,
        version: chain.get_string(PARAM_SERVICE_VERSION)?,
        tags: string_list(&chain, PARAM_SERVICE_TAGS)?,
        credentials,
        alternative_labels: string_list(&chain, PARAM_SERVICE_ALTERNATIVES)?,
        shared: chain.flag(PARAM_SHARED)?,
        ignore_update_errors: chain.flag(PARAM_IGNORE_UPDATE_ERRORS)?,
      });
    }

    debug!(count = services.len(), "built service instances");
    Ok(services)
  }
}

fn string_list(chain: &crate::chain::ParameterChain, key: &str) -> Result<Vec<String>> {
  match chain.get_list(key)? {
    None => Ok(Vec::new()),
    Some(items) => items
      .iter()
      .filter(|v| !v.is_null())
      .map(|v| scalar_to_string(key, v))
      .collect(),
  }
}
