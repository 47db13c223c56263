//! Service and binding resolution for modules.
//!
//! A module's dependencies are resolved against the descriptor's resources.
//! Dependencies that name no resource point at other modules' provided
//! dependencies and are skipped here.

mod instances;

pub use instances::ServicesBuilder;

use std::collections::BTreeMap;

use tracing::trace;

use crate::chain::{ChainResolver, ParameterChain};
use crate::consts::{
  PARAM_BINDING_CONFIG, PARAM_ENV_VAR_NAME, PARAM_SERVICE_KEY_NAME, PARAM_SERVICE_NAME, PARAM_SHARED,
};
use crate::descriptor::{DeploymentDescriptor, Module, Parameters, Resource, SchemaAdapter};
use crate::error::{CompileError, Result};
use crate::model::ServiceKeyToInject;
use crate::naming::ServiceNameMapper;
use crate::resource::{self, ResourceType};

/// Which of a module's services to include.
///
/// Existing service keys are never services and are left out of every
/// selection, `All` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
  /// Every classified service.
  All,
  /// Services the application binds to: everything but existing services.
  Bindable,
  /// Services flagged `shared: true`, except existing services.
  SharedOnly,
}

/// A dependency resolved to a classified resource.
#[derive(Debug, Clone)]
pub struct ResolvedService<'a> {
  pub resource: &'a Resource,
  pub resource_type: ResourceType,
  pub service_name: String,
}

/// Resolves a module's dependencies to service names, service keys and
/// binding parameters.
pub struct ServiceResolver<'a> {
  descriptor: &'a DeploymentDescriptor,
  chains: &'a ChainResolver,
  adapter: &'a dyn SchemaAdapter,
  mapper: &'a dyn ServiceNameMapper,
}

impl<'a> ServiceResolver<'a> {
  pub fn new(
    descriptor: &'a DeploymentDescriptor,
    chains: &'a ChainResolver,
    adapter: &'a dyn SchemaAdapter,
    mapper: &'a dyn ServiceNameMapper,
  ) -> Self {
    Self {
      descriptor,
      chains,
      adapter,
      mapper,
    }
  }

  pub(crate) fn resource_chain(&self, resource: &str) -> ParameterChain {
    self.chains.resource_chain(resource).cloned().unwrap_or_default()
  }

  /// Classify an active resource.
  ///
  /// Inactive resources are not services for schemas with optional resources.
  pub fn classify(&self, resource: &Resource) -> Result<Option<ResourceType>> {
    if !self.adapter.is_active(self.chains.is_resource_active(&resource.name)) {
      trace!(resource = %resource.name, "inactive resource");
      return Ok(None);
    }
    let chain = self.resource_chain(&resource.name);
    resource::classify(&resource.name, resource.resource_type.as_deref(), &chain, self.adapter)
  }

  /// The service name of a classified resource.
  pub fn service_name(&self, resource: &Resource, resource_type: ResourceType) -> Result<String> {
    let chain = self.resource_chain(&resource.name);
    let explicit = chain.get_str(PARAM_SERVICE_NAME)?;
    Ok(self.mapper.service_name(&resource.name, explicit, resource_type))
  }

  /// Resolve a dependency name to a classified service.
  ///
  /// # Errors
  ///
  /// Returns `Unresolvable` if no resource has that name.
  pub fn resolve(&self, dependency: &str) -> Result<Option<ResolvedService<'a>>> {
    let resource = self
      .descriptor
      .resource(dependency)
      .ok_or_else(|| CompileError::Unresolvable {
        name: dependency.to_string(),
      })?;

    let Some(resource_type) = self.classify(resource)? else {
      return Ok(None);
    };
    let service_name = self.service_name(resource, resource_type)?;
    Ok(Some(ResolvedService {
      resource,
      resource_type,
      service_name,
    }))
  }

  /// Dependencies of `module` that resolve to a service, in declaration order.
  fn resolved_dependencies(&self, module: &Module) -> Result<Vec<(&'a str, ResolvedService<'a>)>> {
    let mut resolved = Vec::new();
    for dependency in &module.requires {
      match self.resolve(dependency.name()) {
        Ok(Some(service)) => resolved.push((service.resource.name.as_str(), service)),
        Ok(None) => {}
        Err(CompileError::Unresolvable { name }) => {
          trace!(module = %module.name, dependency = %name, "dependency is not a resource");
        }
        Err(e) => return Err(e),
      }
    }
    Ok(resolved)
  }

  fn is_selected(&self, service: &ResolvedService<'_>, selection: Selection) -> Result<bool> {
    let existing = service.resource_type == ResourceType::ExistingService;
    Ok(match selection {
      Selection::All => true,
      Selection::Bindable => !existing,
      Selection::SharedOnly => !existing && self.resource_chain(&service.resource.name).flag(PARAM_SHARED)?,
    })
  }

  /// Service names of `module` for a selection, de-duplicated in order.
  pub fn services(&self, module: &Module, selection: Selection) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for (_, service) in self.resolved_dependencies(module)? {
      if service.resource_type == ResourceType::ExistingServiceKey {
        continue;
      }
      if self.is_selected(&service, selection)? && !names.contains(&service.service_name) {
        names.push(service.service_name);
      }
    }
    trace!(module = %module.name, ?selection, services = ?names, "selected services");
    Ok(names)
  }

  /// Existing service keys exposed to `module` through environment variables.
  pub fn service_keys_to_inject(&self, module: &Module) -> Result<Vec<ServiceKeyToInject>> {
    if !self.adapter.supports_service_key_injection() {
      return Ok(Vec::new());
    }

    let mut keys = Vec::new();
    for (resource_name, service) in self.resolved_dependencies(module)? {
      if service.resource_type != ResourceType::ExistingServiceKey {
        continue;
      }

      let chain = self.resource_chain(resource_name);
      let service_name = chain
        .get_string(PARAM_SERVICE_NAME)?
        .ok_or_else(|| CompileError::MissingRequiredParameter {
          resource: resource_name.to_string(),
          key: PARAM_SERVICE_NAME.to_string(),
        })?;
      let service_key_name = chain
        .get_string(PARAM_SERVICE_KEY_NAME)?
        .unwrap_or_else(|| resource_name.to_string());
      let env_var_name = match self.chains.dependency_chain(&module.name, resource_name) {
        Some(dep) => dep.get_string(PARAM_ENV_VAR_NAME)?,
        None => None,
      }
      .unwrap_or_else(|| service_key_name.clone());

      keys.push(ServiceKeyToInject {
        env_var_name,
        service_name,
        service_key_name,
      });
    }
    Ok(keys)
  }

  /// Binding parameters per bound service name.
  ///
  /// # Errors
  ///
  /// Returns `TypeMismatch` keyed `module#dependency#config` if a
  /// dependency's `config` is not a map.
  pub fn binding_parameters(&self, module: &Module) -> Result<BTreeMap<String, Parameters>> {
    let mut result = BTreeMap::new();
    if !self.adapter.supports_binding_parameters() {
      return Ok(result);
    }

    for (resource_name, service) in self.resolved_dependencies(module)? {
      if !self.is_selected(&service, Selection::Bindable)?
        || service.resource_type == ResourceType::ExistingServiceKey
      {
        continue;
      }
      let Some(chain) = self.chains.dependency_chain(&module.name, resource_name) else {
        continue;
      };
      match chain.lookup(PARAM_BINDING_CONFIG).value() {
        None => {}
        Some(serde_json::Value::Object(map)) => {
          let params: Parameters = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
          result.insert(service.service_name, params);
        }
        Some(other) => {
          return Err(CompileError::type_mismatch(
            format!("{}#{}#{}", module.name, resource_name, PARAM_BINDING_CONFIG),
            "map",
            other,
          ));
        }
      }
    }
    Ok(result)
  }
}
