//! Parameter chains: ordered override layers for one descriptor entity.
//!
//! A chain lists the parameter mappings that apply to a module, resource or
//! required dependency, ordered from the most specific layer (the outermost
//! extension descriptor) to the least specific (system parameters derived
//! from the target configuration). Lookups scan the chain front to back and
//! take the first layer containing the key.
//!
//! # Module chain
//!
//! 1. extension module layers, last applied first
//! 2. base module parameters
//! 3. platform module-type parameters
//! 4. extension descriptor-wide parameters, last applied first
//! 5. base descriptor-wide parameters
//! 6. system parameters
//!
//! Resource chains follow the same order with the platform resource-type
//! layer in place of the module type and no system layer. Dependency chains
//! consist of the extension dependency layers followed by the base
//! dependency.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::config::TargetConfig;
use crate::descriptor::{DeploymentDescriptor, ExtensionDescriptor, Module, Parameters, Resource};

/// Ordered parameter layers for one entity, most specific first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterChain {
  layers: Vec<Parameters>,
}

impl ParameterChain {
  pub fn new(layers: Vec<Parameters>) -> Self {
    Self { layers }
  }

  pub fn layers(&self) -> &[Parameters] {
    &self.layers
  }

  /// A new chain with `layer` placed in front of all existing layers.
  pub fn with_front(&self, layer: Parameters) -> Self {
    let mut layers = Vec::with_capacity(self.layers.len() + 1);
    layers.push(layer);
    layers.extend(self.layers.iter().cloned());
    Self { layers }
  }

  /// Flatten the chain into one mapping where earlier layers win.
  pub fn merged(&self) -> Parameters {
    let mut merged = Parameters::new();
    for layer in self.layers.iter().rev() {
      for (key, value) in layer {
        merged.insert(key.clone(), value.clone());
      }
    }
    merged
  }
}

/// Key of a required-dependency chain: `(module name, dependency name)`.
type DependencyKey = (String, String);

/// Chains for every entity of a descriptor and its extension layers.
///
/// Built once per descriptor and extension set, then shared by every lookup
/// made while compiling that descriptor.
#[derive(Debug, Clone, Default)]
pub struct ChainResolver {
  module_parameters: BTreeMap<String, ParameterChain>,
  module_properties: BTreeMap<String, ParameterChain>,
  resource_parameters: BTreeMap<String, ParameterChain>,
  resource_properties: BTreeMap<String, ParameterChain>,
  dependency_parameters: BTreeMap<DependencyKey, ParameterChain>,
  dependency_properties: BTreeMap<DependencyKey, ParameterChain>,
  resource_active: BTreeMap<String, bool>,
}

impl ChainResolver {
  /// Build chains for all modules, resources and dependencies.
  ///
  /// `extensions` are given in the order they are applied: the last entry is
  /// the outermost, most specific layer.
  pub fn new(descriptor: &DeploymentDescriptor, extensions: &[ExtensionDescriptor], config: &TargetConfig) -> Self {
    let mut resolver = Self::default();
    let outermost_first: Vec<&ExtensionDescriptor> = extensions.iter().rev().collect();

    for module in &descriptor.modules {
      resolver.add_module(descriptor, &outermost_first, config, module);
    }
    for resource in &descriptor.resources {
      resolver.add_resource(descriptor, &outermost_first, config, resource);
    }

    debug!(
      modules = resolver.module_parameters.len(),
      resources = resolver.resource_parameters.len(),
      extensions = extensions.len(),
      "built parameter chains"
    );

    resolver
  }

  fn add_module(
    &mut self,
    descriptor: &DeploymentDescriptor,
    extensions: &[&ExtensionDescriptor],
    config: &TargetConfig,
    module: &Module,
  ) {
    let mut parameters: Vec<Parameters> = extensions
      .iter()
      .filter_map(|ext| ext.module(&module.name))
      .map(|m| m.parameters.clone())
      .collect();
    parameters.push(module.parameters.clone());
    if let Some(type_defaults) = module.module_type.as_ref().and_then(|t| config.module_types.get(t)) {
      parameters.push(type_defaults.clone());
    }
    parameters.extend(extensions.iter().map(|ext| ext.parameters.clone()));
    parameters.push(descriptor.parameters.clone());
    parameters.push(config.system_parameters(&module.name));

    let mut properties: Vec<Parameters> = extensions
      .iter()
      .filter_map(|ext| ext.module(&module.name))
      .map(|m| m.properties.clone())
      .collect();
    properties.push(module.properties.clone());

    trace!(module = %module.name, layers = parameters.len(), "module chain");
    self
      .module_parameters
      .insert(module.name.clone(), ParameterChain::new(parameters));
    self
      .module_properties
      .insert(module.name.clone(), ParameterChain::new(properties));

    for dependency in &module.requires {
      let name = dependency.name();
      let overlays: Vec<_> = extensions
        .iter()
        .filter_map(|ext| ext.module(&module.name))
        .filter_map(|m| m.dependency(name))
        .collect();

      let mut dep_parameters: Vec<Parameters> = overlays.iter().map(|d| d.parameters.clone()).collect();
      let mut dep_properties: Vec<Parameters> = overlays.iter().map(|d| d.properties.clone()).collect();
      if let Some(structured) = dependency.as_structured() {
        dep_parameters.push(structured.parameters.clone());
        dep_properties.push(structured.properties.clone());
      }

      let key = (module.name.clone(), name.to_string());
      self
        .dependency_parameters
        .insert(key.clone(), ParameterChain::new(dep_parameters));
      self
        .dependency_properties
        .insert(key, ParameterChain::new(dep_properties));
    }
  }

  fn add_resource(
    &mut self,
    descriptor: &DeploymentDescriptor,
    extensions: &[&ExtensionDescriptor],
    config: &TargetConfig,
    resource: &Resource,
  ) {
    let overlays: Vec<_> = extensions
      .iter()
      .filter_map(|ext| ext.resource(&resource.name))
      .collect();

    let mut parameters: Vec<Parameters> = overlays.iter().map(|r| r.parameters.clone()).collect();
    parameters.push(resource.parameters.clone());
    if let Some(type_defaults) = resource
      .resource_type
      .as_ref()
      .and_then(|t| config.resource_types.get(t))
    {
      parameters.push(type_defaults.clone());
    }
    parameters.extend(extensions.iter().map(|ext| ext.parameters.clone()));
    parameters.push(descriptor.parameters.clone());

    let mut properties: Vec<Parameters> = overlays.iter().map(|r| r.properties.clone()).collect();
    properties.push(resource.properties.clone());

    let active = overlays
      .iter()
      .find_map(|r| r.active)
      .unwrap_or(resource.active);

    self
      .resource_parameters
      .insert(resource.name.clone(), ParameterChain::new(parameters));
    self
      .resource_properties
      .insert(resource.name.clone(), ParameterChain::new(properties));
    self.resource_active.insert(resource.name.clone(), active);
  }

  /// The parameter chain of a module or resource.
  pub fn chain_for(&self, entity: &str) -> Option<&ParameterChain> {
    self
      .module_parameters
      .get(entity)
      .or_else(|| self.resource_parameters.get(entity))
  }

  pub fn module_chain(&self, module: &str) -> Option<&ParameterChain> {
    self.module_parameters.get(module)
  }

  pub fn module_properties(&self, module: &str) -> Option<&ParameterChain> {
    self.module_properties.get(module)
  }

  pub fn resource_chain(&self, resource: &str) -> Option<&ParameterChain> {
    self.resource_parameters.get(resource)
  }

  pub fn resource_properties(&self, resource: &str) -> Option<&ParameterChain> {
    self.resource_properties.get(resource)
  }

  pub fn dependency_chain(&self, module: &str, dependency: &str) -> Option<&ParameterChain> {
    self
      .dependency_parameters
      .get(&(module.to_string(), dependency.to_string()))
  }

  pub fn dependency_properties(&self, module: &str, dependency: &str) -> Option<&ParameterChain> {
    self
      .dependency_properties
      .get(&(module.to_string(), dependency.to_string()))
  }

  /// The effective `active` flag of a resource after extensions.
  pub fn is_resource_active(&self, resource: &str) -> bool {
    self.resource_active.get(resource).copied().unwrap_or(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::{DependencyRef, ModuleExtension, RequiredDependency, RequiredDependencyExtension, ResourceExtension};
  use serde_json::json;

  fn params(value: serde_json::Value) -> Parameters {
    serde_json::from_value(value).unwrap()
  }

  fn descriptor() -> DeploymentDescriptor {
    DeploymentDescriptor {
      schema_version: "3.1".to_string(),
      id: "shop".to_string(),
      parameters: params(json!({ "memory": "128M", "region": "base" })),
      modules: vec![Module {
        name: "web".to_string(),
        module_type: Some("javascript.nodejs".to_string()),
        parameters: params(json!({ "memory": "256M", "host": "shop" })),
        properties: params(json!({ "LOG_LEVEL": "info" })),
        requires: vec![DependencyRef::Structured(RequiredDependency {
          name: "db".to_string(),
          parameters: params(json!({ "config": { "pool": 5 } })),
          ..Default::default()
        })],
        ..Default::default()
      }],
      resources: vec![Resource {
        name: "db".to_string(),
        parameters: params(json!({ "service": "postgresql" })),
        ..Default::default()
      }],
      ..Default::default()
    }
  }

  fn extension(id: &str, memory: &str) -> ExtensionDescriptor {
    ExtensionDescriptor {
      id: id.to_string(),
      extends: "shop".to_string(),
      parameters: params(json!({ "region": id })),
      modules: vec![ModuleExtension {
        name: "web".to_string(),
        parameters: params(json!({ "memory": memory })),
        properties: params(json!({ "LOG_LEVEL": "debug" })),
        requires: vec![RequiredDependencyExtension {
          name: "db".to_string(),
          parameters: params(json!({ "config": { "pool": 50 } })),
          ..Default::default()
        }],
      }],
      resources: vec![ResourceExtension {
        name: "db".to_string(),
        active: Some(false),
        ..Default::default()
      }],
      ..Default::default()
    }
  }

  #[test]
  fn module_chain_orders_layers_most_specific_first() {
    let config = TargetConfig {
      default_domain: Some("example.com".to_string()),
      module_types: BTreeMap::from([(
        "javascript.nodejs".to_string(),
        params(json!({ "buildpack": "nodejs_buildpack" })),
      )]),
      ..Default::default()
    };
    let exts = [extension("staging", "512M"), extension("prod", "1G")];
    let resolver = ChainResolver::new(&descriptor(), &exts, &config);

    let chain = resolver.chain_for("web").unwrap();
    let layers = chain.layers();
    assert_eq!(layers.len(), 8);
    assert_eq!(layers[0]["memory"], "1G");
    assert_eq!(layers[1]["memory"], "512M");
    assert_eq!(layers[2]["memory"], "256M");
    assert_eq!(layers[3]["buildpack"], "nodejs_buildpack");
    assert_eq!(layers[4]["region"], "prod");
    assert_eq!(layers[5]["region"], "staging");
    assert_eq!(layers[6]["region"], "base");
    assert_eq!(layers[7]["default-domain"], "example.com");
  }

  #[test]
  fn merged_prefers_earlier_layers() {
    let chain = ParameterChain::new(vec![
      params(json!({ "a": 1 })),
      params(json!({ "a": 2, "b": 2 })),
    ]);
    let merged = chain.merged();
    assert_eq!(merged["a"], 1);
    assert_eq!(merged["b"], 2);
  }

  #[test]
  fn with_front_leaves_original_untouched() {
    let chain = ParameterChain::new(vec![params(json!({ "a": 1 }))]);
    let annotated = chain.with_front(params(json!({ "dependency-type": "soft" })));

    assert_eq!(chain.layers().len(), 1);
    assert_eq!(annotated.layers().len(), 2);
    assert_eq!(annotated.layers()[0]["dependency-type"], "soft");
  }

  #[test]
  fn dependency_and_property_chains() {
    let exts = [extension("prod", "1G")];
    let resolver = ChainResolver::new(&descriptor(), &exts, &TargetConfig::default());

    let dep = resolver.dependency_chain("web", "db").unwrap();
    assert_eq!(dep.layers()[0]["config"]["pool"], 50);
    assert_eq!(dep.layers()[1]["config"]["pool"], 5);

    let props = resolver.module_properties("web").unwrap().merged();
    assert_eq!(props["LOG_LEVEL"], "debug");
  }

  #[test]
  fn extension_can_deactivate_resource() {
    let resolver = ChainResolver::new(&descriptor(), &[], &TargetConfig::default());
    assert!(resolver.is_resource_active("db"));

    let resolver = ChainResolver::new(&descriptor(), &[extension("prod", "1G")], &TargetConfig::default());
    assert!(!resolver.is_resource_active("db"));
    assert_eq!(resolver.resource_chain("db").unwrap().merged()["service"], "postgresql");
  }

  #[test]
  fn unknown_entity_has_no_chain() {
    let resolver = ChainResolver::new(&descriptor(), &[], &TargetConfig::default());
    assert!(resolver.chain_for("missing").is_none());
    assert!(resolver.chain_for("db").is_some());
  }
}
