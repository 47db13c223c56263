//! Cloud application model builder.
//!
//! One builder is created per deployment attempt. It owns the parameter
//! chains of the descriptor and its extensions and turns every deployable
//! module into a [`CloudApplication`].
//!
//! # Build steps
//!
//! 1. Every module chain is annotated with its `dependency-type` (`soft`
//!    unless the module says `hard`). The annotation is a new front layer;
//!    the descriptor and the resolver's chains are left untouched.
//! 2. Modules are visited in hard-dependency order. Modules missing from the
//!    archive or without a type are skipped (with a warning if they are
//!    deployed). Archived modules not intended for deployment are collected.
//!    Everything else is built.
//! 3. Archived but unintended modules fail the build, then intended modules
//!    that were neither built nor already deployed fail it. Each failure
//!    lists every offending module.

mod docker;
mod restart;
mod staging;
mod tasks;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::chain::{ChainResolver, ParameterChain};
use crate::config::TargetConfig;
use crate::consts::{
  APP_ATTRIBUTES, APP_PROPS, DEPENDENCY_TYPE_HARD, DEPENDENCY_TYPE_SOFT, PARAM_APP_NAME, PARAM_DEPENDENCY_TYPE,
  PARAM_DISK_QUOTA, PARAM_INSTANCES, PARAM_MEMORY,
};
use crate::descriptor::{DeploymentDescriptor, ExtensionDescriptor, Module, Parameters, SchemaAdapter, SchemaVersion};
use crate::env::{DependencyProperties, EnvironmentBuilder, EnvironmentInput, MtaEnvironmentBuilder};
use crate::error::{CompileError, ContentError, MessageKey, Result};
use crate::model::{ApplicationPort, CloudApplication, CloudService};
use crate::naming::{self, NamespaceServiceNameMapper, ServiceNameMapper};
use crate::placeholder::{self, Resolver};
use crate::routes::RouteAssembler;
use crate::services::{Selection, ServiceResolver, ServicesBuilder};
use crate::sort::{HardDependencySorter, ModuleSorter};

/// Compiles a deployment descriptor into cloud applications.
pub struct CloudModelBuilder<'a> {
  descriptor: &'a DeploymentDescriptor,
  config: &'a TargetConfig,
  chains: ChainResolver,
  adapter: Box<dyn SchemaAdapter>,
  sorter: Box<dyn ModuleSorter>,
  mapper: Box<dyn ServiceNameMapper>,
  environment: Box<dyn EnvironmentBuilder>,
  placeholders: Box<dyn Resolver + Send + Sync>,
}

impl<'a> CloudModelBuilder<'a> {
  /// Create a builder with the default collaborators for the descriptor's
  /// schema version.
  ///
  /// `extensions` are given in the order they are applied.
  ///
  /// # Errors
  ///
  /// Returns `InvalidValue` for an unsupported schema version.
  pub fn new(
    descriptor: &'a DeploymentDescriptor,
    extensions: &[ExtensionDescriptor],
    config: &'a TargetConfig,
  ) -> Result<Self> {
    let version = SchemaVersion::parse(&descriptor.schema_version)?;
    debug!(mta = %descriptor.id, schema = %version, extensions = extensions.len(), "creating model builder");

    Ok(Self {
      descriptor,
      config,
      chains: ChainResolver::new(descriptor, extensions, config),
      adapter: crate::descriptor::adapter_for(version),
      sorter: Box::new(HardDependencySorter),
      mapper: Box::new(NamespaceServiceNameMapper::new(config.service_namespace())),
      environment: Box::new(MtaEnvironmentBuilder::new(
        config.pretty_printing,
        config.deploy_id.clone(),
      )),
      placeholders: Box::new(config.clone()),
    })
  }

  pub fn with_sorter(mut self, sorter: impl ModuleSorter + 'static) -> Self {
    self.sorter = Box::new(sorter);
    self
  }

  pub fn with_service_name_mapper(mut self, mapper: impl ServiceNameMapper + 'static) -> Self {
    self.mapper = Box::new(mapper);
    self
  }

  pub fn with_environment_builder(mut self, environment: impl EnvironmentBuilder + 'static) -> Self {
    self.environment = Box::new(environment);
    self
  }

  pub fn with_placeholder_resolver(mut self, resolver: impl Resolver + Send + Sync + 'static) -> Self {
    self.placeholders = Box::new(resolver);
    self
  }

  pub fn chains(&self) -> &ChainResolver {
    &self.chains
  }

  pub fn schema_version(&self) -> SchemaVersion {
    self.adapter.version()
  }

  pub fn service_resolver(&self) -> ServiceResolver<'_> {
    ServiceResolver::new(self.descriptor, &self.chains, self.adapter.as_ref(), self.mapper.as_ref())
  }

  /// Service instances for every service resource of the descriptor.
  pub fn build_services(&self) -> Result<Vec<CloudService>> {
    ServicesBuilder::new(self.descriptor, self.service_resolver()).build()
  }

  /// Build the applications of one deployment.
  ///
  /// - `archive`: modules whose content is part of the deployment archive
  /// - `intended`: modules selected for this deployment
  /// - `deployed`: modules already running in the target environment
  ///
  /// # Errors
  ///
  /// Returns a `Content` error for archived modules that are not intended
  /// and for intended modules that can be neither built nor found deployed.
  /// Errors of individual modules are propagated unchanged.
  pub fn build(
    &self,
    archive: &BTreeSet<String>,
    intended: &BTreeSet<String>,
    deployed: &BTreeSet<String>,
  ) -> Result<Vec<CloudApplication>> {
    let annotated = self.annotate()?;
    let hard: BTreeSet<String> = annotated
      .iter()
      .filter(|(_, (_, hard))| *hard)
      .map(|(name, _)| name.clone())
      .collect();
    let order = self.sorter.sort(self.descriptor, &hard)?;

    let mut unresolved: BTreeSet<&str> = intended.iter().map(String::as_str).collect();
    let mut not_intended: Vec<&str> = Vec::new();
    let mut applications = Vec::new();

    for name in &order {
      let (Some(module), Some((chain, _))) = (self.descriptor.module(name), annotated.get(name)) else {
        continue;
      };

      if !archive.contains(name) || module.module_type.is_none() {
        if deployed.contains(name) {
          warn!(module = %name, "module found deployed but no longer described");
        }
        continue;
      }

      if !intended.contains(name) {
        not_intended.push(name);
        continue;
      }

      applications.push(self.build_application(module, chain)?);
      unresolved.remove(name.as_str());
    }

    for name in archive {
      if self.descriptor.module(name).is_none() && !intended.contains(name) {
        not_intended.push(name);
      }
    }
    if !not_intended.is_empty() {
      return Err(ContentError::new(MessageKey::ArchiveModulesNotIntended, not_intended).into());
    }

    let unresolved: Vec<&str> = unresolved
      .into_iter()
      .filter(|name| !deployed.contains(*name))
      .collect();
    if !unresolved.is_empty() {
      return Err(ContentError::new(MessageKey::UnresolvedModules, unresolved).into());
    }

    info!(
      mta = %self.descriptor.id,
      applications = applications.len(),
      "built cloud application model"
    );
    Ok(applications)
  }

  /// Build the application of a single module, ignoring archive and
  /// deployment state.
  ///
  /// # Errors
  ///
  /// Returns `Unresolvable` if the descriptor has no such module.
  pub fn build_module(&self, name: &str) -> Result<CloudApplication> {
    let module = self
      .descriptor
      .module(name)
      .ok_or_else(|| CompileError::Unresolvable { name: name.to_string() })?;
    let (chain, _) = self.annotated_chain(module)?;
    self.build_application(module, &chain)
  }

  /// Annotated chains of all modules with their hard-dependency flag.
  fn annotate(&self) -> Result<BTreeMap<String, (ParameterChain, bool)>> {
    self
      .descriptor
      .modules
      .iter()
      .map(|module| Ok((module.name.clone(), self.annotated_chain(module)?)))
      .collect()
  }

  fn annotated_chain(&self, module: &Module) -> Result<(ParameterChain, bool)> {
    let chain = self.chains.module_chain(&module.name).cloned().unwrap_or_default();
    let dependency_type = chain
      .get_string(PARAM_DEPENDENCY_TYPE)?
      .unwrap_or_else(|| DEPENDENCY_TYPE_SOFT.to_string());

    let hard = match dependency_type.as_str() {
      DEPENDENCY_TYPE_HARD => true,
      DEPENDENCY_TYPE_SOFT => false,
      _ => {
        return Err(CompileError::InvalidValue {
          key: PARAM_DEPENDENCY_TYPE.to_string(),
          value: dependency_type,
          reason: format!("expected '{DEPENDENCY_TYPE_SOFT}' or '{DEPENDENCY_TYPE_HARD}'"),
        });
      }
    };

    let mut layer = Parameters::new();
    layer.insert(PARAM_DEPENDENCY_TYPE.to_string(), dependency_type.into());
    Ok((chain.with_front(layer), hard))
  }

  fn resolve_all(&self, values: Vec<String>) -> Result<Vec<String>> {
    values
      .into_iter()
      .map(|value| Ok(placeholder::substitute(&value, self.placeholders.as_ref())?))
      .collect()
  }

  fn warn_unsupported_parameters(&self, module: &Module) {
    for key in module.parameters.keys() {
      if !APP_PROPS.contains(&key.as_str()) && !APP_ATTRIBUTES.contains(&key.as_str()) {
        warn!(module = %module.name, parameter = %key, "unsupported module parameter");
      }
    }
  }

  fn dependency_properties(&self, module: &Module) -> Vec<DependencyProperties> {
    module
      .requires
      .iter()
      .map(|dependency| {
        let group = if self.adapter.supports_grouping() {
          self
            .adapter
            .structured(dependency)
            .and_then(|d| d.destination_group())
            .map(str::to_string)
        } else {
          None
        };
        let properties = self
          .chains
          .dependency_properties(&module.name, dependency.name())
          .map(ParameterChain::merged)
          .unwrap_or_default();
        DependencyProperties {
          name: dependency.name().to_string(),
          group,
          properties,
        }
      })
      .collect()
  }

  fn build_application(&self, module: &Module, chain: &ParameterChain) -> Result<CloudApplication> {
    debug!(module = %module.name, "building application");
    self.warn_unsupported_parameters(module);

    let name = naming::application_name(
      &module.name,
      chain.get_str(PARAM_APP_NAME)?,
      self.config.app_namespace(),
    );

    let assembler = RouteAssembler::new(chain, self.config.port_based_routing)?;
    let port_type = assembler.port_type()?;
    let ports = assembler
      .ports()?
      .into_iter()
      .map(|port| ApplicationPort { port, port_type })
      .collect();

    let resolver = self.service_resolver();
    let services = resolver.services(module, Selection::Bindable)?;

    let properties = self
      .chains
      .module_properties(&module.name)
      .map(ParameterChain::merged)
      .unwrap_or_default();
    let env = self.environment.build(&EnvironmentInput {
      descriptor: self.descriptor,
      module,
      parameters: chain,
      properties,
      dependencies: self.dependency_properties(module),
      services: &services,
      placeholders: self.placeholders.as_ref(),
    })?;

    Ok(CloudApplication {
      name,
      module_name: module.name.clone(),
      staging: staging::staging(chain)?,
      memory: chain.get_memory(PARAM_MEMORY)?,
      disk_quota: chain.get_memory(PARAM_DISK_QUOTA)?,
      instances: chain.get_u64(PARAM_INSTANCES)?,
      routes: self.resolve_all(assembler.routes()?)?,
      idle_routes: self.resolve_all(assembler.idle_routes()?)?,
      temp_routes: self.resolve_all(assembler.temp_routes()?)?,
      service_keys_to_inject: resolver.service_keys_to_inject(module)?,
      binding_parameters: resolver.binding_parameters(module)?,
      services,
      env,
      tasks: tasks::tasks(chain, self.config.pretty_printing)?,
      ports,
      domains: self.resolve_all(assembler.domains()?)?,
      restart_parameters: restart::restart_parameters(chain)?,
      docker: docker::docker_info(chain)?,
    })
  }
}
