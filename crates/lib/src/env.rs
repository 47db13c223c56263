//! Application environment construction.
//!
//! The environment is a flat string mapping. Non-string values are rendered
//! as JSON. Precedence, lowest first: generated `MTA_*` metadata, dependency
//! properties, module properties.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use tracing::trace;

use crate::chain::ParameterChain;
use crate::consts::{
  APP_ATTRIBUTES, ATTR_COPYRIGHT, ATTR_DESCRIPTION, ATTR_ID, ATTR_NAME, ATTR_PROVIDER, ATTR_VERSION,
  ENV_DEPLOY_ATTRIBUTES, ENV_DEPLOY_ID, ENV_MTA_METADATA, ENV_MTA_MODULE_METADATA,
  ENV_MTA_MODULE_PROVIDED_DEPENDENCIES, ENV_MTA_SERVICES, PARAM_CHECK_DEPLOY_ID, PARAM_SERVICE_BROKER_URL,
  PARAM_SERVICE_URL,
};
use crate::descriptor::{DeploymentDescriptor, Module, Parameters};
use crate::error::Result;
use crate::placeholder::{self, Resolver};

/// Properties contributed by one required dependency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyProperties {
  pub name: String,
  /// Collect the properties into this list variable instead of merging them.
  pub group: Option<String>,
  pub properties: Parameters,
}

/// Everything the environment of one module is built from.
pub struct EnvironmentInput<'a> {
  pub descriptor: &'a DeploymentDescriptor,
  pub module: &'a Module,
  pub parameters: &'a ParameterChain,
  /// Module properties after extension layers.
  pub properties: Parameters,
  pub dependencies: Vec<DependencyProperties>,
  /// Names of the services the application binds to.
  pub services: &'a [String],
  pub placeholders: &'a dyn Resolver,
}

/// Turns a module's resolved inputs into its environment variables.
pub trait EnvironmentBuilder: Send + Sync {
  fn build(&self, input: &EnvironmentInput<'_>) -> Result<BTreeMap<String, String>>;
}

/// Default environment builder exporting MTA metadata alongside properties.
#[derive(Debug, Clone, Default)]
pub struct MtaEnvironmentBuilder {
  pretty_printing: bool,
  deploy_id: Option<String>,
}

impl MtaEnvironmentBuilder {
  pub fn new(pretty_printing: bool, deploy_id: Option<String>) -> Self {
    Self {
      pretty_printing,
      deploy_id,
    }
  }

  fn render(&self, value: &Value) -> String {
    match value {
      Value::String(s) => s.clone(),
      other if self.pretty_printing => format!("{:#}", other),
      other => other.to_string(),
    }
  }

  fn metadata(descriptor: &DeploymentDescriptor) -> Value {
    let mut meta = Map::new();
    meta.insert(ATTR_ID.to_string(), json!(descriptor.id));
    let optional = [
      (ATTR_VERSION, &descriptor.version),
      (ATTR_DESCRIPTION, &descriptor.description),
      (ATTR_PROVIDER, &descriptor.provider),
      (ATTR_COPYRIGHT, &descriptor.copyright),
    ];
    for (key, value) in optional {
      if let Some(value) = value {
        meta.insert(key.to_string(), json!(value));
      }
    }
    Value::Object(meta)
  }

  fn module_metadata(module: &Module) -> Value {
    let mut meta = Map::new();
    meta.insert(ATTR_NAME.to_string(), json!(module.name));
    if let Some(description) = &module.description {
      meta.insert(ATTR_DESCRIPTION.to_string(), json!(description));
    }
    Value::Object(meta)
  }

  fn deploy_attributes(input: &EnvironmentInput<'_>) -> Result<Map<String, Value>> {
    let mut attributes = Map::new();
    for key in APP_ATTRIBUTES {
      let Some(value) = input.parameters.lookup(key).value() else {
        continue;
      };
      let value = if *key == PARAM_SERVICE_URL || *key == PARAM_SERVICE_BROKER_URL {
        placeholder::substitute_value(value, input.placeholders)?
      } else {
        value.clone()
      };
      attributes.insert(key.to_string(), value);
    }
    Ok(attributes)
  }
}

impl EnvironmentBuilder for MtaEnvironmentBuilder {
  fn build(&self, input: &EnvironmentInput<'_>) -> Result<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();

    env.insert(ENV_MTA_METADATA.to_string(), self.render(&Self::metadata(input.descriptor)));
    env.insert(
      ENV_MTA_MODULE_METADATA.to_string(),
      self.render(&Self::module_metadata(input.module)),
    );

    let provided: Vec<&str> = input
      .module
      .provides
      .iter()
      .filter(|p| p.public)
      .map(|p| p.name.as_str())
      .collect();
    env.insert(
      ENV_MTA_MODULE_PROVIDED_DEPENDENCIES.to_string(),
      self.render(&json!(provided)),
    );
    env.insert(ENV_MTA_SERVICES.to_string(), self.render(&json!(input.services)));

    let attributes = Self::deploy_attributes(input)?;
    if !attributes.is_empty() {
      env.insert(ENV_DEPLOY_ATTRIBUTES.to_string(), self.render(&Value::Object(attributes)));
    }

    if input.parameters.flag(PARAM_CHECK_DEPLOY_ID)?
      && let Some(deploy_id) = &self.deploy_id
    {
      env.insert(ENV_DEPLOY_ID.to_string(), deploy_id.clone());
    }

    let mut groups: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
    for dependency in &input.dependencies {
      match dependency.group.as_deref() {
        Some(group) => {
          let mut entry = Map::new();
          entry.insert(ATTR_NAME.to_string(), json!(dependency.name));
          for (key, value) in &dependency.properties {
            entry.insert(key.clone(), value.clone());
          }
          groups.entry(group).or_default().push(Value::Object(entry));
        }
        None => {
          for (key, value) in &dependency.properties {
            env.insert(key.clone(), self.render(value));
          }
        }
      }
    }
    for (group, entries) in groups {
      env.insert(group.to_string(), self.render(&Value::Array(entries)));
    }

    for (key, value) in &input.properties {
      env.insert(key.clone(), self.render(value));
    }

    trace!(module = %input.module.name, variables = env.len(), "built environment");
    Ok(env)
  }
}
