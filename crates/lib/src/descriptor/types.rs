use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, ContentError, MessageKey, Result};

/// Free-form parameter or property mapping of a descriptor entity.
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// A parsed deployment descriptor.
///
/// The descriptor is immutable once parsed. Extension descriptors are kept
/// apart and merged logically through parameter chains, never written back
/// into the base descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
  /// Schema version string, e.g. `"2.1"`.
  #[serde(rename = "_schema-version", deserialize_with = "version_string")]
  pub schema_version: String,

  /// MTA identifier.
  #[serde(rename = "ID", alias = "id")]
  pub id: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub provider: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub copyright: Option<String>,

  /// Descriptor-wide parameters, the last fallback before system parameters.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  /// Modules in declaration order.
  #[serde(default)]
  pub modules: Vec<Module>,

  /// Resources in declaration order.
  #[serde(default)]
  pub resources: Vec<Resource>,
}

/// A deployable unit of the MTA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
  pub name: String,

  /// Module type. Modules without a type are never deployed.
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub module_type: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  /// Properties exported into the application environment.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub requires: Vec<DependencyRef>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub provides: Vec<ProvidedDependency>,
}

/// A declared external dependency such as a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
  pub name: String,

  /// Declared resource type, either a service kind or a platform resource type.
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub resource_type: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  /// Inactive resources are ignored by schema versions that support it.
  #[serde(default = "default_active")]
  pub active: bool,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,
}

/// Accept `_schema-version: 3.1` as well as `_schema-version: "3.1"`.
pub(crate) fn version_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
  D: serde::Deserializer<'de>,
{
  match serde_json::Value::deserialize(deserializer)? {
    serde_json::Value::String(s) => Ok(s),
    serde_json::Value::Number(n) => Ok(n.to_string()),
    other => Err(serde::de::Error::custom(format!(
      "expected a version string, found {}",
      crate::error::value_kind(&other)
    ))),
  }
}

fn default_active() -> bool {
  true
}

impl Default for Resource {
  fn default() -> Self {
    Self {
      name: String::new(),
      resource_type: None,
      description: None,
      active: true,
      parameters: Parameters::new(),
      properties: Parameters::new(),
    }
  }
}

/// A capability a module offers to other modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidedDependency {
  pub name: String,

  /// Public dependencies are listed in `MTA_MODULE_PROVIDED_DEPENDENCIES`.
  #[serde(default)]
  pub public: bool,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,
}

/// A reference from a module to something it requires.
///
/// Schema version 1 lists plain names. Later versions use structured
/// objects with their own parameters, properties and grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyRef {
  Named(String),
  Structured(RequiredDependency),
}

/// A structured required dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredDependency {
  pub name: String,

  /// Environment group the dependency's properties are collected into.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group: Option<String>,

  /// Same as `group`; takes precedence when both are set.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub list: Option<String>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,
}

impl DependencyRef {
  pub fn name(&self) -> &str {
    match self {
      DependencyRef::Named(name) => name,
      DependencyRef::Structured(dep) => &dep.name,
    }
  }

  pub fn as_structured(&self) -> Option<&RequiredDependency> {
    match self {
      DependencyRef::Named(_) => None,
      DependencyRef::Structured(dep) => Some(dep),
    }
  }
}

impl RequiredDependency {
  /// The environment group, honoring `list` over `group`.
  pub fn destination_group(&self) -> Option<&str> {
    self.list.as_deref().or(self.group.as_deref())
  }
}

impl DeploymentDescriptor {
  pub fn module(&self, name: &str) -> Option<&Module> {
    self.modules.iter().find(|m| m.name == name)
  }

  pub fn resource(&self, name: &str) -> Option<&Resource> {
    self.resources.iter().find(|r| r.name == name)
  }

  /// Find the module providing a dependency with the given name.
  pub fn provider_of(&self, dependency: &str) -> Option<&Module> {
    self
      .modules
      .iter()
      .find(|m| m.provides.iter().any(|p| p.name == dependency))
  }

  /// Names of all modules, in declaration order.
  pub fn module_names(&self) -> impl Iterator<Item = &str> {
    self.modules.iter().map(|m| m.name.as_str())
  }

  /// Check that module and resource names are unique within the descriptor.
  ///
  /// # Errors
  ///
  /// Returns a `DuplicateName` content error listing every clashing name.
  pub fn validate(&self) -> Result<()> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();

    let names = self
      .modules
      .iter()
      .map(|m| m.name.as_str())
      .chain(self.resources.iter().map(|r| r.name.as_str()));

    for name in names {
      if !seen.insert(name) {
        duplicates.insert(name);
      }
    }

    if duplicates.is_empty() {
      Ok(())
    } else {
      Err(CompileError::Content(ContentError::new(MessageKey::DuplicateName, duplicates)))
    }
  }
}
