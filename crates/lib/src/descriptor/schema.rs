//! Schema versions and the per-version strategy used by the builder.
//!
//! The compiler has a single builder. Differences between descriptor schema
//! generations are expressed as capabilities of a [`SchemaAdapter`], and the
//! builder branches on those capabilities rather than on the version itself.

use std::fmt;

use crate::consts::{PARAM_SERVICE, PARAM_SERVICE_NAME, PARAM_SERVICE_PLAN, PARAM_TYPE};
use crate::error::{CompileError, Result};
use crate::resource::ResourceType;

use super::types::{DependencyRef, Parameters, RequiredDependency};

/// Major version of the descriptor schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
  /// Plain-name dependencies.
  V1,
  /// Structured dependencies with parameters and grouping.
  V2,
  /// Adds optional (inactive) resources.
  V3,
}

impl SchemaVersion {
  /// Parse a `_schema-version` value such as `"2.1"`.
  ///
  /// # Errors
  ///
  /// Returns `InvalidValue` for unsupported major versions.
  pub fn parse(version: &str) -> Result<Self> {
    let major = version.trim().split('.').next().unwrap_or_default();
    match major {
      "1" => Ok(SchemaVersion::V1),
      "2" => Ok(SchemaVersion::V2),
      "3" => Ok(SchemaVersion::V3),
      _ => Err(CompileError::InvalidValue {
        key: "_schema-version".to_string(),
        value: version.to_string(),
        reason: "supported major versions are 1, 2 and 3".to_string(),
      }),
    }
  }
}

impl fmt::Display for SchemaVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let major = match self {
      SchemaVersion::V1 => 1,
      SchemaVersion::V2 => 2,
      SchemaVersion::V3 => 3,
    };
    write!(f, "{}", major)
  }
}

/// Version-specific behavior injected into the builder.
pub trait SchemaAdapter: Send + Sync {
  fn version(&self) -> SchemaVersion;

  /// Dependencies may carry binding parameters under `config`.
  fn supports_binding_parameters(&self) -> bool;

  /// Dependency properties may be collected into `group`/`list` lists.
  fn supports_grouping(&self) -> bool;

  /// Existing service keys can be injected into the environment.
  fn supports_service_key_injection(&self) -> bool;

  /// Resources can be switched off with `active: false`.
  fn supports_optional_resources(&self) -> bool;

  /// Parameters a resource must carry to legally be of the given type.
  fn required_parameters(&self, resource_type: ResourceType) -> &'static [&'static str] {
    match resource_type {
      ResourceType::ManagedService => &[PARAM_SERVICE, PARAM_SERVICE_PLAN],
      ResourceType::ExistingServiceKey => &[PARAM_SERVICE_NAME],
      ResourceType::UserProvidedService | ResourceType::ExistingService => &[],
    }
  }

  /// Whether a resource is a service candidate at all.
  fn is_service(&self, declared_type: Option<&str>, parameters: &Parameters) -> bool {
    declared_type.is_some() || parameters.contains_key(PARAM_TYPE) || parameters.contains_key(PARAM_SERVICE)
  }

  /// Whether a resource takes part in service computations.
  fn is_active(&self, active: bool) -> bool {
    active || !self.supports_optional_resources()
  }

  /// The structured form of a dependency, if this schema understands one.
  fn structured<'a>(&self, dependency: &'a DependencyRef) -> Option<&'a RequiredDependency> {
    if self.supports_binding_parameters() || self.supports_grouping() {
      dependency.as_structured()
    } else {
      None
    }
  }
}

pub struct V1Adapter;

impl SchemaAdapter for V1Adapter {
  fn version(&self) -> SchemaVersion {
    SchemaVersion::V1
  }

  fn supports_binding_parameters(&self) -> bool {
    false
  }

  fn supports_grouping(&self) -> bool {
    false
  }

  fn supports_service_key_injection(&self) -> bool {
    false
  }

  fn supports_optional_resources(&self) -> bool {
    false
  }

  fn required_parameters(&self, resource_type: ResourceType) -> &'static [&'static str] {
    match resource_type {
      ResourceType::ManagedService => &[PARAM_SERVICE],
      ResourceType::ExistingServiceKey => &[PARAM_SERVICE_NAME],
      ResourceType::UserProvidedService | ResourceType::ExistingService => &[],
    }
  }
}

pub struct V2Adapter;

impl SchemaAdapter for V2Adapter {
  fn version(&self) -> SchemaVersion {
    SchemaVersion::V2
  }

  fn supports_binding_parameters(&self) -> bool {
    true
  }

  fn supports_grouping(&self) -> bool {
    true
  }

  fn supports_service_key_injection(&self) -> bool {
    true
  }

  fn supports_optional_resources(&self) -> bool {
    false
  }
}

pub struct V3Adapter;

impl SchemaAdapter for V3Adapter {
  fn version(&self) -> SchemaVersion {
    SchemaVersion::V3
  }

  fn supports_binding_parameters(&self) -> bool {
    true
  }

  fn supports_grouping(&self) -> bool {
    true
  }

  fn supports_service_key_injection(&self) -> bool {
    true
  }

  fn supports_optional_resources(&self) -> bool {
    true
  }
}

/// Select the adapter for a schema version.
pub fn adapter_for(version: SchemaVersion) -> Box<dyn SchemaAdapter> {
  match version {
    SchemaVersion::V1 => Box::new(V1Adapter),
    SchemaVersion::V2 => Box::new(V2Adapter),
    SchemaVersion::V3 => Box::new(V3Adapter),
  }
}
