//! Resource classification.
//!
//! A resource becomes a service only if it carries a service marker: a
//! declared type, a `type` parameter or a `service` parameter. Its concrete
//! [`ResourceType`] is taken from the explicit `type` parameter, then from the
//! declared type, and falls back to a managed service when only `service` is
//! given. The classified type's required parameters are checked afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chain::ParameterChain;
use crate::consts::{PARAM_SERVICE, PARAM_TYPE};
use crate::descriptor::SchemaAdapter;
use crate::error::{CompileError, Result};

const TYPE_PREFIX: &str = "org.cloudfoundry.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
  ManagedService,
  UserProvidedService,
  ExistingService,
  ExistingServiceKey,
}

impl ResourceType {
  pub const ALL: [ResourceType; 4] = [
    ResourceType::ManagedService,
    ResourceType::UserProvidedService,
    ResourceType::ExistingService,
    ResourceType::ExistingServiceKey,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      ResourceType::ManagedService => "managed-service",
      ResourceType::UserProvidedService => "user-provided-service",
      ResourceType::ExistingService => "existing-service",
      ResourceType::ExistingServiceKey => "existing-service-key",
    }
  }

  /// Existing resources are referenced by name and never created.
  pub fn is_existing(self) -> bool {
    matches!(self, ResourceType::ExistingService | ResourceType::ExistingServiceKey)
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ResourceType {
  type Err = ();

  /// Accepts both `managed-service` and `org.cloudfoundry.managed-service`.
  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    let short = s.strip_prefix(TYPE_PREFIX).unwrap_or(s);
    ResourceType::ALL
      .into_iter()
      .find(|t| t.as_str() == short)
      .ok_or(())
  }
}

/// Classify a resource from its declared type and parameter chain.
///
/// Returns `Ok(None)` for resources that are not services.
///
/// # Errors
///
/// - `InvalidValue` if the `type` parameter names no known resource type
/// - `MissingRequiredParameter` if the classified type lacks a required key
pub fn classify(
  resource_name: &str,
  declared_type: Option<&str>,
  chain: &ParameterChain,
  adapter: &dyn SchemaAdapter,
) -> Result<Option<ResourceType>> {
  if !adapter.is_service(declared_type, &chain.merged()) {
    trace!(resource = %resource_name, "not a service");
    return Ok(None);
  }

  let explicit = match chain.get_str(PARAM_TYPE)? {
    Some(value) => Some(value.parse::<ResourceType>().map_err(|_| CompileError::InvalidValue {
      key: PARAM_TYPE.to_string(),
      value: value.to_string(),
      reason: format!("unknown resource type of '{}'", resource_name),
    })?),
    None => None,
  };

  let resource_type = explicit
    .or_else(|| declared_type.and_then(|t| t.parse().ok()))
    .or_else(|| chain.lookup(PARAM_SERVICE).value().map(|_| ResourceType::ManagedService));

  let Some(resource_type) = resource_type else {
    trace!(resource = %resource_name, declared = ?declared_type, "unclassifiable resource");
    return Ok(None);
  };

  for key in adapter.required_parameters(resource_type) {
    if chain.lookup(key).value().is_none() {
      return Err(CompileError::MissingRequiredParameter {
        resource: resource_name.to_string(),
        key: key.to_string(),
      });
    }
  }

  trace!(resource = %resource_name, resource_type = %resource_type, "classified resource");
  Ok(Some(resource_type))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::{Parameters, SchemaVersion, adapter_for};
  use serde_json::json;

  fn params(value: serde_json::Value) -> ParameterChain {
    ParameterChain::new(vec![serde_json::from_value::<Parameters>(value).unwrap()])
  }

  fn v2() -> Box<dyn SchemaAdapter> {
    adapter_for(SchemaVersion::V2)
  }

  #[test]
  fn parses_short_and_prefixed_names() {
    assert_eq!("managed-service".parse::<ResourceType>(), Ok(ResourceType::ManagedService));
    assert_eq!(
      "org.cloudfoundry.existing-service-key".parse::<ResourceType>(),
      Ok(ResourceType::ExistingServiceKey)
    );
    assert!("com.example.custom".parse::<ResourceType>().is_err());
  }

  #[test]
  fn plain_resource_is_not_a_service() {
    let chain = params(json!({ "url": "https://example.com" }));
    assert_eq!(classify("api", None, &chain, v2().as_ref()).unwrap(), None);
  }

  #[test]
  fn service_parameter_defaults_to_managed() {
    let chain = params(json!({ "service": "postgresql", "service-plan": "small" }));
    assert_eq!(
      classify("db", None, &chain, v2().as_ref()).unwrap(),
      Some(ResourceType::ManagedService)
    );
  }

  #[test]
  fn explicit_type_wins_over_declared_type() {
    let chain = params(json!({ "type": "user-provided-service" }));
    assert_eq!(
      classify("cfg", Some("org.cloudfoundry.managed-service"), &chain, v2().as_ref()).unwrap(),
      Some(ResourceType::UserProvidedService)
    );
  }

  #[test]
  fn declared_type_is_used() {
    let chain = params(json!({}));
    assert_eq!(
      classify("legacy", Some("org.cloudfoundry.existing-service"), &chain, v2().as_ref()).unwrap(),
      Some(ResourceType::ExistingService)
    );
  }

  #[test]
  fn unknown_explicit_type_is_invalid() {
    let chain = params(json!({ "type": "mystery" }));
    assert!(matches!(
      classify("x", None, &chain, v2().as_ref()).unwrap_err(),
      CompileError::InvalidValue { .. }
    ));
  }

  #[test]
  fn required_parameters_depend_on_schema_version() {
    let chain = params(json!({ "service": "postgresql" }));

    let err = classify("db", None, &chain, v2().as_ref()).unwrap_err();
    assert_eq!(
      err.to_string(),
      "resource 'db' is missing required parameter 'service-plan'"
    );

    let v1 = adapter_for(SchemaVersion::V1);
    assert_eq!(
      classify("db", None, &chain, v1.as_ref()).unwrap(),
      Some(ResourceType::ManagedService)
    );
  }

  #[test]
  fn existing_service_key_requires_service_name() {
    let chain = params(json!({ "type": "existing-service-key" }));
    assert!(matches!(
      classify("key", None, &chain, v2().as_ref()).unwrap_err(),
      CompileError::MissingRequiredParameter { ref key, .. } if key == "service-name"
    ));
  }

  #[test]
  fn null_required_parameter_counts_as_missing() {
    let chain = ParameterChain::new(vec![
      serde_json::from_value(json!({ "service-plan": null })).unwrap(),
      serde_json::from_value(json!({ "service": "redis", "service-plan": "small" })).unwrap(),
    ]);
    assert!(classify("cache", None, &chain, v2().as_ref()).is_err());
  }
}
