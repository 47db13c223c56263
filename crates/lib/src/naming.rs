//! Application and service naming.
//!
//! Names may be prefixed with a namespace and are shortened to the platform's
//! length limits by replacing their tail with a short content hash.

use sha2::{Digest, Sha256};

use crate::consts::{APP_NAME_MAX_LENGTH, NAME_HASH_LEN, NAMESPACE_SEPARATOR, SERVICE_NAME_MAX_LENGTH};
use crate::resource::ResourceType;

/// Prefix `name` with `namespace` if one is given.
pub fn namespaced(name: &str, namespace: Option<&str>) -> String {
  match namespace {
    Some(ns) if !ns.is_empty() => format!("{ns}{NAMESPACE_SEPARATOR}{name}"),
    _ => name.to_string(),
  }
}

/// Truncate `name` to `max_len` characters, keeping it unique with a hash suffix.
pub fn with_max_length(name: &str, max_len: usize) -> String {
  if name.chars().count() <= max_len {
    return name.to_string();
  }

  let digest = hex::encode(Sha256::digest(name.as_bytes()));
  let hash = &digest[..NAME_HASH_LEN.min(max_len)];
  let keep = max_len - hash.len();
  let prefix: String = name.chars().take(keep).collect();
  format!("{prefix}{hash}")
}

/// Compute the application name of a module.
pub fn application_name(module_name: &str, app_name: Option<&str>, namespace: Option<&str>) -> String {
  let base = app_name.unwrap_or(module_name);
  with_max_length(&namespaced(base, namespace), APP_NAME_MAX_LENGTH)
}

/// Maps a resource to the name of its cloud service instance.
pub trait ServiceNameMapper: Send + Sync {
  /// `service_name` is the resource's `service-name` parameter, if any.
  fn service_name(&self, resource_name: &str, service_name: Option<&str>, resource_type: ResourceType) -> String;
}

/// Default mapper: explicit `service-name` or resource name, namespaced
/// unless the service already exists.
#[derive(Debug, Clone, Default)]
pub struct NamespaceServiceNameMapper {
  namespace: Option<String>,
}

impl NamespaceServiceNameMapper {
  pub fn new(namespace: Option<&str>) -> Self {
    Self {
      namespace: namespace.map(str::to_string),
    }
  }
}

impl ServiceNameMapper for NamespaceServiceNameMapper {
  fn service_name(&self, resource_name: &str, service_name: Option<&str>, resource_type: ResourceType) -> String {
    let base = service_name.unwrap_or(resource_name);
    if resource_type.is_existing() {
      return base.to_string();
    }
    with_max_length(&namespaced(base, self.namespace.as_deref()), SERVICE_NAME_MAX_LENGTH)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn namespace_prefix() {
    assert_eq!(namespaced("web", Some("dev")), "dev-web");
    assert_eq!(namespaced("web", Some("")), "web");
    assert_eq!(namespaced("web", None), "web");
  }

  #[test]
  fn long_names_are_shortened_deterministically() {
    let name = "a".repeat(60);
    let short = with_max_length(&name, SERVICE_NAME_MAX_LENGTH);

    assert_eq!(short.len(), SERVICE_NAME_MAX_LENGTH);
    assert!(short.starts_with(&"a".repeat(SERVICE_NAME_MAX_LENGTH - NAME_HASH_LEN)));
    assert_eq!(short, with_max_length(&name, SERVICE_NAME_MAX_LENGTH));
    assert_ne!(short, with_max_length(&"a".repeat(61), SERVICE_NAME_MAX_LENGTH));
  }

  #[test]
  fn short_names_are_untouched() {
    assert_eq!(with_max_length("db", SERVICE_NAME_MAX_LENGTH), "db");
  }

  #[test]
  fn application_name_prefers_app_name() {
    assert_eq!(application_name("web", Some("shop-web"), None), "shop-web");
    assert_eq!(application_name("web", None, Some("dev")), "dev-web");
  }

  #[test]
  fn existing_services_are_not_namespaced() {
    let mapper = NamespaceServiceNameMapper::new(Some("dev"));

    assert_eq!(mapper.service_name("db", None, ResourceType::ManagedService), "dev-db");
    assert_eq!(
      mapper.service_name("db", Some("shared-db"), ResourceType::ExistingService),
      "shared-db"
    );
    assert_eq!(mapper.service_name("cfg", None, ResourceType::UserProvidedService), "dev-cfg");
  }
}
