//! Extension descriptors: overlays applied on top of a deployment descriptor.
//!
//! An extension never changes the base descriptor. Its parameters and
//! properties become additional, more specific layers of the parameter
//! chains built by [`crate::chain::ChainResolver`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Parameters;

/// An extension descriptor overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
  #[serde(rename = "_schema-version", default, deserialize_with = "super::types::version_string")]
  pub schema_version: String,

  #[serde(rename = "ID", alias = "id")]
  pub id: String,

  /// ID of the descriptor or extension this one extends.
  pub extends: String,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub modules: Vec<ModuleExtension>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub resources: Vec<ResourceExtension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleExtension {
  pub name: String,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub requires: Vec<RequiredDependencyExtension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredDependencyExtension {
  pub name: String,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceExtension {
  pub name: String,

  /// Overrides the base resource's `active` flag when set.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active: Option<bool>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub parameters: Parameters,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub properties: Parameters,
}

impl ExtensionDescriptor {
  pub fn module(&self, name: &str) -> Option<&ModuleExtension> {
    self.modules.iter().find(|m| m.name == name)
  }

  pub fn resource(&self, name: &str) -> Option<&ResourceExtension> {
    self.resources.iter().find(|r| r.name == name)
  }
}

impl ModuleExtension {
  pub fn dependency(&self, name: &str) -> Option<&RequiredDependencyExtension> {
    self.requires.iter().find(|d| d.name == name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_extension_overlay() {
    let yaml = r#"
_schema-version: "3.1"
ID: shop.prod
extends: shop
parameters:
  region: eu10
modules:
  - name: web
    parameters:
      memory: 1G
    requires:
      - name: db
        parameters:
          config:
            pool: 20
resources:
  - name: db
    active: false
"#;
    let ext: ExtensionDescriptor = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(ext.extends, "shop");
    assert_eq!(ext.parameters["region"], "eu10");
    let web = ext.module("web").unwrap();
    assert_eq!(web.parameters["memory"], "1G");
    assert_eq!(web.dependency("db").unwrap().parameters["config"]["pool"], 20);
    assert_eq!(ext.resource("db").unwrap().active, Some(false));
    assert!(ext.module("api").is_none());
  }
}
