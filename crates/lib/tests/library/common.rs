//! Shared helpers for library integration tests.

use std::collections::BTreeSet;
use std::path::PathBuf;

use mtac_lib::config::TargetConfig;
use mtac_lib::descriptor::{DeploymentDescriptor, ExtensionDescriptor};

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

pub fn shop_descriptor() -> DeploymentDescriptor {
  DeploymentDescriptor::from_file(&fixture_path("shop.mtad.yaml")).unwrap()
}

pub fn prod_extension() -> ExtensionDescriptor {
  ExtensionDescriptor::from_file(&fixture_path("prod.mtaext")).unwrap()
}

pub fn target_config() -> TargetConfig {
  TargetConfig::from_file(&fixture_path("target.yaml")).unwrap()
}

pub fn names(list: &[&str]) -> BTreeSet<String> {
  list.iter().map(|n| n.to_string()).collect()
}
