//! Deployment descriptor model and loaders.

mod extension;
mod schema;
mod types;

pub use extension::*;
pub use schema::*;
pub use types::*;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CompileError, Result};

/// Parse a YAML (or JSON) document into `T`.
pub fn from_yaml_str<T: DeserializeOwned>(what: &str, content: &str) -> Result<T> {
  serde_yaml::from_str(content).map_err(|e| CompileError::Parse {
    what: what.to_string(),
    message: e.to_string(),
  })
}

/// Read and parse a YAML (or JSON) file into `T`.
pub fn from_file<T: DeserializeOwned>(what: &str, path: &Path) -> Result<T> {
  debug!(path = %path.display(), what, "loading document");
  let content = fs::read_to_string(path).map_err(|e| CompileError::Io {
    path: path.display().to_string(),
    message: e.to_string(),
  })?;
  from_yaml_str(what, &content)
}

impl DeploymentDescriptor {
  /// Parse and validate a deployment descriptor.
  pub fn from_yaml_str(content: &str) -> Result<Self> {
    let descriptor: Self = from_yaml_str("deployment descriptor", content)?;
    descriptor.validate()?;
    Ok(descriptor)
  }

  /// Load and validate a deployment descriptor from disk.
  pub fn from_file(path: &Path) -> Result<Self> {
    let descriptor: Self = from_file("deployment descriptor", path)?;
    descriptor.validate()?;
    Ok(descriptor)
  }

  /// The adapter matching this descriptor's schema version.
  pub fn schema_adapter(&self) -> Result<Box<dyn SchemaAdapter>> {
    Ok(adapter_for(SchemaVersion::parse(&self.schema_version)?))
  }
}

impl ExtensionDescriptor {
  pub fn from_yaml_str(content: &str) -> Result<Self> {
    from_yaml_str("extension descriptor", content)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    from_file("extension descriptor", path)
  }
}
