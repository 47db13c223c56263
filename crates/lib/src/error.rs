//! Error types for descriptor compilation.
//!
//! Every fatal condition aborts model building: there is no partial result.
//! Module-set violations are collected and reported together in one
//! [`ContentError`] so that all offending modules can be fixed at once.

use std::fmt;

use thiserror::Error;

use crate::placeholder::PlaceholderError;

/// Message keys for content errors raised while compiling a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
  /// Modules shipped in the archive but not selected for deployment.
  ArchiveModulesNotIntended,
  /// Modules selected for deployment that are neither built nor deployed.
  UnresolvedModules,
  /// Hard module dependencies form a cycle.
  CircularModuleDependencies,
  /// Two entities share a name.
  DuplicateName,
}

impl MessageKey {
  fn template(self) -> &'static str {
    match self {
      MessageKey::ArchiveModulesNotIntended => "modules are part of the archive but not intended for deployment",
      MessageKey::UnresolvedModules => "unresolved modules",
      MessageKey::CircularModuleDependencies => "circular hard dependency between modules",
      MessageKey::DuplicateName => "duplicate name",
    }
  }
}

/// A user-facing validation failure carrying a message key and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError {
  pub key: MessageKey,
  pub args: Vec<String>,
}

impl ContentError {
  pub fn new(key: MessageKey, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      key,
      args: args.into_iter().map(Into::into).collect(),
    }
  }
}

impl fmt::Display for ContentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key.template())?;
    if !self.args.is_empty() {
      write!(f, ": {}", self.args.join(", "))?;
    }
    Ok(())
  }
}

impl std::error::Error for ContentError {}

#[derive(Debug, Error)]
pub enum CompileError {
  /// A classified resource lacks a parameter mandated by its type.
  #[error("resource '{resource}' is missing required parameter '{key}'")]
  MissingRequiredParameter { resource: String, key: String },

  /// A required lookup found no value in any layer of the chain.
  #[error("missing parameter '{key}'")]
  MissingParameter { key: String },

  /// A value had a different shape than expected.
  #[error("invalid type for key '{key}': expected {expected}, found {actual}")]
  TypeMismatch {
    key: String,
    expected: &'static str,
    actual: &'static str,
  },

  #[error("invalid value '{value}' for key '{key}': {reason}")]
  InvalidValue { key: String, value: String, reason: String },

  /// Mutually exclusive settings were combined.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),

  /// A dependency does not name a declared resource.
  #[error("unresolvable dependency '{name}'")]
  Unresolvable { name: String },

  #[error(transparent)]
  Content(#[from] ContentError),

  #[error("placeholder error: {0}")]
  Placeholder(#[from] PlaceholderError),

  #[error("failed to parse {what}: {message}")]
  Parse { what: String, message: String },

  #[error("failed to read {path}: {message}")]
  Io { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, CompileError>;

impl CompileError {
  /// Build a `TypeMismatch` for the given key and offending JSON value.
  pub fn type_mismatch(key: impl Into<String>, expected: &'static str, actual: &serde_json::Value) -> Self {
    CompileError::TypeMismatch {
      key: key.into(),
      expected,
      actual: value_kind(actual),
    }
  }
}

/// Human-readable name of a JSON value's shape.
pub fn value_kind(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "boolean",
    serde_json::Value::Number(_) => "number",
    serde_json::Value::String(_) => "string",
    serde_json::Value::Array(_) => "list",
    serde_json::Value::Object(_) => "map",
  }
}
