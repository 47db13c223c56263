//! Placeholder parsing and substitution for environment-specific endpoints.
//!
//! Descriptors written for XS Advanced reference platform endpoints through
//! placeholders that are only known once the target environment is chosen.
//! This module parses such strings into segments and substitutes resolved
//! values.
//!
//! # Placeholder Formats
//!
//! - `{xsa-placeholder-endpoint-controller}` - controller URL
//! - `{xsa-placeholder-endpoint-authorization}` - authorization URL
//! - `{xsa-placeholder-service-url-deploy-service}` - deploy service URL
//! - `{xsa-placeholder-domain-default}` - default domain
//! - `{xsa-placeholder-protocol}` - protocol (`http` or `https`)
//! - `{xsa-placeholder-router-port}` - router port
//!
//! Any other brace text, such as `{name}`, passes through unchanged.
//!
//! # Example
//!
//! ```
//! use mtac_lib::placeholder::{parse, Segment, Placeholder};
//!
//! let segments = parse("{xsa-placeholder-protocol}://api").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Protocol),
//!     Segment::Literal("://api".to_string()),
//! ]);
//! ```

use thiserror::Error;

const PLACEHOLDER_PREFIX: &str = "{xsa-placeholder-";

/// A parsed placeholder reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
  /// `{xsa-placeholder-endpoint-controller}`
  ControllerEndpoint,

  /// `{xsa-placeholder-endpoint-authorization}`
  AuthorizationEndpoint,

  /// `{xsa-placeholder-service-url-deploy-service}`
  DeployServiceUrl,

  /// `{xsa-placeholder-domain-default}`
  DefaultDomain,

  /// `{xsa-placeholder-protocol}`
  Protocol,

  /// `{xsa-placeholder-router-port}`
  RouterPort,
}

impl Placeholder {
  fn from_kind(kind: &str) -> Option<Self> {
    match kind {
      "endpoint-controller" => Some(Placeholder::ControllerEndpoint),
      "endpoint-authorization" => Some(Placeholder::AuthorizationEndpoint),
      "service-url-deploy-service" => Some(Placeholder::DeployServiceUrl),
      "domain-default" => Some(Placeholder::DefaultDomain),
      "protocol" => Some(Placeholder::Protocol),
      "router-port" => Some(Placeholder::RouterPort),
      _ => None,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Placeholder::ControllerEndpoint => "endpoint-controller",
      Placeholder::AuthorizationEndpoint => "endpoint-authorization",
      Placeholder::DeployServiceUrl => "service-url-deploy-service",
      Placeholder::DefaultDomain => "domain-default",
      Placeholder::Protocol => "protocol",
      Placeholder::RouterPort => "router-port",
    }
  }
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Errors that can occur during placeholder parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder type: {0}")]
  UnknownType(String),

  #[error("unresolved placeholder: {0}")]
  Unresolved(String),
}

/// Trait for resolving placeholder values against a target environment.
pub trait Resolver {
  /// Resolve a single placeholder to its value.
  fn resolve(&self, placeholder: Placeholder) -> Result<&str, PlaceholderError>;
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if an `{xsa-placeholder-` sequence is never closed or
/// names an unknown placeholder.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut rest = input;
  let mut offset = 0;

  while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
    if start > 0 {
      segments.push(Segment::Literal(rest[..start].to_string()));
    }

    let after_prefix = &rest[start + PLACEHOLDER_PREFIX.len()..];
    let end = after_prefix
      .find('}')
      .ok_or(PlaceholderError::Unclosed(offset + start))?;

    let kind = &after_prefix[..end];
    let placeholder = Placeholder::from_kind(kind).ok_or_else(|| PlaceholderError::UnknownType(kind.to_string()))?;
    segments.push(Segment::Placeholder(placeholder));

    let consumed = start + PLACEHOLDER_PREFIX.len() + end + 1;
    offset += consumed;
    rest = &rest[consumed..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest.to_string()));
  }

  Ok(segments)
}

/// Substitute all placeholders in a string using the provided resolver.
///
/// # Errors
///
/// Returns an error if parsing fails or if any placeholder cannot be resolved.
pub fn substitute<R: Resolver + ?Sized>(input: &str, resolver: &R) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments<R: Resolver + ?Sized>(segments: &[Segment], resolver: &R) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(p) => result.push_str(resolver.resolve(*p)?),
    }
  }

  Ok(result)
}

/// Substitute placeholders in every string nested inside a JSON value.
pub fn substitute_value<R: Resolver + ?Sized>(
  value: &serde_json::Value,
  resolver: &R,
) -> Result<serde_json::Value, PlaceholderError> {
  Ok(match value {
    serde_json::Value::String(s) => serde_json::Value::String(substitute(s, resolver)?),
    serde_json::Value::Array(items) => serde_json::Value::Array(
      items
        .iter()
        .map(|item| substitute_value(item, resolver))
        .collect::<Result<_, _>>()?,
    ),
    serde_json::Value::Object(map) => {
      let mut resolved = serde_json::Map::new();
      for (key, item) in map {
        resolved.insert(key.clone(), substitute_value(item, resolver)?);
      }
      serde_json::Value::Object(resolved)
    }
    other => other.clone(),
  })
}

/// Resolver for targets without platform endpoints. Every placeholder fails.
pub struct NoPlaceholders;

impl Resolver for NoPlaceholders {
  fn resolve(&self, placeholder: Placeholder) -> Result<&str, PlaceholderError> {
    Err(PlaceholderError::Unresolved(placeholder.name().to_string()))
  }
}
