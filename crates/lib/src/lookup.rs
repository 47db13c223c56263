//! First-match value lookup over parameter chains.
//!
//! A lookup distinguishes three outcomes: the key is absent from every layer,
//! the first layer containing it sets it to `null`, or it has a value. An
//! explicit `null` shadows the less specific layers and reads as "unset".

use serde_json::Value;

use crate::chain::ParameterChain;
use crate::consts::SINGULAR_PLURAL_MAPPING;
use crate::error::{CompileError, Result};

/// Outcome of looking a key up in a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
  Absent,
  Null,
  Present(&'a Value),
}

impl<'a> Lookup<'a> {
  /// The value, if one is present and not null.
  pub fn value(self) -> Option<&'a Value> {
    match self {
      Lookup::Present(value) => Some(value),
      Lookup::Absent | Lookup::Null => None,
    }
  }
}

impl ParameterChain {
  /// Find `key` in the first layer that contains it.
  pub fn lookup(&self, key: &str) -> Lookup<'_> {
    match self.layers().iter().find_map(|layer| layer.get(key)) {
      None => Lookup::Absent,
      Some(Value::Null) => Lookup::Null,
      Some(value) => Lookup::Present(value),
    }
  }

  /// The value of `key`, or `default` if it is unset.
  pub fn lookup_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
    self.lookup(key).value().unwrap_or(default)
  }

  /// The value of `key`.
  ///
  /// # Errors
  ///
  /// Returns `MissingParameter` if no layer sets the key.
  pub fn require(&self, key: &str) -> Result<&Value> {
    self
      .lookup(key)
      .value()
      .ok_or_else(|| CompileError::MissingParameter { key: key.to_string() })
  }

  pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(Value::String(s)) => Ok(Some(s)),
      Some(other) => Err(CompileError::type_mismatch(key, "string", other)),
    }
  }

  /// A string value; numbers and booleans are rendered as text.
  pub fn get_string(&self, key: &str) -> Result<Option<String>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(value) => scalar_to_string(key, value).map(Some),
    }
  }

  pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(Value::Bool(b)) => Ok(Some(*b)),
      Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
      Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
      Some(other) => Err(CompileError::type_mismatch(key, "boolean", other)),
    }
  }

  /// A flag that defaults to `false`.
  pub fn flag(&self, key: &str) -> Result<bool> {
    Ok(self.get_bool(key)?.unwrap_or(false))
  }

  pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(value) => value_to_u64(key, value).map(Some),
    }
  }

  pub fn get_map(&self, key: &str) -> Result<Option<&serde_json::Map<String, Value>>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(Value::Object(map)) => Ok(Some(map)),
      Some(other) => Err(CompileError::type_mismatch(key, "map", other)),
    }
  }

  pub fn get_list(&self, key: &str) -> Result<Option<&[Value]>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(Value::Array(items)) => Ok(Some(items)),
      Some(other) => Err(CompileError::type_mismatch(key, "list", other)),
    }
  }

  /// All values of a parameter that can be given in singular or plural form.
  ///
  /// The plural collection is checked first. If it is unset, a singular value
  /// is wrapped into a one-element list. `singular` must be listed in the
  /// alias table; otherwise only the singular key is consulted.
  pub fn get_all(&self, singular: &str) -> Result<Vec<&Value>> {
    if let Some(plural) = plural_of(singular)
      && let Some(items) = self.get_list(plural)?
    {
      return Ok(items.iter().filter(|v| !v.is_null()).collect());
    }
    Ok(self.lookup(singular).value().into_iter().collect())
  }

  /// Like [`get_all`](Self::get_all), rendering each value as a string.
  pub fn get_all_strings(&self, singular: &str) -> Result<Vec<String>> {
    self
      .get_all(singular)?
      .into_iter()
      .map(|v| scalar_to_string(singular, v))
      .collect()
  }

  /// Like [`get_all`](Self::get_all), parsing each value as a port number.
  pub fn get_all_ports(&self, singular: &str) -> Result<Vec<u16>> {
    self
      .get_all(singular)?
      .into_iter()
      .map(|v| value_to_port(singular, v))
      .collect()
  }

  /// A memory size in megabytes, see [`parse_memory`].
  pub fn get_memory(&self, key: &str) -> Result<Option<u64>> {
    match self.lookup(key).value() {
      None => Ok(None),
      Some(value) => parse_memory_value(key, value).map(Some),
    }
  }
}

/// The plural alias of a singular parameter name.
pub fn plural_of(singular: &str) -> Option<&'static str> {
  SINGULAR_PLURAL_MAPPING
    .iter()
    .find(|(s, _)| *s == singular)
    .map(|(_, p)| *p)
}

/// Render a scalar value as text.
pub fn scalar_to_string(key: &str, value: &Value) -> Result<String> {
  match value {
    Value::String(s) => Ok(s.clone()),
    Value::Number(n) => Ok(n.to_string()),
    Value::Bool(b) => Ok(b.to_string()),
    other => Err(CompileError::type_mismatch(key, "string", other)),
  }
}

pub fn value_to_u64(key: &str, value: &Value) -> Result<u64> {
  match value {
    Value::Number(n) => n.as_u64().ok_or_else(|| CompileError::InvalidValue {
      key: key.to_string(),
      value: n.to_string(),
      reason: "expected a non-negative integer".to_string(),
    }),
    Value::String(s) => s.trim().parse().map_err(|_| CompileError::InvalidValue {
      key: key.to_string(),
      value: s.clone(),
      reason: "expected a non-negative integer".to_string(),
    }),
    other => Err(CompileError::type_mismatch(key, "integer", other)),
  }
}

pub fn value_to_port(key: &str, value: &Value) -> Result<u16> {
  let port = value_to_u64(key, value)?;
  u16::try_from(port)
    .ok()
    .filter(|p| crate::uri::is_valid_port(*p))
    .ok_or_else(|| CompileError::InvalidValue {
      key: key.to_string(),
      value: port.to_string(),
      reason: "port must be between 1 and 65535".to_string(),
    })
}

/// Parse a memory size into megabytes.
///
/// A bare integer is taken as megabytes. `M`/`MB` mean megabytes and
/// `G`/`GB` gigabytes (1024 MB). Suffixes are case-insensitive.
///
/// ```
/// use mtac_lib::lookup::parse_memory;
///
/// assert_eq!(parse_memory("memory", "512M").unwrap(), 512);
/// assert_eq!(parse_memory("memory", "2g").unwrap(), 2048);
/// assert_eq!(parse_memory("memory", "1024").unwrap(), 1024);
/// assert!(parse_memory("memory", "1X").is_err());
/// ```
pub fn parse_memory(key: &str, input: &str) -> Result<u64> {
  let invalid = || CompileError::InvalidValue {
    key: key.to_string(),
    value: input.to_string(),
    reason: "expected a size such as 512M or 2G".to_string(),
  };

  let trimmed = input.trim();
  let split = trimmed
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(trimmed.len());
  let (digits, suffix) = trimmed.split_at(split);
  if digits.is_empty() {
    return Err(invalid());
  }

  let amount: u64 = digits.parse().map_err(|_| invalid())?;
  let factor = match suffix.to_ascii_uppercase().as_str() {
    "" | "M" | "MB" => 1,
    "G" | "GB" => 1024,
    _ => return Err(invalid()),
  };

  amount.checked_mul(factor).ok_or_else(invalid)
}

fn parse_memory_value(key: &str, value: &Value) -> Result<u64> {
  match value {
    Value::String(s) => parse_memory(key, s),
    Value::Number(_) => value_to_u64(key, value),
    other => Err(CompileError::type_mismatch(key, "memory size", other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::Parameters;
  use serde_json::json;

  fn make_chain(layers: Vec<serde_json::Value>) -> ParameterChain {
    ParameterChain::new(
      layers
        .into_iter()
        .map(|l| serde_json::from_value::<Parameters>(l).unwrap())
        .collect(),
    )
  }

  #[test]
  fn first_layer_wins_regardless_of_depth() {
    for depth in 2..6 {
      let mut layers = vec![json!({ "memory": "1G" })];
      layers.extend((1..depth).map(|i| json!({ "memory": format!("{}M", i) })));
      let chain = make_chain(layers);
      assert_eq!(chain.lookup("memory"), Lookup::Present(&json!("1G")));
    }
  }

  #[test]
  fn later_layers_are_fallback_only() {
    let chain = make_chain(vec![json!({ "a": 1 }), json!({ "b": 2 })]);
    assert_eq!(chain.get_u64("b").unwrap(), Some(2));
    assert_eq!(chain.lookup("c"), Lookup::Absent);
  }

  #[test]
  fn explicit_null_shadows_fallback() {
    let chain = make_chain(vec![json!({ "health-check-type": null }), json!({ "health-check-type": "port" })]);
    assert_eq!(chain.lookup("health-check-type"), Lookup::Null);
    assert_eq!(chain.get_str("health-check-type").unwrap(), None);
  }

  #[test]
  fn require_reports_missing_key() {
    let chain = make_chain(vec![json!({})]);
    let err = chain.require("service").unwrap_err();
    assert_eq!(err.to_string(), "missing parameter 'service'");
    assert_eq!(chain.lookup_or("service", &json!("none")), &json!("none"));
  }

  #[test]
  fn plural_checked_before_singular() {
    let chain = make_chain(vec![json!({ "host": "single", "hosts": ["a", "b"] })]);
    assert_eq!(chain.get_all_strings("host").unwrap(), vec!["a", "b"]);
  }

  #[test]
  fn singular_wrapped_into_list() {
    let chain = make_chain(vec![json!({ "host": "single" })]);
    assert_eq!(chain.get_all_strings("host").unwrap(), vec!["single"]);

    let chain = make_chain(vec![json!({})]);
    assert!(chain.get_all("host").unwrap().is_empty());
  }

  #[test]
  fn plural_must_be_a_list() {
    let chain = make_chain(vec![json!({ "domains": "example.com" })]);
    let err = chain.get_all("domain").unwrap_err();
    assert!(matches!(err, CompileError::TypeMismatch { expected: "list", .. }));
  }

  #[test]
  fn ports_are_validated() {
    let chain = make_chain(vec![json!({ "ports": [8080, "9090"] })]);
    assert_eq!(chain.get_all_ports("port").unwrap(), vec![8080, 9090]);

    let chain = make_chain(vec![json!({ "port": 70000 })]);
    assert!(chain.get_all_ports("port").is_err());
  }

  #[test]
  fn boolean_flags() {
    let chain = make_chain(vec![json!({ "no-route": true, "tcp": "TRUE", "tcps": 1 })]);
    assert!(chain.flag("no-route").unwrap());
    assert!(chain.flag("tcp").unwrap());
    assert!(!chain.flag("no-hostname").unwrap());
    assert!(chain.flag("tcps").is_err());
  }

  #[test]
  fn memory_grammar() {
    assert_eq!(parse_memory("memory", "512M").unwrap(), 512);
    assert_eq!(parse_memory("memory", "512mb").unwrap(), 512);
    assert_eq!(parse_memory("memory", "2G").unwrap(), 2048);
    assert_eq!(parse_memory("memory", "2GB").unwrap(), 2048);
    assert_eq!(parse_memory("memory", "1024").unwrap(), 1024);
    assert!(matches!(
      parse_memory("memory", "1X").unwrap_err(),
      CompileError::InvalidValue { .. }
    ));
    assert!(parse_memory("memory", "G").is_err());
    assert!(parse_memory("memory", "1.5G").is_err());
  }

  #[test]
  fn memory_from_chain() {
    let chain = make_chain(vec![json!({ "memory": 256, "disk-quota": "1G", "bad": [1] })]);
    assert_eq!(chain.get_memory("memory").unwrap(), Some(256));
    assert_eq!(chain.get_memory("disk-quota").unwrap(), Some(1024));
    assert_eq!(chain.get_memory("instances").unwrap(), None);
    assert!(chain.get_memory("bad").is_err());
  }
}
