//! Route assembly for live, idle and temporary application variants.
//!
//! # Live routes
//!
//! Evaluated in this order:
//!
//! 1. `no-route: true` yields no routes at all.
//! 2. Explicit `routes` (or a single `route`) are used verbatim, in order,
//!    with `null` entries dropped and the `route-path` appended.
//! 3. Otherwise hosts and domains are resolved. `no-hostname` forces an empty
//!    host set; `default-host` and `default-domain` only apply when no
//!    explicit value is given.
//! 4. Hosts without any domain are reinterpreted as domains.
//! 5. Every host is combined with every domain as `host.domain` (or just
//!    `domain`), the route path is appended and duplicates are dropped.
//!
//! # Idle routes
//!
//! Explicit `idle-routes` win. Otherwise the live routes are rewritten: the
//! host becomes `idle-host`/`default-idle-host` and the domain becomes
//! `idle-domain`/`default-idle-domain`, each only if configured.
//!
//! # Temporary routes
//!
//! Like live routes, but read from `temp-host`, `temp-domain` and
//! `temp-port`. With port-based routing enabled and ports available, the
//! routes are `domain:port` pairs instead.

use serde_json::Value;
use tracing::trace;

use crate::chain::ParameterChain;
use crate::consts::{
  PARAM_DEFAULT_DOMAIN, PARAM_DEFAULT_HOST, PARAM_DEFAULT_IDLE_DOMAIN, PARAM_DEFAULT_IDLE_HOST, PARAM_DEFAULT_IDLE_PORT,
  PARAM_DEFAULT_PORT, PARAM_DEFAULT_TEMP_DOMAIN, PARAM_DEFAULT_TEMP_HOST, PARAM_DEFAULT_TEMP_PORT, PARAM_DOMAIN,
  PARAM_HOST, PARAM_IDLE_DOMAIN, PARAM_IDLE_HOST, PARAM_IDLE_PORT, PARAM_IDLE_ROUTES, PARAM_NO_HOSTNAME,
  PARAM_NO_ROUTE, PARAM_PORT, PARAM_ROUTE, PARAM_ROUTE_PATH, PARAM_TCP, PARAM_TCPS, PARAM_TEMP_DOMAIN, PARAM_TEMP_HOST,
  PARAM_TEMP_PORT,
};
use crate::error::{CompileError, Result};
use crate::model::PortType;
use crate::uri;

/// Parameter names used by one routing variant.
#[derive(Debug, Clone, Copy)]
struct RoutingParameterSet {
  host: &'static str,
  domain: &'static str,
  port: &'static str,
  default_host: &'static str,
  default_domain: &'static str,
  default_port: &'static str,
}

const LIVE: RoutingParameterSet = RoutingParameterSet {
  host: PARAM_HOST,
  domain: PARAM_DOMAIN,
  port: PARAM_PORT,
  default_host: PARAM_DEFAULT_HOST,
  default_domain: PARAM_DEFAULT_DOMAIN,
  default_port: PARAM_DEFAULT_PORT,
};

const IDLE: RoutingParameterSet = RoutingParameterSet {
  host: PARAM_IDLE_HOST,
  domain: PARAM_IDLE_DOMAIN,
  port: PARAM_IDLE_PORT,
  default_host: PARAM_DEFAULT_IDLE_HOST,
  default_domain: PARAM_DEFAULT_IDLE_DOMAIN,
  default_port: PARAM_DEFAULT_IDLE_PORT,
};

const TEMP: RoutingParameterSet = RoutingParameterSet {
  host: PARAM_TEMP_HOST,
  domain: PARAM_TEMP_DOMAIN,
  port: PARAM_TEMP_PORT,
  default_host: PARAM_DEFAULT_TEMP_HOST,
  default_domain: PARAM_DEFAULT_TEMP_DOMAIN,
  default_port: PARAM_DEFAULT_TEMP_PORT,
};

/// Hosts and domains after defaults and the host-as-domain rule.
struct HostsAndDomains {
  hosts: Vec<String>,
  domains: Vec<String>,
}

/// Assembles routes, ports and domains for one module.
///
/// The assembler holds no state besides its inputs: every call recomputes
/// its result from the chain.
pub struct RouteAssembler<'a> {
  chain: &'a ParameterChain,
  port_based_routing: bool,
  route_path: Option<String>,
}

impl<'a> RouteAssembler<'a> {
  /// Create an assembler over a module chain, reading its `route-path`.
  pub fn new(chain: &'a ParameterChain, port_based_routing: bool) -> Result<Self> {
    let route_path = chain.get_string(PARAM_ROUTE_PATH)?.filter(|p| !p.is_empty());
    Ok(Self {
      chain,
      port_based_routing,
      route_path,
    })
  }

  fn no_route(&self) -> Result<bool> {
    self.chain.flag(PARAM_NO_ROUTE)
  }

  /// Live routes of the module.
  pub fn routes(&self) -> Result<Vec<String>> {
    if self.no_route()? {
      return Ok(Vec::new());
    }

    let explicit = self.explicit_routes(PARAM_ROUTE)?;
    if !explicit.is_empty() {
      return Ok(self.finish(explicit));
    }

    let resolved = self.hosts_and_domains(LIVE)?;
    Ok(self.finish(host_domain_product(&resolved)))
  }

  /// Routes of the idle variant during a blue-green deployment.
  pub fn idle_routes(&self) -> Result<Vec<String>> {
    if self.no_route()? {
      return Ok(Vec::new());
    }

    let explicit = self.explicit_routes(PARAM_IDLE_ROUTES)?;
    if !explicit.is_empty() {
      return Ok(self.finish(explicit));
    }

    let idle_hosts = self.values_or_default(IDLE.host, IDLE.default_host)?;
    let idle_domains = self.values_or_default(IDLE.domain, IDLE.default_domain)?;
    let live_domains = self.domains()?;

    let mut idle = Vec::new();
    for route in self.routes()? {
      let parts = uri::split_route(&route, &live_domains);
      let hosts: Vec<Option<String>> = if idle_hosts.is_empty() {
        vec![parts.host.clone()]
      } else {
        idle_hosts.iter().cloned().map(Some).collect()
      };
      let domains: Vec<String> = if idle_domains.is_empty() {
        vec![parts.domain.clone()]
      } else {
        idle_domains.clone()
      };

      for host in &hosts {
        for domain in &domains {
          let rewritten = uri::RouteParts {
            host: host.clone(),
            domain: domain.clone(),
            ..parts.clone()
          };
          push_unique(&mut idle, uri::build_route(&rewritten));
        }
      }
    }

    trace!(routes = ?idle, "idle routes");
    Ok(idle)
  }

  /// Routes used while both blue and green variants are live.
  pub fn temp_routes(&self) -> Result<Vec<String>> {
    if self.no_route()? {
      return Ok(Vec::new());
    }

    let resolved = self.hosts_and_domains(TEMP)?;
    let ports = self.ports_for(TEMP)?;
    if self.port_based_routing && !ports.is_empty() {
      let mut routes = Vec::new();
      for domain in &resolved.domains {
        for port in &ports {
          routes.push(uri::port_based(domain, *port));
        }
      }
      return Ok(self.finish(routes));
    }

    Ok(self.finish(host_domain_product(&resolved)))
  }

  /// Ports of the live variant.
  ///
  /// With explicit routes the ports are taken from the routes themselves.
  pub fn ports(&self) -> Result<Vec<u16>> {
    if self.no_route()? {
      return Ok(Vec::new());
    }

    let explicit = self.explicit_routes(PARAM_ROUTE)?;
    if !explicit.is_empty() {
      let mut ports = Vec::new();
      for route in &explicit {
        if let Some(port) = uri::split_route(route, &[]).port {
          push_unique(&mut ports, port);
        }
      }
      return Ok(ports);
    }
    self.ports_for(LIVE)
  }

  /// Domains of the live variant.
  ///
  /// With explicit routes the domains are taken from the routes themselves.
  pub fn domains(&self) -> Result<Vec<String>> {
    if self.no_route()? {
      return Ok(Vec::new());
    }

    let resolved = self.hosts_and_domains(LIVE)?;
    let explicit = self.explicit_routes(PARAM_ROUTE)?;
    if explicit.is_empty() {
      return Ok(resolved.domains);
    }

    let mut domains = Vec::new();
    for route in &explicit {
      push_unique(&mut domains, uri::split_route(route, &resolved.domains).domain);
    }
    Ok(domains)
  }

  /// Protocol of the module's ports.
  ///
  /// # Errors
  ///
  /// Returns `InvalidConfiguration` if both `tcp` and `tcps` are set.
  pub fn port_type(&self) -> Result<PortType> {
    let tcp = self.chain.flag(PARAM_TCP)?;
    let tcps = self.chain.flag(PARAM_TCPS)?;
    match (tcp, tcps) {
      (true, true) => Err(CompileError::InvalidConfiguration(
        "both TCP and TCPS routing requested".to_string(),
      )),
      (true, false) => Ok(PortType::Tcp),
      (false, true) => Ok(PortType::Tcps),
      (false, false) => Ok(PortType::Http),
    }
  }

  /// Explicit route strings under `key` (and its plural form).
  fn explicit_routes(&self, key: &str) -> Result<Vec<String>> {
    let mut routes = Vec::new();
    for entry in self.chain.get_all(key)? {
      match entry {
        Value::String(route) => routes.push(route.clone()),
        Value::Object(map) => match map.get(PARAM_ROUTE) {
          Some(Value::String(route)) => routes.push(route.clone()),
          Some(Value::Null) | None => {}
          Some(other) => return Err(CompileError::type_mismatch(format!("{key}#{PARAM_ROUTE}"), "string", other)),
        },
        other => return Err(CompileError::type_mismatch(key, "route", other)),
      }
    }
    Ok(routes)
  }

  fn values_or_default(&self, key: &str, default_key: &str) -> Result<Vec<String>> {
    let values = self.chain.get_all_strings(key)?;
    if !values.is_empty() {
      return Ok(values);
    }
    Ok(self.chain.get_string(default_key)?.into_iter().collect())
  }

  fn hosts_and_domains(&self, set: RoutingParameterSet) -> Result<HostsAndDomains> {
    let hosts = if self.chain.flag(PARAM_NO_HOSTNAME)? {
      Vec::new()
    } else {
      self.values_or_default(set.host, set.default_host)?
    };
    let domains = self.values_or_default(set.domain, set.default_domain)?;

    if domains.is_empty() {
      return Ok(HostsAndDomains {
        hosts: Vec::new(),
        domains: hosts,
      });
    }
    Ok(HostsAndDomains { hosts, domains })
  }

  fn ports_for(&self, set: RoutingParameterSet) -> Result<Vec<u16>> {
    let ports = self.chain.get_all_ports(set.port)?;
    if !ports.is_empty() {
      return Ok(ports);
    }
    match self.chain.get_u64(set.default_port)? {
      Some(port) if port != 0 => Ok(vec![crate::lookup::value_to_port(set.default_port, &port.into())?]),
      _ => Ok(Vec::new()),
    }
  }

  fn finish(&self, routes: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(routes.len());
    for route in routes {
      push_unique(&mut result, uri::with_path(&route, self.route_path.as_deref()));
    }
    result
  }
}

fn host_domain_product(resolved: &HostsAndDomains) -> Vec<String> {
  if resolved.hosts.is_empty() {
    return resolved.domains.clone();
  }
  let mut routes = Vec::with_capacity(resolved.hosts.len() * resolved.domains.len());
  for host in &resolved.hosts {
    for domain in &resolved.domains {
      routes.push(uri::host_based(Some(host), domain));
    }
  }
  routes
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
  if !items.contains(&item) {
    items.push(item);
  }
}
