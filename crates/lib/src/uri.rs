//! Route string utilities.
//!
//! A route has the shape `[host.]domain[:port][/path]`. Splitting a route into
//! host and domain is ambiguous on its own (`a.b.c` could be host `a` on
//! `b.c` or no host on `a.b.c`), so callers pass the domains they know about.

/// Components of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParts {
  pub host: Option<String>,
  pub domain: String,
  pub port: Option<u16>,
  pub path: Option<String>,
}

pub fn is_valid_port(port: u16) -> bool {
  port >= 1
}

/// Split a route into its components.
///
/// The longest entry of `known_domains` that the route ends with becomes the
/// domain. Without a match, everything after the first dot is the domain and
/// a dot-less route is a bare domain.
pub fn split_route(route: &str, known_domains: &[String]) -> RouteParts {
  let (address, path) = match route.find('/') {
    Some(idx) => (&route[..idx], Some(route[idx..].to_string())),
    None => (route, None),
  };

  let (address, port) = match address.rsplit_once(':') {
    Some((addr, port)) => match port.parse::<u16>() {
      Ok(p) => (addr, Some(p)),
      Err(_) => (address, None),
    },
    None => (address, None),
  };

  let known = known_domains
    .iter()
    .filter(|d| address == d.as_str() || address.ends_with(&format!(".{}", d)))
    .max_by_key(|d| d.len());

  let (host, domain) = match known {
    Some(domain) if address == domain.as_str() => (None, domain.clone()),
    Some(domain) => (
      Some(address[..address.len() - domain.len() - 1].to_string()),
      domain.clone(),
    ),
    None => match address.split_once('.') {
      Some((host, domain)) => (Some(host.to_string()), domain.to_string()),
      None => (None, address.to_string()),
    },
  };

  RouteParts {
    host: host.filter(|h| !h.is_empty()),
    domain,
    port,
    path,
  }
}

/// Join route components back into a route string.
pub fn build_route(parts: &RouteParts) -> String {
  let mut route = match &parts.host {
    Some(host) if !host.is_empty() => format!("{}.{}", host, parts.domain),
    _ => parts.domain.clone(),
  };
  if let Some(port) = parts.port {
    route.push(':');
    route.push_str(&port.to_string());
  }
  if let Some(path) = &parts.path {
    route.push_str(path);
  }
  route
}

/// `host.domain`, or just `domain` without a host.
pub fn host_based(host: Option<&str>, domain: &str) -> String {
  match host {
    Some(host) if !host.is_empty() => format!("{}.{}", host, domain),
    _ => domain.to_string(),
  }
}

/// `domain:port`
pub fn port_based(domain: &str, port: u16) -> String {
  format!("{}:{}", domain, port)
}

/// Append a route path, normalising the leading slash.
pub fn with_path(route: &str, path: Option<&str>) -> String {
  match path {
    Some(p) if !p.is_empty() => {
      if p.starts_with('/') {
        format!("{}{}", route, p)
      } else {
        format!("{}/{}", route, p)
      }
    }
    _ => route.to_string(),
  }
}
