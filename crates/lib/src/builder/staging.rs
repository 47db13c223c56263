use crate::chain::ParameterChain;
use crate::consts::{
  DEFAULT_HEALTH_CHECK_HTTP_ENDPOINT, HEALTH_CHECK_TYPE_HTTP, PARAM_BUILDPACK, PARAM_COMMAND, PARAM_ENABLE_SSH,
  PARAM_HEALTH_CHECK_HTTP_ENDPOINT, PARAM_HEALTH_CHECK_TIMEOUT, PARAM_HEALTH_CHECK_TYPE, PARAM_STACK,
};
use crate::error::Result;
use crate::model::Staging;

/// Read the staging settings of a module.
///
/// The HTTP health check endpoint defaults to `/` only for `http` checks.
pub(crate) fn staging(chain: &ParameterChain) -> Result<Staging> {
  let health_check_type = chain.get_string(PARAM_HEALTH_CHECK_TYPE)?;
  let health_check_http_endpoint = match chain.get_string(PARAM_HEALTH_CHECK_HTTP_ENDPOINT)? {
    Some(endpoint) => Some(endpoint),
    None if health_check_type.as_deref() == Some(HEALTH_CHECK_TYPE_HTTP) => {
      Some(DEFAULT_HEALTH_CHECK_HTTP_ENDPOINT.to_string())
    }
    None => None,
  };

  Ok(Staging {
    command: chain.get_string(PARAM_COMMAND)?,
    buildpacks: chain.get_all_strings(PARAM_BUILDPACK)?,
    stack: chain.get_string(PARAM_STACK)?,
    health_check_timeout: chain.get_u64(PARAM_HEALTH_CHECK_TIMEOUT)?,
    health_check_type,
    health_check_http_endpoint,
    ssh_enabled: chain.get_bool(PARAM_ENABLE_SSH)?,
  })
}
