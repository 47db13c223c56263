use crate::chain::ParameterChain;
use crate::consts::{
  PARAM_RESTART_ON_ENV_CHANGE, RESTART_ON_USER_PROVIDED_CHANGE, RESTART_ON_VCAP_APP_CHANGE,
  RESTART_ON_VCAP_SERVICES_CHANGE,
};
use crate::descriptor::Parameters;
use crate::error::Result;
use crate::model::RestartParameters;

/// Read `restart-on-env-change`. Every entry left out defaults to `true`.
pub(crate) fn restart_parameters(chain: &ParameterChain) -> Result<RestartParameters> {
  let Some(map) = chain.get_map(PARAM_RESTART_ON_ENV_CHANGE)? else {
    return Ok(RestartParameters::default());
  };
  let fields = ParameterChain::new(vec![map.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Parameters>()]);

  let enabled = |key: &str| -> Result<bool> { Ok(fields.get_bool(key)?.unwrap_or(true)) };

  Ok(RestartParameters {
    restart_on_vcap_app_change: enabled(RESTART_ON_VCAP_APP_CHANGE)?,
    restart_on_vcap_services_change: enabled(RESTART_ON_VCAP_SERVICES_CHANGE)?,
    restart_on_user_provided_change: enabled(RESTART_ON_USER_PROVIDED_CHANGE)?,
  })
}
