use crate::chain::ParameterChain;
use crate::consts::{DOCKER_IMAGE, DOCKER_PASSWORD, DOCKER_USERNAME, PARAM_DOCKER};
use crate::descriptor::Parameters;
use crate::error::{CompileError, Result};
use crate::model::{DockerCredentials, DockerInfo};

/// Read the `docker` image settings of a module.
///
/// Credentials are only kept when both `username` and `password` are set.
pub(crate) fn docker_info(chain: &ParameterChain) -> Result<Option<DockerInfo>> {
  let Some(map) = chain.get_map(PARAM_DOCKER)? else {
    return Ok(None);
  };
  let fields = ParameterChain::new(vec![map.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Parameters>()]);

  let image = fields
    .get_string(DOCKER_IMAGE)?
    .ok_or_else(|| CompileError::MissingParameter {
      key: format!("{PARAM_DOCKER}#{DOCKER_IMAGE}"),
    })?;
  let credentials = match (fields.get_string(DOCKER_USERNAME)?, fields.get_string(DOCKER_PASSWORD)?) {
    (Some(username), Some(password)) => Some(DockerCredentials { username, password }),
    _ => None,
  };

  Ok(Some(DockerInfo { image, credentials }))
}
