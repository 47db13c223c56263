use std::collections::BTreeMap;

use serde_json::Value;

use crate::chain::ParameterChain;
use crate::consts::{PARAM_DISK_QUOTA, PARAM_MEMORY, PARAM_TASKS, TASK_COMMAND, TASK_ENV, TASK_NAME};
use crate::descriptor::Parameters;
use crate::error::{CompileError, Result};
use crate::model::Task;

/// Read the `tasks` list of a module.
///
/// Each entry needs a `name` and a `command`; `memory`, `disk-quota` and
/// `env` are optional. Non-string env values are rendered as JSON, pretty
/// when `pretty_printing` is set.
pub(crate) fn tasks(chain: &ParameterChain, pretty_printing: bool) -> Result<Vec<Task>> {
  let Some(entries) = chain.get_list(PARAM_TASKS)? else {
    return Ok(Vec::new());
  };

  let mut tasks = Vec::with_capacity(entries.len());
  for entry in entries {
    let Value::Object(map) = entry else {
      return Err(CompileError::type_mismatch(PARAM_TASKS, "map", entry));
    };
    let fields = ParameterChain::new(vec![map.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Parameters>()]);

    let required = |key: &str| -> Result<String> {
      fields.get_string(key)?.ok_or_else(|| CompileError::MissingParameter {
        key: format!("{PARAM_TASKS}#{key}"),
      })
    };

    let env = match fields.get_map(TASK_ENV)? {
      None => BTreeMap::new(),
      Some(env) => env
        .iter()
        .map(|(key, value)| {
          let rendered = match value {
            Value::String(s) => s.clone(),
            other if pretty_printing => format!("{:#}", other),
            other => other.to_string(),
          };
          (key.clone(), rendered)
        })
        .collect(),
    };

    tasks.push(Task {
      name: required(TASK_NAME)?,
      command: required(TASK_COMMAND)?,
      memory: fields.get_memory(PARAM_MEMORY)?,
      disk_quota: fields.get_memory(PARAM_DISK_QUOTA)?,
      env,
    });
  }
  Ok(tasks)
}
