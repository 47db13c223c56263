//! Implementation of the `mtac routes` command.

use anyhow::{Context, Result};

use mtac_lib::CloudModelBuilder;

use super::Inputs;
use crate::output::{OutputFormat, print_items, print_json};

pub fn cmd_routes(inputs: &Inputs, module: &str, format: OutputFormat) -> Result<()> {
  let loaded = inputs.load()?;
  let builder = CloudModelBuilder::new(&loaded.descriptor, &loaded.extensions, &loaded.config)
    .context("Failed to prepare model builder")?;

  let app = builder
    .build_module(module)
    .with_context(|| format!("Failed to assemble routes of module {}", module))?;

  if format.is_json() {
    let json_output = serde_json::json!({
      "module": app.module_name,
      "routes": app.routes,
      "idle-routes": app.idle_routes,
      "temp-routes": app.temp_routes,
    });
    return print_json(&json_output);
  }

  print_items("Routes:", &app.routes);
  print_items("Idle routes:", &app.idle_routes);
  print_items("Temp routes:", &app.temp_routes);

  Ok(())
}
