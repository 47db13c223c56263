//! Implementation of the `mtac services` command.

use anyhow::{Context, Result};

use mtac_lib::CloudModelBuilder;

use super::Inputs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_services(inputs: &Inputs, format: OutputFormat) -> Result<()> {
  let loaded = inputs.load()?;
  let builder = CloudModelBuilder::new(&loaded.descriptor, &loaded.extensions, &loaded.config)
    .context("Failed to prepare model builder")?;

  let services = builder
    .build_services()
    .with_context(|| format!("Failed to resolve services of MTA {}", loaded.descriptor.id))?;

  if format.is_json() {
    return print_json(&services);
  }

  if services.is_empty() {
    print_info("No services declared");
    return Ok(());
  }

  for service in &services {
    print_success(&format!("{} (resource {})", service.name, service.resource_name));
    print_stat("Type", service.resource_type.as_str());
    if let Some(label) = &service.label {
      print_stat("Service", label);
    }
    if let Some(plan) = &service.plan {
      print_stat("Plan", plan);
    }
    if service.shared {
      print_stat("Shared", "yes");
    }
  }

  Ok(())
}
