//! Implementation of the `mtac build` command.
//!
//! Compiles the descriptor into one cloud application per module and prints
//! the result.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mtac_lib::CloudModelBuilder;
use mtac_lib::descriptor::DeploymentDescriptor;
use mtac_lib::model::{CloudApplication, DeployedMta};

use super::Inputs;
use crate::output::{OutputFormat, format_list, format_memory, print_info, print_json, print_stat, print_success};

#[derive(Args)]
pub struct BuildArgs {
  /// Modules contained in the archive (default: every module with a type)
  #[arg(long, value_delimiter = ',')]
  pub archive_modules: Option<Vec<String>>,

  /// Modules selected for deployment (default: every module with a type)
  #[arg(long, value_delimiter = ',')]
  pub intended: Option<Vec<String>>,

  /// Deployed state of the MTA (YAML)
  #[arg(long)]
  pub deployed: Option<PathBuf>,
}

pub fn cmd_build(inputs: &Inputs, args: &BuildArgs, format: OutputFormat, verbose: bool) -> Result<()> {
  let loaded = inputs.load()?;
  let builder = CloudModelBuilder::new(&loaded.descriptor, &loaded.extensions, &loaded.config)
    .context("Failed to prepare model builder")?;

  let archive = module_set(&loaded.descriptor, args.archive_modules.as_deref());
  let intended = module_set(&loaded.descriptor, args.intended.as_deref());
  let deployed: BTreeSet<String> = match &args.deployed {
    Some(path) => DeployedMta::from_file(path)
      .with_context(|| format!("Failed to load deployed state: {}", path.display()))?
      .module_names()
      .map(str::to_string)
      .collect(),
    None => BTreeSet::new(),
  };

  let applications = builder
    .build(&archive, &intended, &deployed)
    .with_context(|| format!("Failed to build MTA {}", loaded.descriptor.id))?;

  if format.is_json() {
    return print_json(&applications);
  }

  for app in &applications {
    print_application(app, verbose);
    println!();
  }
  print_info(&format!("Built {} application(s)", applications.len()));

  Ok(())
}

fn module_set(descriptor: &DeploymentDescriptor, explicit: Option<&[String]>) -> BTreeSet<String> {
  match explicit {
    Some(names) => names.iter().cloned().collect(),
    None => descriptor
      .modules
      .iter()
      .filter(|m| m.module_type.is_some())
      .map(|m| m.name.clone())
      .collect(),
  }
}

fn print_application(app: &CloudApplication, verbose: bool) {
  print_success(&format!("{} (module {})", app.name, app.module_name));

  if let Some(memory) = app.memory {
    print_stat("Memory", &format_memory(memory));
  }
  if let Some(disk_quota) = app.disk_quota {
    print_stat("Disk quota", &format_memory(disk_quota));
  }
  if let Some(instances) = app.instances {
    print_stat("Instances", &instances.to_string());
  }
  if let Some(docker) = &app.docker {
    print_stat("Docker image", &docker.image);
  }
  print_stat("Routes", &format_list(&app.routes));
  print_stat("Idle routes", &format_list(&app.idle_routes));
  print_stat("Services", &format_list(&app.services));

  if !app.service_keys_to_inject.is_empty() {
    let keys: Vec<String> = app
      .service_keys_to_inject
      .iter()
      .map(|k| format!("{}={}/{}", k.env_var_name, k.service_name, k.service_key_name))
      .collect();
    print_stat("Service keys", &format_list(&keys));
  }
  if !app.tasks.is_empty() {
    let tasks: Vec<String> = app.tasks.iter().map(|t| t.name.clone()).collect();
    print_stat("Tasks", &format_list(&tasks));
  }

  if verbose {
    for (name, value) in &app.env {
      print_stat(&format!("env {}", name), value);
    }
  }
}
