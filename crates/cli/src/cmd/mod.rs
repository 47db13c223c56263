//! Subcommand implementations and the inputs they share.

mod build;
mod routes;
mod services;

pub use build::{BuildArgs, cmd_build};
pub use routes::cmd_routes;
pub use services::cmd_services;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use mtac_lib::config::TargetConfig;
use mtac_lib::descriptor::{DeploymentDescriptor, ExtensionDescriptor};

/// Files every subcommand compiles from.
#[derive(Args)]
pub struct Inputs {
  /// Path to the deployment descriptor (mtad.yaml)
  pub descriptor: PathBuf,

  /// Extension descriptor, applied in the order given
  #[arg(short = 'e', long = "extension")]
  pub extensions: Vec<PathBuf>,

  /// Target environment configuration
  #[arg(short, long)]
  pub config: Option<PathBuf>,
}

/// Descriptor, extensions and configuration loaded from [`Inputs`].
pub struct Loaded {
  pub descriptor: DeploymentDescriptor,
  pub extensions: Vec<ExtensionDescriptor>,
  pub config: TargetConfig,
}

impl Inputs {
  pub fn load(&self) -> Result<Loaded> {
    let descriptor = DeploymentDescriptor::from_file(&self.descriptor)
      .with_context(|| format!("Failed to load descriptor: {}", self.descriptor.display()))?;

    let extensions = self
      .extensions
      .iter()
      .map(|path| {
        ExtensionDescriptor::from_file(path)
          .with_context(|| format!("Failed to load extension descriptor: {}", path.display()))
      })
      .collect::<Result<Vec<_>>>()?;

    let mut config = match &self.config {
      Some(path) => TargetConfig::from_file(path)
        .with_context(|| format!("Failed to load target configuration: {}", path.display()))?,
      None => TargetConfig::default(),
    };
    config
      .apply_env_overrides()
      .context("Invalid target configuration override")?;

    debug!(
      mta = %descriptor.id,
      extensions = extensions.len(),
      "inputs loaded"
    );
    Ok(Loaded {
      descriptor,
      extensions,
      config,
    })
  }
}
