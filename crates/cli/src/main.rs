//! mtac - compile MTA deployment descriptors into cloud application models

mod cmd;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{BuildArgs, Inputs};
use crate::output::{OutputFormat, print_error};

/// mtac - MTA deployment descriptor compiler
#[derive(Parser)]
#[command(name = "mtac")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value = "text")]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the cloud application model of a deployment
  Build {
    #[command(flatten)]
    inputs: Inputs,

    #[command(flatten)]
    args: BuildArgs,
  },

  /// List the service instances the descriptor declares
  Services {
    #[command(flatten)]
    inputs: Inputs,
  },

  /// Show the live, idle and temporary routes of one module
  Routes {
    #[command(flatten)]
    inputs: Inputs,

    /// Module name
    module: String,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Build { inputs, args } => cmd::cmd_build(&inputs, &args, cli.format, cli.verbose),
    Commands::Services { inputs } => cmd::cmd_services(&inputs, cli.format),
    Commands::Routes { inputs, module } => cmd::cmd_routes(&inputs, &module, cli.format),
  }
}

