//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Get a Command for the mtac binary with overrides from the outer
/// environment cleared.
pub fn mtac_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("mtac");
  cmd
    .env_remove("MTAC_DEFAULT_DOMAIN")
    .env_remove("MTAC_NAMESPACE")
    .env_remove("MTAC_PRETTY_PRINTING")
    .env_remove("RUST_LOG");
  cmd
}

/// A command running `subcommand` on the shop descriptor with the target
/// configuration.
pub fn shop_cmd(subcommand: &str) -> Command {
  let mut cmd = mtac_cmd();
  cmd
    .arg(subcommand)
    .arg(fixture_path("shop.mtad.yaml"))
    .arg("-c")
    .arg(fixture_path("target.yaml"));
  cmd
}

/// Parse the JSON a successful command printed on stdout.
pub fn json_stdout(cmd: &mut Command) -> serde_json::Value {
  let output = cmd.output().unwrap();
  assert!(
    output.status.success(),
    "command failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  serde_json::from_slice(&output.stdout).unwrap()
}
