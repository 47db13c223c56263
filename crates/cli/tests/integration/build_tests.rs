//! Build command integration tests.

use predicates::prelude::*;

use super::common::{fixture_path, json_stdout, mtac_cmd, shop_cmd};

#[test]
fn build_prints_applications_in_dependency_order() {
  shop_cmd("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("eu10-catalog (module catalog)"))
    .stdout(predicate::str::contains("eu10-web (module web)"))
    .stdout(predicate::str::contains("Memory: 1.0 GB"))
    .stdout(predicate::str::contains("Docker image: shop/catalog:1.0"))
    .stdout(predicate::str::contains("Service keys: PAYMENT_CREDENTIALS=payment-service/shop-key"))
    .stdout(predicate::str::contains("Built 2 application(s)"));
}

#[test]
fn build_json_output() {
  let apps = json_stdout(shop_cmd("build").arg("--format").arg("json"));

  assert_eq!(apps.as_array().unwrap().len(), 2);
  assert_eq!(apps[0]["name"], "eu10-catalog");
  assert_eq!(apps[0]["memory"], 1024);
  assert_eq!(apps[0]["docker"]["image"], "shop/catalog:1.0");
  assert_eq!(apps[1]["restart-parameters"]["restart-on-user-provided-change"], true);
  assert_eq!(apps[1]["module-name"], "web");
  assert_eq!(apps[1]["memory"], 256);
  assert_eq!(apps[1]["routes"][0], "shop.apps.example.com");
  assert_eq!(apps[1]["env"]["NODE_ENV"], "production");
}

#[test]
fn build_applies_extensions() {
  let apps = json_stdout(
    shop_cmd("build")
      .arg("-e")
      .arg(fixture_path("prod.mtaext"))
      .arg("--format")
      .arg("json"),
  );

  assert_eq!(apps[1]["memory"], 512);
  assert_eq!(apps[1]["instances"], 4);
  assert_eq!(apps[1]["routes"][0], "www.apps.example.com");
  assert_eq!(apps[1]["env"]["NODE_ENV"], "production-eu");
}

#[test]
fn build_verbose_lists_environment() {
  shop_cmd("build")
    .arg("--verbose")
    .assert()
    .success()
    .stdout(predicate::str::contains("env NODE_ENV: production"))
    .stdout(predicate::str::contains("env MTA_SERVICES: [\"eu10-db\"]"));
}

#[test]
fn namespace_override_from_environment() {
  let apps = json_stdout(
    shop_cmd("build")
      .env("MTAC_NAMESPACE", "us20")
      .arg("--format")
      .arg("json"),
  );

  assert_eq!(apps[0]["name"], "us20-catalog");
  assert_eq!(apps[0]["services"][0], "us20-db");
}

#[test]
fn invalid_pretty_printing_override_fails() {
  shop_cmd("build")
    .env("MTAC_PRETTY_PRINTING", "sometimes")
    .assert()
    .failure()
    .stderr(predicate::str::contains("MTAC_PRETTY_PRINTING"));
}

#[test]
fn archived_module_not_intended_fails() {
  shop_cmd("build")
    .arg("--intended")
    .arg("web")
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "modules are part of the archive but not intended for deployment: catalog",
    ));
}

#[test]
fn unresolved_module_fails_unless_deployed() {
  shop_cmd("build")
    .arg("--archive-modules")
    .arg("web,catalog")
    .arg("--intended")
    .arg("web,catalog,reports")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unresolved modules: reports"));

  shop_cmd("build")
    .arg("--archive-modules")
    .arg("web,catalog")
    .arg("--intended")
    .arg("web,catalog,reports")
    .arg("--deployed")
    .arg(fixture_path("deployed.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Built 2 application(s)"));
}

#[test]
fn hard_dependency_cycle_fails() {
  mtac_cmd()
    .arg("build")
    .arg(fixture_path("cyclic.mtad.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("circular hard dependency between modules: a, b"));
}

#[test]
fn missing_descriptor_fails() {
  mtac_cmd()
    .arg("build")
    .arg("does-not-exist.mtad.yaml")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load descriptor"));
}
